use std::collections::VecDeque;

use sim800l::embassy_time::{Delay, Duration};
use sim800l::embedded_io::{ErrorType, Read, ReadReady, Write, WriteReady};
use sim800l::{Config, Error, Serial, Sim800l};

#[derive(Debug)]
struct Disconnected;

impl core::fmt::Display for Disconnected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("modem disconnected")
    }
}

impl core::error::Error for Disconnected {}

impl sim800l::embedded_io::Error for Disconnected {
    fn kind(&self) -> sim800l::embedded_io::ErrorKind {
        sim800l::embedded_io::ErrorKind::BrokenPipe
    }
}

/// Just enough of a SIM800L to answer the commands the driver sends.
#[derive(Default)]
struct FakeModem {
    line: Vec<u8>,
    out: VecDeque<u8>,
    echo_off: bool,
    text_mode: bool,
    recipient: Option<String>,
    sent: Vec<(String, String)>,
    unplugged: bool,
    rx_broken: bool,
}

impl FakeModem {
    fn reply(&mut self, s: &str) {
        self.out.extend(s.as_bytes());
    }

    fn on_byte(&mut self, b: u8) {
        if self.recipient.is_some() {
            if b == 0x1A {
                let to = self.recipient.take().unwrap_or_default();
                let body = String::from_utf8_lossy(&self.line).into_owned();
                self.line.clear();
                self.sent.push((to, body));
                self.reply("\r\n+CMGS: 7\r\n\r\nOK\r\n");
            } else {
                self.line.push(b);
                if !self.echo_off {
                    self.out.push_back(b);
                }
            }
            return;
        }

        self.line.push(b);
        if !self.line.ends_with(b"\r\n") {
            return;
        }

        let line = String::from_utf8_lossy(&self.line[..self.line.len() - 2]).into_owned();
        self.line.clear();
        if !self.echo_off {
            self.reply(&line);
            self.reply("\r");
        }

        match line.as_str() {
            "AT" => self.reply("\r\nOK\r\n"),
            "ATE0" => {
                self.echo_off = true;
                self.reply("\r\nOK\r\n");
            }
            "AT+CMGF=1" => {
                self.text_mode = true;
                self.reply("\r\nOK\r\n");
            }
            "AT+CSQ" => self.reply("\r\n+CSQ: 18,0\r\n\r\nOK\r\n"),
            cmd if cmd.starts_with("AT+CMGS=\"") && self.text_mode => {
                let number = cmd["AT+CMGS=\"".len()..].trim_end_matches('"');
                self.recipient = Some(number.to_string());
                self.reply("\r\n> ");
            }
            _ => self.reply("\r\nERROR\r\n"),
        }
    }
}

impl ErrorType for FakeModem {
    type Error = Disconnected;
}

impl Read for FakeModem {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.unplugged || self.rx_broken {
            return Err(Disconnected);
        }
        let n = buf.len().min(self.out.len());
        for (dst, src) in buf.iter_mut().zip(self.out.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

impl ReadReady for FakeModem {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.unplugged || self.rx_broken || !self.out.is_empty())
    }
}

impl Write for FakeModem {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.unplugged {
            return Err(Disconnected);
        }
        for b in buf {
            self.on_byte(*b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl WriteReady for FakeModem {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

fn config() -> Config {
    Config::new()
        .rx_timeout(Duration::from_millis(50))
        .prompt_delay(Duration::from_millis(10))
}

#[test]
fn init_then_signal_quality() {
    let mut serial = Serial::new(FakeModem::default());
    let mut modem: Sim800l<_, _> = Sim800l::new(&mut serial, Delay, config());

    let response = modem.init().unwrap();
    assert_eq!(response.as_str(), Some("\r\nOK\r\n"));

    let response = modem.read_signal_quality().unwrap();
    assert_eq!(response.as_str(), Some("\r\n+CSQ: 18,0\r\n\r\nOK\r\n"));
    assert!(response.is_partial());

    drop(modem);
    let port = serial.release();
    assert!(port.echo_off);
    assert!(port.text_mode);
}

#[test]
fn echo_is_captured_before_init() {
    let mut modem: Sim800l<_, _> =
        Sim800l::new(Serial::new(FakeModem::default()), Delay, config());

    let response = modem.send_at_command("AT\r\n").unwrap();
    assert_eq!(response.as_str(), Some("AT\r\r\nOK\r\n"));
}

#[test]
fn send_sms_end_to_end() {
    let mut modem: Sim800l<_, _> =
        Sim800l::new(Serial::new(FakeModem::default()), Delay, config());

    modem.init().unwrap();
    modem.send_sms("+15551234567", "Hello").unwrap();

    let (serial, _) = modem.release();
    let port = serial.release();
    assert_eq!(
        port.sent,
        [("+15551234567".to_string(), "Hello".to_string())]
    );
    assert_eq!(
        port.out.iter().copied().collect::<Vec<u8>>(),
        b"\r\n+CMGS: 7\r\n\r\nOK\r\n"
    );
}

#[test]
fn full_capture_waits_for_capacity() {
    let mut modem: Sim800l<_, _, 8> = Sim800l::new(
        Serial::new(FakeModem::default()),
        Delay,
        Config::default(),
    );

    // Echo plus reply is longer than the buffer, so the unbounded wait ends
    let response = modem.send_at_command("AT+CSQ\r\n").unwrap();
    assert_eq!(response.as_bytes(), b"AT+CSQ\r\r");
    assert!(!response.is_partial());
}

#[test]
fn broken_link() {
    let mut serial = Serial::new(FakeModem::default());
    serial.inner_mut().unplugged = true;
    let mut modem: Sim800l<_, _> = Sim800l::new(serial, Delay, config());

    assert_eq!(modem.init().map(|_| ()), Err(Error::Write));
}

#[test]
fn lost_receive_line() {
    let mut serial = Serial::new(FakeModem::default());
    serial.inner_mut().rx_broken = true;
    let mut modem: Sim800l<_, _> = Sim800l::new(&mut serial, Delay, config());

    assert_eq!(
        modem.send_at_command("AT\r\n").map(|r| r.len()),
        Err(Error::Read)
    );
    drop(modem);

    // The command still went out, the reply was never read
    let fake = serial.release();
    let pending: Vec<u8> = fake.out.into_iter().collect();
    assert!(pending.ends_with(b"\r\nOK\r\n"));
}

#[test]
fn silent_module_times_out() {
    let mut serial = Serial::new(FakeModem::default());
    let mut modem: Sim800l<_, _> = Sim800l::new(&mut serial, Delay, config());

    // Not a full line, so the fake stays quiet
    assert_eq!(
        modem.send_at_command("AT").map(|r| r.len()),
        Err(Error::Timeout)
    );
}
