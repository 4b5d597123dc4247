//! In-memory stand-in for a SIM800L, answering over an `embedded-io` port.

use std::collections::VecDeque;

use embedded_io::{ErrorType, Read, ReadReady, Write, WriteReady};

/// A text mode SMS that the module accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sms {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Command,
    MessageEntry,
}

pub struct SimulatedModem {
    rssi: u8,
    echo: bool,
    text_mode: bool,
    state: State,
    recipient: String,
    line: Vec<u8>,
    out: VecDeque<u8>,
    outbox: Vec<Sms>,
    next_ref: u8,
}

impl SimulatedModem {
    pub fn new(rssi: u8) -> Self {
        Self {
            rssi,
            echo: true,
            text_mode: false,
            state: State::Command,
            recipient: String::new(),
            line: Vec::new(),
            out: VecDeque::new(),
            outbox: Vec::new(),
            next_ref: 1,
        }
    }

    pub fn outbox(&self) -> &[Sms] {
        &self.outbox
    }

    fn reply(&mut self, s: &str) {
        self.out.extend(s.as_bytes());
    }

    fn on_byte(&mut self, b: u8) {
        match self.state {
            State::MessageEntry => self.on_message_byte(b),
            State::Command => {
                self.line.push(b);
                if self.line.ends_with(b"\r\n") {
                    self.line.truncate(self.line.len() - 2);
                    let line = String::from_utf8_lossy(&self.line).into_owned();
                    self.line.clear();
                    self.on_command(&line);
                }
            }
        }
    }

    fn on_message_byte(&mut self, b: u8) {
        if self.echo {
            self.out.push_back(b);
        }

        if b != 0x1A {
            self.line.push(b);
            return;
        }

        let sms = Sms {
            to: core::mem::take(&mut self.recipient),
            body: String::from_utf8_lossy(&self.line).into_owned(),
        };
        self.line.clear();
        self.state = State::Command;

        log::info!("[module] accepted SMS {:?}", sms);
        self.outbox.push(sms);

        let reply = format!("\r\n+CMGS: {}\r\n\r\nOK\r\n", self.next_ref);
        self.next_ref = self.next_ref.wrapping_add(1);
        self.reply(&reply);
    }

    fn on_command(&mut self, line: &str) {
        log::debug!("[module] received {:?}", line);

        if self.echo {
            self.reply(line);
            self.reply("\r");
        }

        match line {
            "AT" => self.reply("\r\nOK\r\n"),
            "ATE0" => {
                self.echo = false;
                self.reply("\r\nOK\r\n");
            }
            "AT+CMGF=1" => {
                self.text_mode = true;
                self.reply("\r\nOK\r\n");
            }
            "AT+CSQ" => {
                let reply = format!("\r\n+CSQ: {},0\r\n\r\nOK\r\n", self.rssi);
                self.reply(&reply);
            }
            cmd => match cmd.strip_prefix("AT+CMGS=\"") {
                Some(rest) if self.text_mode => {
                    self.recipient = rest.trim_end_matches('"').to_string();
                    self.state = State::MessageEntry;
                    self.reply("\r\n> ");
                }
                Some(_) => self.reply("\r\n+CMS ERROR: 302\r\n"),
                None => self.reply("\r\nERROR\r\n"),
            },
        }
    }
}

#[derive(Debug)]
pub struct Never;

impl core::fmt::Display for Never {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("simulated modem never fails")
    }
}

impl core::error::Error for Never {}

impl embedded_io::Error for Never {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

impl ErrorType for SimulatedModem {
    type Error = Never;
}

impl Read for SimulatedModem {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.out.len());
        for (dst, src) in buf.iter_mut().zip(self.out.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

impl ReadReady for SimulatedModem {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.out.is_empty())
    }
}

impl Write for SimulatedModem {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for b in buf {
            self.on_byte(*b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl WriteReady for SimulatedModem {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
