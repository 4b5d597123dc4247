//! [`Transport`] over a host serial port.

use std::io::{self, Read, Write};
use std::time::Instant;

use serialport::SerialPort;
use sim800l::{embassy_time::Duration, Error, Transport};

/// Upper bound for a single blocking read or write, so an unbounded wait
/// still wakes up regularly.
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

pub struct Port(pub Box<dyn SerialPort>);

impl Port {
    pub fn open(path: &str, baud_rate: u32) -> serialport::Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(POLL_INTERVAL)
            .open()?;
        Ok(Self(port))
    }
}

fn deadline(timeout: Duration) -> Option<Instant> {
    if timeout == Duration::MAX {
        return None;
    }
    Instant::now().checked_add(std::time::Duration::from_micros(timeout.as_micros()))
}

/// Port timeout for the next blocking call, or `None` once `deadline` has
/// passed. No deadline means wait forever, one interval at a time.
fn next_wait(deadline: Option<Instant>, now: Instant) -> Option<std::time::Duration> {
    match deadline {
        Some(deadline) => {
            let left = deadline.saturating_duration_since(now);
            (!left.is_zero()).then(|| left.min(POLL_INTERVAL))
        }
        None => Some(POLL_INTERVAL),
    }
}

impl Transport for Port {
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<(), Error> {
        let deadline = deadline(timeout);
        let mut pos = 0;

        while pos < bytes.len() {
            let wait = next_wait(deadline, Instant::now()).ok_or(Error::Timeout)?;
            self.0.set_timeout(wait).map_err(|_| Error::Write)?;

            match self.0.write(&bytes[pos..]) {
                Ok(0) => return Err(Error::Write),
                Ok(n) => pos += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(_) => return Err(Error::Write),
            }
        }

        self.0.flush().map_err(|_| Error::Write)
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Error> {
        let deadline = deadline(timeout);
        let mut pos = 0;

        while pos < buf.len() {
            let Some(wait) = next_wait(deadline, Instant::now()) else {
                break;
            };
            self.0.set_timeout(wait).map_err(|_| Error::Read)?;

            match self.0.read(&mut buf[pos..]) {
                Ok(n) => pos += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(_) => return Err(Error::Read),
            }
        }

        match pos {
            0 if !buf.is_empty() => Err(Error::Timeout),
            n => Ok(n),
        }
    }
}
