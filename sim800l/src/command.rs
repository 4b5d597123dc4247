//! AT command vocabulary of the SIM800L, and bounded formatting of the
//! commands that carry caller-supplied text.

use core::fmt::Write;

use heapless::String;

use crate::{config::Overflow, Error};

/// Connectivity check
pub const AT: &str = "AT\r\n";
/// Disable command echo
pub const ECHO_OFF: &str = "ATE0\r\n";
/// Select text mode SMS
pub const SMS_TEXT_MODE: &str = "AT+CMGF=1\r\n";
/// Query received signal strength and bit error rate
pub const SIGNAL_QUALITY: &str = "AT+CSQ\r\n";
/// Start of the send SMS command, followed by the destination number
pub const SEND_SMS: &str = "AT+CMGS=\"";

/// Ctrl+Z, ends message entry and submits the SMS.
pub const CTRL_Z: u8 = 0x1A;

/// Size of the buffer the `AT+CMGS` command is assembled in. One byte is
/// reserved as terminator, so at most `SMS_COMMAND_CAPACITY - 1` bytes are
/// ever sent.
pub const SMS_COMMAND_CAPACITY: usize = 50;

/// A command assembled at runtime in a fixed-size buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<const N: usize> {
    buf: String<N>,
    truncated: bool,
}

impl Command<SMS_COMMAND_CAPACITY> {
    /// Build `AT+CMGS="<phone_number>"\r\n`.
    ///
    /// The phone number is not validated. If the command does not fit, it is
    /// either cut at `SMS_COMMAND_CAPACITY - 1` bytes or rejected, depending
    /// on `overflow`.
    pub fn send_sms(phone_number: &str, overflow: Overflow) -> Result<Self, Error> {
        Self::format(
            format_args!("{}{}\"\r\n", SEND_SMS, phone_number),
            overflow,
        )
    }
}

impl<const N: usize> Command<N> {
    pub fn format(args: core::fmt::Arguments<'_>, overflow: Overflow) -> Result<Self, Error> {
        let mut writer = BoundedWriter {
            buf: String::new(),
            limit: N.saturating_sub(1),
            overflow,
            truncated: false,
        };

        writer.write_fmt(args).map_err(|_| Error::Overflow)?;

        if writer.truncated {
            warn!(
                "Command truncated to {} bytes: {:?}",
                writer.buf.len(),
                writer.buf.as_str()
            );
        }

        Ok(Self {
            buf: writer.buf,
            truncated: writer.truncated,
        })
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Whether part of the formatted text was dropped to fit the buffer.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const N: usize> AsRef<[u8]> for Command<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

struct BoundedWriter<const N: usize> {
    buf: String<N>,
    limit: usize,
    overflow: Overflow,
    truncated: bool,
}

impl<const N: usize> Write for BoundedWriter<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.truncated {
            return Ok(());
        }

        for c in s.chars() {
            if self.buf.len() + c.len_utf8() > self.limit {
                match self.overflow {
                    Overflow::Reject => return Err(core::fmt::Error),
                    Overflow::Truncate => {
                        self.truncated = true;
                        return Ok(());
                    }
                }
            }
            self.buf.push(c).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}
