use embassy_time::Duration;
use embedded_io::{Read, ReadReady, Write, WriteReady};

use crate::{helpers::LossyStr, timer::Deadline, Error};

/// Byte oriented link to the module.
///
/// Both operations block. `Duration::MAX` asks for an unbounded wait.
pub trait Transport {
    /// Send all of `bytes`, or fail with [`Error::Timeout`] if the link does
    /// not accept them before `timeout` passes.
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<(), Error>;

    /// Fill `buf` with received bytes.
    ///
    /// Returns once `buf` is full, or when `timeout` passes with at least one
    /// byte captured, reporting how many bytes were written. Fails with
    /// [`Error::Timeout`] if nothing arrived in time, and with [`Error::Read`]
    /// if the link fails or closes before anything arrived.
    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<(), Error> {
        T::transmit(self, bytes, timeout)
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Error> {
        T::receive(self, buf, timeout)
    }
}

/// [`Transport`] over any `embedded-io` serial port.
///
/// Deadlines are enforced by polling the port's readiness, so a read or write
/// is only issued once it can complete without blocking.
pub struct Serial<RW> {
    inner: RW,
}

impl<RW> Serial<RW> {
    pub fn new(inner: RW) -> Self {
        Self { inner }
    }

    pub fn inner_mut(&mut self) -> &mut RW {
        &mut self.inner
    }

    pub fn release(self) -> RW {
        self.inner
    }
}

impl<RW> Transport for Serial<RW>
where
    RW: Read + ReadReady + Write + WriteReady,
{
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<(), Error> {
        let deadline = Deadline::after(timeout);
        let mut pos = 0;

        while pos < bytes.len() {
            let n = deadline.poll(Error::Timeout, || {
                if !self.inner.write_ready().map_err(|_| Error::Write)? {
                    return Ok(None);
                }
                match self.inner.write(&bytes[pos..]) {
                    Ok(0) | Err(_) => Err(Error::Write),
                    Ok(n) => Ok(Some(n)),
                }
            })?;
            pos += n;
        }

        self.inner.flush().map_err(|_| Error::Write)
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Error> {
        let deadline = Deadline::after(timeout);
        let mut pos = 0;

        while pos < buf.len() {
            if self.inner.read_ready().map_err(|_| Error::Read)? {
                match self.inner.read(&mut buf[pos..]) {
                    Ok(0) if pos == 0 => {
                        warn!("Serial port reached end of stream");
                        return Err(Error::Read);
                    }
                    Ok(0) => {
                        warn!("Serial port reached end of stream after {} bytes", pos);
                        break;
                    }
                    Ok(n) => {
                        pos += n;
                        trace!("Received ({}/{}): {:?}", pos, buf.len(), LossyStr(&buf[..pos]));
                    }
                    Err(_) => return Err(Error::Read),
                }
            } else if deadline.has_expired() {
                break;
            }
        }

        match pos {
            0 if !buf.is_empty() => Err(Error::Timeout),
            n => Ok(n),
        }
    }
}
