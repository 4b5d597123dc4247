use std::{cell::RefCell, collections::VecDeque, rc::Rc, vec::Vec};

use embassy_time::Duration;

use crate::{Error, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Transmit(Vec<u8>),
    Receive(usize),
    Delay(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Transport recording every call into a shared log, and answering each
/// receive with the next scripted reply or failure. An exhausted script
/// behaves like a silent module.
pub struct MockTransport {
    log: EventLog,
    replies: VecDeque<Result<Vec<u8>, Error>>,
    pub tx_timeouts: Vec<Duration>,
    pub rx_timeouts: Vec<Duration>,
}

impl MockTransport {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            replies: VecDeque::new(),
            tx_timeouts: Vec::new(),
            rx_timeouts: Vec::new(),
        }
    }

    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn fail(mut self, error: Error) -> Self {
        self.replies.push_back(Err(error));
        self
    }
}

impl Transport for MockTransport {
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<(), Error> {
        self.tx_timeouts.push(timeout);
        self.log.borrow_mut().push(Event::Transmit(bytes.to_vec()));
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Error> {
        self.rx_timeouts.push(timeout);
        self.log.borrow_mut().push(Event::Receive(buf.len()));

        let reply = self.replies.pop_front().unwrap_or(Err(Error::Timeout))?;
        let n = reply.len().min(buf.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(n)
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::Delay(ms));
    }
}
