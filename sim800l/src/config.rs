use embassy_time::Duration;

/// What to do when a formatted command does not fit its buffer.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Keep as much of the command as fits and send it anyway.
    #[default]
    Truncate,
    /// Fail with [`Error::Overflow`](crate::Error::Overflow) before anything
    /// is transmitted.
    Reject,
}

/// Configuration of the command channel.
///
/// The defaults reproduce the classic SIM800L driver behaviour: both
/// directions wait forever, the SMS prompt is given one second, and long
/// commands are silently truncated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) tx_timeout: Duration,
    pub(crate) rx_timeout: Duration,
    pub(crate) prompt_delay: Duration,
    pub(crate) overflow: Overflow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tx_timeout: Duration::MAX,
            rx_timeout: Duration::MAX,
            prompt_delay: Duration::from_millis(1000),
            overflow: Overflow::Truncate,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Max time to wait for the transport to accept a command.
    /// `Duration::MAX` waits forever.
    #[must_use]
    pub const fn tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }

    /// Max time to wait for the response buffer to fill.
    /// `Duration::MAX` waits forever.
    #[must_use]
    pub const fn rx_timeout(mut self, timeout: Duration) -> Self {
        self.rx_timeout = timeout;
        self
    }

    /// Time given to the module to switch into message entry after
    /// `AT+CMGS`.
    #[must_use]
    pub const fn prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }

    #[must_use]
    pub const fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }
}
