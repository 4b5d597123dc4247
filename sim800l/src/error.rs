/// Errors returned by the crate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Serial read error
    Read,
    /// Serial write error
    Write,
    /// Nothing arrived before the configured deadline
    Timeout,
    /// Command does not fit its formatting buffer
    Overflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read => f.write_str("serial read error"),
            Self::Write => f.write_str("serial write error"),
            Self::Timeout => f.write_str("no response within deadline"),
            Self::Overflow => f.write_str("command exceeds buffer capacity"),
        }
    }
}

impl core::error::Error for Error {}
