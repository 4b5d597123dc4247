//! Blocking AT command channel for SIM800L GSM modules.
//!
//! The driver speaks a minimal command set over a serial link: bring the
//! module up, query signal quality and send SMS messages in text mode. Every
//! exchange is a single transmit followed by a single receive into a
//! fixed-capacity [`Response`] buffer. Replies are handed back as raw bytes;
//! interpreting them is up to the caller.
//!
//! The serial link is anything implementing [`Transport`]. [`Serial`] adapts
//! any `embedded-io` port, and the timer is any `embedded-hal`
//! [`DelayNs`](embedded_hal::delay::DelayNs) implementation, such as
//! `embassy_time::Delay`.
//!
//! # Examples
//!
//! ```ignore
//! use sim800l::{Config, Serial, Sim800l};
//!
//! let mut modem: Sim800l<_, _> =
//!     Sim800l::new(Serial::new(uart), embassy_time::Delay, Config::default());
//!
//! modem.init()?;
//!
//! let csq = modem.read_signal_quality()?;
//! // e.g. "\r\n+CSQ: 18,0\r\n\r\nOK\r\n"
//! let _ = csq.as_bytes();
//!
//! modem.send_sms("+15551234567", "Hello")?;
//! ```
//!
//! With the default [`Config`] every transmit and receive waits as long as
//! it takes, and a receive only returns once the whole buffer is full. Use
//! [`Config::rx_timeout`] to get short replies back.
//!
//! # Optional Cargo Features
//!
//! - **`log`** *(disabled by default)*: Logs commands and responses through
//!   the `log` facade, raw bytes on the `TRACE` level.
//! - **`defmt`** *(disabled by default)*: Same, through `defmt`.
//! - **`std`** *(disabled by default)*: Enables the `std` features of
//!   `embassy-time` and `embedded-io`.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod client;
pub mod command;
mod config;
mod error;
pub mod helpers;
mod response;
mod timer;
mod transport;

#[cfg(test)]
mod mock;

pub use client::Sim800l;
pub use command::Command;
pub use config::{Config, Overflow};
pub use error::Error;
pub use response::{Response, RESPONSE_BUF_SIZE};
pub use transport::{Serial, Transport};

// Re-export the versions of the capability crates in use
pub use embassy_time;
pub use embedded_hal;
pub use embedded_io;
