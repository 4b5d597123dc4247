#[cfg(feature = "std")]
pub mod port;
#[cfg(feature = "std")]
pub mod simulated;
