//! serial-transport: blocking byte-oriented serial links
//!
//! This crate provides the transport trait the OI driver speaks over, with
//! feature-gated backends. The default build enables a scripted `mock`
//! backend so that the driver and its tests compile on any host without
//! native serial drivers.

mod error;
pub use error::{Result, TransportError};

mod traits;
pub use traits::SerialLink;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockLink;

#[cfg(feature = "serial")]
mod uart;

#[cfg(feature = "serial")]
pub use uart::UartLink;
