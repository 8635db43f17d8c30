//! oi-driver: synchronous Open Interface session driver
//!
//! Owns a serial link and drives the robot's command/response protocol:
//! the Off/Passive/Safe/Full mode state machine with read-back
//! verification, lazy auto-wake before stale sends, quirk-aware odometry,
//! and typed accessors for every sensor packet and group.
//!
//! The protocol has no pipelining, so a session is single-writer by
//! construction; share one behind a lock if multiple tasks need it.

mod error;
pub use error::{DriverError, Result};

mod session;
pub use session::{OiSession, SessionOptions, POWER_SAVE_WINDOW};

pub use oi_protocol as protocol;
pub use serial_transport as transport;
