use oi_protocol::{OiMode, ProtocolError};
use serial_transport::TransportError;
use thiserror::Error;

pub type Result<T, E = DriverError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DriverError {
    /// The transport could not be opened. Fatal to session construction.
    #[error("failed to connect on {port} at {baud} baud")]
    Connection {
        port: String,
        baud: u32,
        #[source]
        source: TransportError,
    },

    /// A mode transition's read-back did not match the request. The session
    /// stays in the observed mode; nothing is rolled back.
    #[error("mode change to {requested:?} refused, device reports {actual:?}")]
    ModeChange { requested: OiMode, actual: OiMode },

    /// A sensor read returned fewer bytes than the packet's fixed length
    /// before the timeout. The driver never retries; that policy belongs to
    /// the caller.
    #[error("sensor {sensor} returned {actual} of {expected} bytes")]
    Communication {
        sensor: u8,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
