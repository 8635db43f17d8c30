use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A parameter failed validation before any byte was emitted.
    #[error("argument {name} out of range: {value}")]
    InvalidArgument { name: &'static str, value: i64 },

    /// A response buffer does not match the packet's fixed length. This is a
    /// contract violation by the caller or the device, not a recoverable
    /// wire condition.
    #[error("{what}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A telemetry byte holds a value outside the field's documented set.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: u8 },
}
