use crate::ProtocolError;

/// Open Interface session mode as reported by the OI mode packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OiMode {
    Off = 0,
    Passive = 1,
    Safe = 2,
    Full = 3,
}

impl OiMode {
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Passive),
            2 => Ok(Self::Safe),
            3 => Ok(Self::Full),
            _ => Err(ProtocolError::InvalidValue {
                field: "oi_mode",
                value,
            }),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
