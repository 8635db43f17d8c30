use crate::ProtocolError;

/// Addressable telemetry packets. Each id maps to a fixed response length;
/// ids 0 through 6 and 100/101/106/107 are composite groups, the rest are
/// individual sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorId {
    Group0 = 0,
    Group1 = 1,
    Group2 = 2,
    Group3 = 3,
    Group4 = 4,
    Group5 = 5,
    Group6 = 6,
    BumpsAndWheelDrops = 7,
    Wall = 8,
    CliffLeft = 9,
    CliffFrontLeft = 10,
    CliffFrontRight = 11,
    CliffRight = 12,
    VirtualWall = 13,
    WheelOvercurrents = 14,
    DirtDetect = 15,
    Unused16 = 16,
    IrCharOmni = 17,
    Buttons = 18,
    Distance = 19,
    Angle = 20,
    ChargingState = 21,
    Voltage = 22,
    Current = 23,
    Temperature = 24,
    BatteryCharge = 25,
    BatteryCapacity = 26,
    WallSignal = 27,
    CliffLeftSignal = 28,
    CliffFrontLeftSignal = 29,
    CliffFrontRightSignal = 30,
    CliffRightSignal = 31,
    Unused32 = 32,
    Unused33 = 33,
    ChargingSources = 34,
    OiMode = 35,
    SongNumber = 36,
    SongPlaying = 37,
    StreamPacketCount = 38,
    RequestedVelocity = 39,
    RequestedRadius = 40,
    RequestedRightVelocity = 41,
    RequestedLeftVelocity = 42,
    LeftEncoderCounts = 43,
    RightEncoderCounts = 44,
    LightBumper = 45,
    LightBumpLeftSignal = 46,
    LightBumpFrontLeftSignal = 47,
    LightBumpCenterLeftSignal = 48,
    LightBumpCenterRightSignal = 49,
    LightBumpFrontRightSignal = 50,
    LightBumpRightSignal = 51,
    IrCharLeft = 52,
    IrCharRight = 53,
    LeftMotorCurrent = 54,
    RightMotorCurrent = 55,
    MainBrushMotorCurrent = 56,
    SideBrushMotorCurrent = 57,
    Stasis = 58,
    Group100 = 100,
    Group101 = 101,
    Group106 = 106,
    Group107 = 107,
}

impl SensorId {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        use SensorId::*;
        Ok(match value {
            0 => Group0,
            1 => Group1,
            2 => Group2,
            3 => Group3,
            4 => Group4,
            5 => Group5,
            6 => Group6,
            7 => BumpsAndWheelDrops,
            8 => Wall,
            9 => CliffLeft,
            10 => CliffFrontLeft,
            11 => CliffFrontRight,
            12 => CliffRight,
            13 => VirtualWall,
            14 => WheelOvercurrents,
            15 => DirtDetect,
            16 => Unused16,
            17 => IrCharOmni,
            18 => Buttons,
            19 => Distance,
            20 => Angle,
            21 => ChargingState,
            22 => Voltage,
            23 => Current,
            24 => Temperature,
            25 => BatteryCharge,
            26 => BatteryCapacity,
            27 => WallSignal,
            28 => CliffLeftSignal,
            29 => CliffFrontLeftSignal,
            30 => CliffFrontRightSignal,
            31 => CliffRightSignal,
            32 => Unused32,
            33 => Unused33,
            34 => ChargingSources,
            35 => OiMode,
            36 => SongNumber,
            37 => SongPlaying,
            38 => StreamPacketCount,
            39 => RequestedVelocity,
            40 => RequestedRadius,
            41 => RequestedRightVelocity,
            42 => RequestedLeftVelocity,
            43 => LeftEncoderCounts,
            44 => RightEncoderCounts,
            45 => LightBumper,
            46 => LightBumpLeftSignal,
            47 => LightBumpFrontLeftSignal,
            48 => LightBumpCenterLeftSignal,
            49 => LightBumpCenterRightSignal,
            50 => LightBumpFrontRightSignal,
            51 => LightBumpRightSignal,
            52 => IrCharLeft,
            53 => IrCharRight,
            54 => LeftMotorCurrent,
            55 => RightMotorCurrent,
            56 => MainBrushMotorCurrent,
            57 => SideBrushMotorCurrent,
            58 => Stasis,
            100 => Group100,
            101 => Group101,
            106 => Group106,
            107 => Group107,
            _ => {
                return Err(ProtocolError::InvalidValue {
                    field: "sensor_id",
                    value,
                })
            }
        })
    }

    /// Exact byte length of this packet's response. Any other length on the
    /// wire is a protocol violation.
    pub fn response_len(self) -> usize {
        use SensorId::*;
        match self {
            Group0 => 26,
            Group1 => 10,
            Group2 => 6,
            Group3 => 10,
            Group4 => 14,
            Group5 => 12,
            Group6 => 52,
            Group100 => 80,
            Group101 => 28,
            Group106 => 12,
            Group107 => 9,
            Unused32 | Unused33 => 3,
            Distance | Angle | Voltage | Current | BatteryCharge | BatteryCapacity
            | WallSignal | CliffLeftSignal | CliffFrontLeftSignal | CliffFrontRightSignal
            | CliffRightSignal | RequestedVelocity | RequestedRadius | RequestedRightVelocity
            | RequestedLeftVelocity | LeftEncoderCounts | RightEncoderCounts
            | LightBumpLeftSignal | LightBumpFrontLeftSignal | LightBumpCenterLeftSignal
            | LightBumpCenterRightSignal | LightBumpFrontRightSignal | LightBumpRightSignal
            | LeftMotorCurrent | RightMotorCurrent | MainBrushMotorCurrent
            | SideBrushMotorCurrent => 2,
            _ => 1,
        }
    }
}

fn check_len(what: &'static str, expected: usize, buf: &[u8]) -> Result<(), ProtocolError> {
    if buf.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::LengthMismatch {
            what,
            expected,
            actual: buf.len(),
        })
    }
}

/// Decode a one-byte boolean. Only 0 and 1 are legal on the wire.
pub fn decode_bool(what: &'static str, buf: &[u8]) -> Result<bool, ProtocolError> {
    check_len(what, 1, buf)?;
    match buf[0] {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(ProtocolError::InvalidValue { field: what, value }),
    }
}

pub fn decode_u8(what: &'static str, buf: &[u8]) -> Result<u8, ProtocolError> {
    check_len(what, 1, buf)?;
    Ok(buf[0])
}

pub fn decode_i8(what: &'static str, buf: &[u8]) -> Result<i8, ProtocolError> {
    check_len(what, 1, buf)?;
    Ok(buf[0] as i8)
}

pub fn decode_u16(what: &'static str, buf: &[u8]) -> Result<u16, ProtocolError> {
    check_len(what, 2, buf)?;
    Ok(u16::from_be_bytes([buf[0], buf[1]]))
}

pub fn decode_i16(what: &'static str, buf: &[u8]) -> Result<i16, ProtocolError> {
    check_len(what, 2, buf)?;
    Ok(i16::from_be_bytes([buf[0], buf[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_lengths() {
        assert_eq!(SensorId::Group0.response_len(), 26);
        assert_eq!(SensorId::Group6.response_len(), 52);
        assert_eq!(SensorId::Group100.response_len(), 80);
        assert_eq!(SensorId::Group101.response_len(), 28);
        assert_eq!(SensorId::Group106.response_len(), 12);
        assert_eq!(SensorId::Group107.response_len(), 9);
        assert_eq!(SensorId::BumpsAndWheelDrops.response_len(), 1);
        assert_eq!(SensorId::Distance.response_len(), 2);
        assert_eq!(SensorId::Unused32.response_len(), 3);
        assert_eq!(SensorId::Unused33.response_len(), 3);
        assert_eq!(SensorId::OiMode.response_len(), 1);
        assert_eq!(SensorId::Stasis.response_len(), 1);
        assert_eq!(SensorId::SideBrushMotorCurrent.response_len(), 2);
    }

    #[test]
    fn test_id_round_trip() {
        for raw in (0..=58).chain([100, 101, 106, 107]) {
            let id = SensorId::from_u8(raw).unwrap();
            assert_eq!(id.as_u8(), raw);
        }
        assert!(SensorId::from_u8(59).is_err());
        assert!(SensorId::from_u8(99).is_err());
        assert!(SensorId::from_u8(108).is_err());
    }

    #[test]
    fn test_scalar_decoders() {
        assert_eq!(decode_u8("x", &[0xFF]).unwrap(), 255);
        assert_eq!(decode_i8("x", &[0xFF]).unwrap(), -1);
        assert_eq!(decode_u16("x", &[0x01, 0xF4]).unwrap(), 500);
        assert_eq!(decode_i16("x", &[0xFF, 0x38]).unwrap(), -200);
        assert!(decode_bool("x", &[0]).unwrap() == false);
        assert!(decode_bool("x", &[1]).unwrap());
    }

    #[test]
    fn test_decoders_reject_bad_input() {
        assert_eq!(
            decode_i16("voltage", &[0x01]),
            Err(ProtocolError::LengthMismatch {
                what: "voltage",
                expected: 2,
                actual: 1
            })
        );
        assert!(decode_u8("x", &[]).is_err());
        assert_eq!(
            decode_bool("wall", &[2]),
            Err(ProtocolError::InvalidValue {
                field: "wall",
                value: 2
            })
        );
    }
}
