//! oi-protocol: Open Interface wire protocol (no I/O)
//!
//! Pure encoding and decoding for the vendor "Open Interface" serial
//! protocol: command frames, sensor packet lengths, scalar and bitfield
//! telemetry decoding, composite sensor groups, and firmware banner
//! parsing for the distance/angle quirk decision.

mod error;
pub use error::ProtocolError;

mod command;
pub use command::{drive_radius, BaudCode, Command, Note, TimeSlot};

mod mode;
pub use mode::OiMode;

mod sensor;
pub use sensor::{decode_bool, decode_i16, decode_i8, decode_u16, decode_u8, SensorId};

mod flags;
pub use flags::{BumpsAndWheelDrops, Buttons, ChargingSources, LightBumper, Stasis, WheelOvercurrents};

mod group;
pub use group::{
    SensorGroup0, SensorGroup1, SensorGroup100, SensorGroup101, SensorGroup106, SensorGroup107,
    SensorGroup2, SensorGroup3, SensorGroup4, SensorGroup5, SensorGroup6,
};

mod firmware;
pub use firmware::{
    angle_from_encoder_counts, distance_from_encoder_counts, quirks_required, FirmwareVersion,
    MM_PER_TICK, TICKS_PER_REV, WHEEL_BASE_MM, WHEEL_DIAMETER_MM,
};
