//! Bitfield views over single telemetry bytes. Each wraps the raw byte and
//! exposes named accessors for the documented bits; undocumented bits are
//! kept but ignored.

use crate::ProtocolError;

fn single_byte(what: &'static str, buf: &[u8]) -> Result<u8, ProtocolError> {
    if buf.len() == 1 {
        Ok(buf[0])
    } else {
        Err(ProtocolError::LengthMismatch {
            what,
            expected: 1,
            actual: buf.len(),
        })
    }
}

macro_rules! flag_view {
    ($(#[$meta:meta])* $name:ident, $what:literal, { $($(#[$fmeta:meta])* $field:ident => $mask:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(u8);

        impl $name {
            pub fn from_byte(byte: u8) -> Self {
                Self(byte)
            }

            pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
                single_byte($what, buf).map(Self)
            }

            pub fn raw(self) -> u8 {
                self.0
            }

            $(
                $(#[$fmeta])*
                pub fn $field(self) -> bool {
                    self.0 & $mask != 0
                }
            )+
        }
    };
}

flag_view!(
    /// Bump and wheel-drop state, packet 7.
    BumpsAndWheelDrops, "bumps_and_wheel_drops", {
        bump_right => 0x01,
        bump_left => 0x02,
        wheel_drop_right => 0x04,
        wheel_drop_left => 0x08,
    }
);

flag_view!(
    /// Actuator overcurrent flags, packet 14.
    WheelOvercurrents, "wheel_overcurrents", {
        side_brush => 0x01,
        main_brush => 0x02,
        right_wheel => 0x04,
        left_wheel => 0x08,
    }
);

flag_view!(
    /// Panel button state, packet 18.
    Buttons, "buttons", {
        clean => 0x01,
        spot => 0x02,
        dock => 0x04,
        minute => 0x08,
        hour => 0x10,
        day => 0x20,
        schedule => 0x40,
        clock => 0x80,
    }
);

flag_view!(
    /// Charging sources available, packet 34.
    ChargingSources, "charging_sources", {
        internal_charger => 0x01,
        home_base => 0x02,
    }
);

flag_view!(
    /// Light bumper detections, packet 45.
    LightBumper, "light_bumper", {
        left => 0x01,
        front_left => 0x02,
        center_left => 0x04,
        center_right => 0x08,
        front_right => 0x10,
        right => 0x20,
    }
);

flag_view!(
    /// Stasis caster state, packet 58.
    Stasis, "stasis", {
        toggling => 0x01,
        disabled => 0x02,
    }
);
