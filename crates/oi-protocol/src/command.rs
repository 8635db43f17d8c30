use crate::{ProtocolError, SensorId};

/// Reserved radius values for [`Command::Drive`]. These are compared and
/// transmitted as unsigned 16-bit quantities, unlike curvature radii which
/// travel as signed 16-bit millimetres.
pub mod drive_radius {
    /// Drive straight.
    pub const STRAIGHT: i32 = 0x8000;
    /// Alternate encoding of "drive straight" accepted by the firmware.
    pub const STRAIGHT_ALT: i32 = 0x7FFF;
    /// Spin in place, clockwise.
    pub const TURN_CLOCKWISE: i32 = 0xFFFF;
    /// Spin in place, counter-clockwise.
    pub const TURN_COUNTER_CLOCKWISE: i32 = 0x0001;
}

/// Serial baud rate codes accepted by the set-baud command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BaudCode {
    B300 = 0,
    B600 = 1,
    B1200 = 2,
    B2400 = 3,
    B4800 = 4,
    B9600 = 5,
    B14400 = 6,
    B19200 = 7,
    B28800 = 8,
    B38400 = 9,
    B57600 = 10,
    B115200 = 11,
}

impl BaudCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Default for BaudCode {
    fn default() -> Self {
        Self::B115200
    }
}

/// One song note. Pitches outside 31..=127 are transmitted as 0, the "rest"
/// sentinel; the firmware treats anything below 31 as silence, so the
/// encoder clamps rather than rejects. Durations are in 1/64ths of a second
/// and must fit a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub pitch: u8,
    pub duration: u16,
}

impl Note {
    pub fn new(pitch: u8, duration: u16) -> Self {
        Self { pitch, duration }
    }
}

/// One day's scheduled cleaning time. A slot is active when either field is
/// non-zero; the day mask byte of the schedule frame is derived from that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSlot {
    pub hour: u8,
    pub minute: u8,
}

impl TimeSlot {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn is_active(self) -> bool {
        self.hour != 0 || self.minute != 0
    }
}

// Motor bitmask
const MOTOR_SIDE_BRUSH: u8 = 0x01;
const MOTOR_VACUUM: u8 = 0x02;
const MOTOR_MAIN_BRUSH: u8 = 0x04;
const MOTOR_SIDE_BRUSH_DIRECTION: u8 = 0x08;
const MOTOR_MAIN_BRUSH_DIRECTION: u8 = 0x10;

// LED bitmask
const LED_DEBRIS: u8 = 0x01;
const LED_SPOT: u8 = 0x02;
const LED_DOCK: u8 = 0x04;
const LED_CHECK_ROBOT: u8 = 0x08;

// Scheduling LED bitmasks
const SCHED_LED_COLON: u8 = 0x01;
const SCHED_LED_PM: u8 = 0x02;
const SCHED_LED_AM: u8 = 0x04;
const SCHED_LED_CLOCK: u8 = 0x08;
const SCHED_LED_SCHEDULE: u8 = 0x10;

// Button bitmask
const BUTTON_CLEAN: u8 = 0x01;
const BUTTON_SPOT: u8 = 0x02;
const BUTTON_DOCK: u8 = 0x04;
const BUTTON_MINUTE: u8 = 0x08;
const BUTTON_HOUR: u8 = 0x10;
const BUTTON_DAY: u8 = 0x20;
const BUTTON_SCHEDULE: u8 = 0x40;
const BUTTON_CLOCK: u8 = 0x80;

/// An Open Interface command frame. Every variant serializes to its fixed
/// opcode byte followed by a fixed-length payload; only [`Command::SetSong`]
/// has a variable length (3 + 2 x note count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Reset,
    Stop,
    /// Permissive over any code byte; see [`BaudCode`] for the defined set.
    SetBaud { code: u8 },
    SetModePassive,
    SetModeSafe,
    SetModeFull,
    Clean,
    CleanMax,
    CleanSpot,
    SeekDock,
    PowerDown,
    /// Cleaning schedule, Sunday through Saturday.
    SetSchedule { slots: [TimeSlot; 7] },
    /// Day of week (0 = Sunday) and 24-hour clock time.
    SetDayTime { day: u8, hour: u8, minute: u8 },
    /// Velocity in mm/s, radius in mm or one of the [`drive_radius`]
    /// sentinels.
    Drive { velocity: i16, radius: i32 },
    /// Per-wheel velocities in mm/s.
    DriveDirect { right: i16, left: i16 },
    /// Raw per-wheel PWM duty, -255..=255.
    DrivePwm { right: i16, left: i16 },
    SetMotors {
        main_brush: bool,
        main_brush_reverse: bool,
        side_brush: bool,
        side_brush_reverse: bool,
        vacuum: bool,
    },
    /// Brush duties -127..=127, vacuum duty 0..=127.
    SetMotorsPwm { main_brush: i8, side_brush: i8, vacuum: i8 },
    SetLeds {
        debris: bool,
        spot: bool,
        dock: bool,
        check_robot: bool,
        power_color: u8,
        power_intensity: u8,
    },
    SetSchedulingLeds {
        sun: bool,
        mon: bool,
        tues: bool,
        wed: bool,
        thurs: bool,
        fri: bool,
        sat: bool,
        schedule: bool,
        clock: bool,
        am: bool,
        pm: bool,
        colon: bool,
    },
    /// Raw seven-segment digits, leftmost first.
    SetRawLeds { digit1: u8, digit2: u8, digit3: u8, digit4: u8 },
    /// ASCII codes for the four-character display, leftmost first.
    SetAsciiLeds { char1: u8, char2: u8, char3: u8, char4: u8 },
    TriggerButtons {
        clean: bool,
        spot: bool,
        dock: bool,
        minute: bool,
        hour: bool,
        day: bool,
        schedule: bool,
        clock: bool,
    },
    SetSong { number: u8, notes: Vec<Note> },
    PlaySong { number: u8 },
    RequestSensor { id: SensorId },
}

impl Command {
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Start | Command::SetModePassive => 128,
            Command::Reset => 7,
            Command::Stop => 173,
            Command::SetBaud { .. } => 129,
            Command::SetModeSafe => 131,
            Command::SetModeFull => 132,
            Command::Clean => 135,
            Command::CleanMax => 136,
            Command::CleanSpot => 134,
            Command::SeekDock => 143,
            Command::PowerDown => 133,
            Command::SetSchedule { .. } => 167,
            Command::SetDayTime { .. } => 168,
            Command::Drive { .. } => 137,
            Command::DriveDirect { .. } => 145,
            Command::DrivePwm { .. } => 146,
            Command::SetMotors { .. } => 138,
            Command::SetMotorsPwm { .. } => 144,
            Command::SetLeds { .. } => 139,
            Command::SetSchedulingLeds { .. } => 162,
            Command::SetRawLeds { .. } => 163,
            Command::SetAsciiLeds { .. } => 164,
            Command::TriggerButtons { .. } => 165,
            Command::SetSong { .. } => 140,
            Command::PlaySong { .. } => 141,
            Command::RequestSensor { .. } => 142,
        }
    }

    /// Validate the arguments and serialize the frame. Validation failures
    /// surface as [`ProtocolError::InvalidArgument`] before any byte is
    /// produced.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let op = self.opcode();
        match *self {
            Command::Start
            | Command::SetModePassive
            | Command::Reset
            | Command::Stop
            | Command::SetModeSafe
            | Command::SetModeFull
            | Command::Clean
            | Command::CleanMax
            | Command::CleanSpot
            | Command::SeekDock
            | Command::PowerDown => Ok(vec![op]),

            Command::SetBaud { code } => Ok(vec![op, code]),

            Command::SetSchedule { slots } => {
                let mut frame = Vec::with_capacity(16);
                frame.push(op);
                frame.push(day_mask(&slots));
                for (day, slot) in slots.iter().enumerate() {
                    check_hour(slot.hour, SCHEDULE_HOUR_NAMES[day])?;
                    check_minute(slot.minute, SCHEDULE_MINUTE_NAMES[day])?;
                    frame.push(slot.hour);
                    frame.push(slot.minute);
                }
                Ok(frame)
            }

            Command::SetDayTime { day, hour, minute } => {
                if day > 6 {
                    return Err(out_of_range("day", day as i64));
                }
                check_hour(hour, "hour")?;
                check_minute(minute, "minute")?;
                Ok(vec![op, day, hour, minute])
            }

            Command::Drive { velocity, radius } => {
                check_velocity(velocity, "velocity")?;
                let is_sentinel = matches!(
                    radius,
                    drive_radius::STRAIGHT
                        | drive_radius::STRAIGHT_ALT
                        | drive_radius::TURN_CLOCKWISE
                        | drive_radius::TURN_COUNTER_CLOCKWISE
                );
                let mut frame = Vec::with_capacity(5);
                frame.push(op);
                frame.extend_from_slice(&velocity.to_be_bytes());
                if is_sentinel {
                    // Sentinels travel as unsigned 16-bit values
                    frame.extend_from_slice(&(radius as u16).to_be_bytes());
                } else if (-2000..=2000).contains(&radius) {
                    frame.extend_from_slice(&(radius as i16).to_be_bytes());
                } else {
                    return Err(out_of_range("radius", radius as i64));
                }
                Ok(frame)
            }

            Command::DriveDirect { right, left } => {
                check_velocity(right, "right_velocity")?;
                check_velocity(left, "left_velocity")?;
                Ok(pack_i16_pair(op, right, left))
            }

            Command::DrivePwm { right, left } => {
                check_range(right as i64, -255, 255, "right_pwm")?;
                check_range(left as i64, -255, 255, "left_pwm")?;
                Ok(pack_i16_pair(op, right, left))
            }

            Command::SetMotors {
                main_brush,
                main_brush_reverse,
                side_brush,
                side_brush_reverse,
                vacuum,
            } => {
                let mut motors = 0u8;
                if main_brush {
                    motors |= MOTOR_MAIN_BRUSH;
                }
                if main_brush_reverse {
                    motors |= MOTOR_MAIN_BRUSH_DIRECTION;
                }
                if side_brush {
                    motors |= MOTOR_SIDE_BRUSH;
                }
                if side_brush_reverse {
                    motors |= MOTOR_SIDE_BRUSH_DIRECTION;
                }
                if vacuum {
                    motors |= MOTOR_VACUUM;
                }
                Ok(vec![op, motors])
            }

            Command::SetMotorsPwm {
                main_brush,
                side_brush,
                vacuum,
            } => {
                check_range(main_brush as i64, -127, 127, "main_brush_pwm")?;
                check_range(side_brush as i64, -127, 127, "side_brush_pwm")?;
                check_range(vacuum as i64, 0, 127, "vacuum_pwm")?;
                Ok(vec![op, main_brush as u8, side_brush as u8, vacuum as u8])
            }

            Command::SetLeds {
                debris,
                spot,
                dock,
                check_robot,
                power_color,
                power_intensity,
            } => {
                let mut leds = 0u8;
                if debris {
                    leds |= LED_DEBRIS;
                }
                if spot {
                    leds |= LED_SPOT;
                }
                if dock {
                    leds |= LED_DOCK;
                }
                if check_robot {
                    leds |= LED_CHECK_ROBOT;
                }
                Ok(vec![op, leds, power_color, power_intensity])
            }

            Command::SetSchedulingLeds {
                sun,
                mon,
                tues,
                wed,
                thurs,
                fri,
                sat,
                schedule,
                clock,
                am,
                pm,
                colon,
            } => {
                let days = [sun, mon, tues, wed, thurs, fri, sat]
                    .iter()
                    .enumerate()
                    .filter(|(_, &on)| on)
                    .fold(0u8, |mask, (i, _)| mask | (1 << i));
                let mut leds = 0u8;
                if schedule {
                    leds |= SCHED_LED_SCHEDULE;
                }
                if clock {
                    leds |= SCHED_LED_CLOCK;
                }
                if am {
                    leds |= SCHED_LED_AM;
                }
                if pm {
                    leds |= SCHED_LED_PM;
                }
                if colon {
                    leds |= SCHED_LED_COLON;
                }
                Ok(vec![op, days, leds])
            }

            // The display expects the rightmost digit first
            Command::SetRawLeds {
                digit1,
                digit2,
                digit3,
                digit4,
            } => Ok(vec![op, digit4, digit3, digit2, digit1]),

            Command::SetAsciiLeds {
                char1,
                char2,
                char3,
                char4,
            } => Ok(vec![op, char1, char2, char3, char4]),

            Command::TriggerButtons {
                clean,
                spot,
                dock,
                minute,
                hour,
                day,
                schedule,
                clock,
            } => {
                let mut buttons = 0u8;
                if clean {
                    buttons |= BUTTON_CLEAN;
                }
                if spot {
                    buttons |= BUTTON_SPOT;
                }
                if dock {
                    buttons |= BUTTON_DOCK;
                }
                if minute {
                    buttons |= BUTTON_MINUTE;
                }
                if hour {
                    buttons |= BUTTON_HOUR;
                }
                if day {
                    buttons |= BUTTON_DAY;
                }
                if schedule {
                    buttons |= BUTTON_SCHEDULE;
                }
                if clock {
                    buttons |= BUTTON_CLOCK;
                }
                Ok(vec![op, buttons])
            }

            Command::SetSong { number, ref notes } => {
                check_range(number as i64, 0, 3, "song_number")?;
                if notes.is_empty() || notes.len() > 16 {
                    return Err(out_of_range("note_count", notes.len() as i64));
                }
                let mut frame = Vec::with_capacity(3 + notes.len() * 2);
                frame.push(op);
                frame.push(number);
                frame.push(notes.len() as u8);
                for note in notes {
                    if note.duration > 255 {
                        return Err(out_of_range("note_duration", note.duration as i64));
                    }
                    // Out-of-range pitches become the rest sentinel, not errors
                    let pitch = if (31..=127).contains(&note.pitch) {
                        note.pitch
                    } else {
                        0
                    };
                    frame.push(pitch);
                    frame.push(note.duration as u8);
                }
                Ok(frame)
            }

            Command::PlaySong { number } => {
                check_range(number as i64, 0, 3, "song_number")?;
                Ok(vec![op, number])
            }

            Command::RequestSensor { id } => Ok(vec![op, id.as_u8()]),
        }
    }
}

/// Derive the 7-bit day-active mask of a schedule frame. A day participates
/// when its hour or minute is non-zero. Bit 0 is Sunday, bit 6 Saturday.
pub(crate) fn day_mask(slots: &[TimeSlot; 7]) -> u8 {
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_active())
        .fold(0u8, |mask, (day, _)| mask | (1 << day))
}

const SCHEDULE_HOUR_NAMES: [&str; 7] = [
    "sun_hour",
    "mon_hour",
    "tues_hour",
    "wed_hour",
    "thurs_hour",
    "fri_hour",
    "sat_hour",
];

const SCHEDULE_MINUTE_NAMES: [&str; 7] = [
    "sun_min", "mon_min", "tues_min", "wed_min", "thurs_min", "fri_min", "sat_min",
];

fn out_of_range(name: &'static str, value: i64) -> ProtocolError {
    ProtocolError::InvalidArgument { name, value }
}

fn check_range(value: i64, min: i64, max: i64, name: &'static str) -> Result<(), ProtocolError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(name, value))
    }
}

fn check_velocity(velocity: i16, name: &'static str) -> Result<(), ProtocolError> {
    check_range(velocity as i64, -500, 500, name)
}

fn check_hour(hour: u8, name: &'static str) -> Result<(), ProtocolError> {
    check_range(hour as i64, 0, 23, name)
}

fn check_minute(minute: u8, name: &'static str) -> Result<(), ProtocolError> {
    check_range(minute as i64, 0, 59, name)
}

fn pack_i16_pair(op: u8, first: i16, second: i16) -> Vec<u8> {
    let mut frame = Vec::with_capacity(5);
    frame.push(op);
    frame.extend_from_slice(&first.to_be_bytes());
    frame.extend_from_slice(&second.to_be_bytes());
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(slots: &[(usize, u8, u8)]) -> [TimeSlot; 7] {
        let mut out = [TimeSlot::default(); 7];
        for &(day, hour, minute) in slots {
            out[day] = TimeSlot::new(hour, minute);
        }
        out
    }

    #[test]
    fn test_drive_encoding() {
        let cmd = Command::Drive {
            velocity: -200,
            radius: 500,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0x89, 0xFF, 0x38, 0x01, 0xF4]);
    }

    #[test]
    fn test_drive_sentinels_encode_unsigned() {
        let straight = Command::Drive {
            velocity: 100,
            radius: drive_radius::STRAIGHT,
        };
        assert_eq!(straight.encode().unwrap()[3..], [0x80, 0x00]);

        let cw = Command::Drive {
            velocity: 100,
            radius: drive_radius::TURN_CLOCKWISE,
        };
        assert_eq!(cw.encode().unwrap()[3..], [0xFF, 0xFF]);

        let ccw = Command::Drive {
            velocity: 100,
            radius: drive_radius::TURN_COUNTER_CLOCKWISE,
        };
        assert_eq!(ccw.encode().unwrap()[3..], [0x00, 0x01]);

        let alt = Command::Drive {
            velocity: 100,
            radius: drive_radius::STRAIGHT_ALT,
        };
        assert_eq!(alt.encode().unwrap()[3..], [0x7F, 0xFF]);
    }

    #[test]
    fn test_drive_radius_round_trip() {
        // Curvature radii decode back through the signed interpretation,
        // sentinels through the unsigned one.
        for radius in [-2000i32, -1, 0, 2, 1999, 2000] {
            let frame = Command::Drive {
                velocity: 0,
                radius,
            }
            .encode()
            .unwrap();
            let decoded = i16::from_be_bytes([frame[3], frame[4]]) as i32;
            assert_eq!(decoded, radius);
        }
        for radius in [
            drive_radius::STRAIGHT,
            drive_radius::STRAIGHT_ALT,
            drive_radius::TURN_CLOCKWISE,
            drive_radius::TURN_COUNTER_CLOCKWISE,
        ] {
            let frame = Command::Drive {
                velocity: 0,
                radius,
            }
            .encode()
            .unwrap();
            let decoded = u16::from_be_bytes([frame[3], frame[4]]) as i32;
            assert_eq!(decoded, radius);
        }
    }

    #[test]
    fn test_drive_rejects_out_of_range() {
        assert!(matches!(
            Command::Drive {
                velocity: 501,
                radius: 0
            }
            .encode(),
            Err(ProtocolError::InvalidArgument { name: "velocity", .. })
        ));
        assert!(matches!(
            Command::Drive {
                velocity: 0,
                radius: 2001
            }
            .encode(),
            Err(ProtocolError::InvalidArgument { name: "radius", .. })
        ));
        // 0x8000 - 1 is neither a sentinel nor a curvature
        assert!(Command::Drive {
            velocity: 0,
            radius: 0x7FFE
        }
        .encode()
        .is_err());
    }

    #[test]
    fn test_day_mask_derivation() {
        let slots = schedule(&[(3, 15, 0), (5, 10, 36)]);
        assert_eq!(day_mask(&slots), 40);
    }

    #[test]
    fn test_set_schedule_encoding() {
        let cmd = Command::SetSchedule {
            slots: schedule(&[(3, 15, 0), (5, 10, 36)]),
        };
        assert_eq!(
            cmd.encode().unwrap(),
            vec![
                0xA7, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x0A,
                0x24, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_set_schedule_rejects_bad_time() {
        let cmd = Command::SetSchedule {
            slots: schedule(&[(2, 24, 0)]),
        };
        assert!(matches!(
            cmd.encode(),
            Err(ProtocolError::InvalidArgument {
                name: "tues_hour",
                ..
            })
        ));
    }

    #[test]
    fn test_set_motors_encoding() {
        let cmd = Command::SetMotors {
            main_brush: true,
            main_brush_reverse: false,
            side_brush: true,
            side_brush_reverse: true,
            vacuum: false,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0x8A, 0x0D]);
    }

    #[test]
    fn test_set_leds_encoding() {
        let cmd = Command::SetLeds {
            debris: false,
            spot: false,
            dock: true,
            check_robot: false,
            power_color: 0,
            power_intensity: 128,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0x8B, 0x04, 0x00, 0x80]);
    }

    #[test]
    fn test_set_ascii_leds_encoding() {
        let cmd = Command::SetAsciiLeds {
            char1: 65,
            char2: 66,
            char3: 67,
            char4: 68,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0xA4, 0x41, 0x42, 0x43, 0x44]);
    }

    #[test]
    fn test_set_raw_leds_reverses_digit_order() {
        let cmd = Command::SetRawLeds {
            digit1: 1,
            digit2: 2,
            digit3: 3,
            digit4: 4,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0xA3, 4, 3, 2, 1]);
    }

    #[test]
    fn test_set_song_encoding() {
        let cmd = Command::SetSong {
            number: 0,
            notes: vec![Note::new(31, 32), Note::new(85, 100)],
        };
        assert_eq!(
            cmd.encode().unwrap(),
            vec![0x8C, 0x00, 0x02, 0x1F, 0x20, 0x55, 0x64]
        );
    }

    #[test]
    fn test_set_song_clamps_pitch_rejects_duration() {
        // Pitch outside 31..=127 becomes the rest sentinel
        let clamped = Command::SetSong {
            number: 1,
            notes: vec![Note::new(200, 10)],
        };
        assert_eq!(clamped.encode().unwrap(), vec![0x8C, 0x01, 0x01, 0x00, 0x0A]);

        // Durations above a byte are rejected outright
        let rejected = Command::SetSong {
            number: 1,
            notes: vec![Note::new(60, 300)],
        };
        assert!(matches!(
            rejected.encode(),
            Err(ProtocolError::InvalidArgument {
                name: "note_duration",
                ..
            })
        ));
    }

    #[test]
    fn test_set_song_note_count_limits() {
        let empty = Command::SetSong {
            number: 0,
            notes: vec![],
        };
        assert!(empty.encode().is_err());

        let overlong = Command::SetSong {
            number: 0,
            notes: vec![Note::new(60, 8); 17],
        };
        assert!(overlong.encode().is_err());

        let full = Command::SetSong {
            number: 0,
            notes: vec![Note::new(60, 8); 16],
        };
        assert_eq!(full.encode().unwrap().len(), 3 + 32);
    }

    #[test]
    fn test_simple_opcodes() {
        assert_eq!(Command::Start.encode().unwrap(), vec![128]);
        assert_eq!(Command::Reset.encode().unwrap(), vec![7]);
        assert_eq!(Command::Stop.encode().unwrap(), vec![173]);
        assert_eq!(Command::SetModePassive.encode().unwrap(), vec![128]);
        assert_eq!(Command::SetModeSafe.encode().unwrap(), vec![131]);
        assert_eq!(Command::SetModeFull.encode().unwrap(), vec![132]);
        assert_eq!(Command::Clean.encode().unwrap(), vec![135]);
        assert_eq!(Command::CleanMax.encode().unwrap(), vec![136]);
        assert_eq!(Command::CleanSpot.encode().unwrap(), vec![134]);
        assert_eq!(Command::SeekDock.encode().unwrap(), vec![143]);
        assert_eq!(Command::PowerDown.encode().unwrap(), vec![133]);
    }

    #[test]
    fn test_set_baud_is_permissive() {
        assert_eq!(
            Command::SetBaud { code: 11 }.encode().unwrap(),
            vec![129, 11]
        );
        // Undefined codes still encode; the device is the arbiter
        assert_eq!(
            Command::SetBaud { code: 200 }.encode().unwrap(),
            vec![129, 200]
        );
        assert_eq!(BaudCode::default().code(), 11);
    }

    #[test]
    fn test_request_sensor_encoding() {
        let cmd = Command::RequestSensor {
            id: SensorId::OiMode,
        };
        assert_eq!(cmd.encode().unwrap(), vec![142, 35]);
    }

    #[test]
    fn test_motors_pwm_ranges() {
        assert!(Command::SetMotorsPwm {
            main_brush: -128,
            side_brush: 0,
            vacuum: 0
        }
        .encode()
        .is_err());
        assert!(Command::SetMotorsPwm {
            main_brush: 0,
            side_brush: 0,
            vacuum: -1
        }
        .encode()
        .is_err());
        assert_eq!(
            Command::SetMotorsPwm {
                main_brush: -127,
                side_brush: 127,
                vacuum: 64
            }
            .encode()
            .unwrap(),
            vec![144, 0x81, 0x7F, 0x40]
        );
    }

    #[test]
    fn test_scheduling_leds_encoding() {
        let cmd = Command::SetSchedulingLeds {
            sun: true,
            mon: false,
            tues: false,
            wed: true,
            thurs: false,
            fri: false,
            sat: false,
            schedule: true,
            clock: false,
            am: true,
            pm: false,
            colon: true,
        };
        assert_eq!(cmd.encode().unwrap(), vec![162, 0x09, 0x15]);
    }

    #[test]
    fn test_trigger_buttons_encoding() {
        let cmd = Command::TriggerButtons {
            clean: true,
            spot: false,
            dock: false,
            minute: false,
            hour: false,
            day: false,
            schedule: false,
            clock: true,
        };
        assert_eq!(cmd.encode().unwrap(), vec![165, 0x81]);
    }

    #[test]
    fn test_set_day_time_encoding() {
        assert_eq!(
            Command::SetDayTime {
                day: 2,
                hour: 14,
                minute: 30
            }
            .encode()
            .unwrap(),
            vec![168, 2, 14, 30]
        );
        assert!(Command::SetDayTime {
            day: 7,
            hour: 0,
            minute: 0
        }
        .encode()
        .is_err());
    }
}
