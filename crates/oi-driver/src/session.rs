use crate::{DriverError, Result};
use oi_protocol::{
    angle_from_encoder_counts, decode_bool, decode_i16, decode_i8, decode_u16, decode_u8,
    distance_from_encoder_counts, quirks_required, BumpsAndWheelDrops, Buttons, ChargingSources,
    Command, FirmwareVersion, LightBumper, Note, OiMode, ProtocolError, SensorGroup0,
    SensorGroup1, SensorGroup100, SensorGroup101, SensorGroup106, SensorGroup107, SensorGroup2,
    SensorGroup3, SensorGroup4, SensorGroup5, SensorGroup6, SensorId, Stasis, TimeSlot,
    WheelOvercurrents,
};
use serial_transport::SerialLink;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a passive robot stays awake after the last command.
pub const POWER_SAVE_WINDOW: Duration = Duration::from_secs(300);

/// Wake this far before the power-save window actually closes.
const WAKE_MARGIN: Duration = Duration::from_secs(15);

/// Most the device sends unsolicited after a start or reset.
const BANNER_LEN: usize = 1024;

/// Session tunables. The settle and pulse durations match the device's
/// documented timing; tests shrink them to zero to run instantly.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Pulse the wake line before a command would find the robot asleep.
    pub auto_wake: bool,
    /// Compute distance and angle from encoder counts instead of the
    /// device's own (defective on old firmware) telemetry.
    pub quirks: bool,
    /// Pause after the port opens before talking to the device.
    pub startup_settle: Duration,
    /// Pause after a reset before the banner is readable.
    pub reset_settle: Duration,
    /// Hold time for each edge of the wake pulse.
    pub wake_pulse: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_wake: true,
            quirks: true,
            startup_settle: Duration::from_secs(1),
            reset_settle: Duration::from_secs(5),
            wake_pulse: Duration::from_secs(1),
        }
    }
}

/// One exclusive session over a serial link.
///
/// The protocol is strictly synchronous request/response, so the session
/// owns its link and all cached state (mode, last-command timestamp, quirks
/// flag) and is not safe to share across threads without external locking.
///
/// Construction puts the device into Passive mode; dropping the session
/// sends a best-effort stop.
#[derive(Debug)]
pub struct OiSession<L: SerialLink> {
    link: L,
    mode: OiMode,
    last_command: Instant,
    options: SessionOptions,
}

impl<L: SerialLink> OiSession<L> {
    /// Take ownership of an open link and start the OI session. Sleeps for
    /// the startup settle time, then issues a start and verifies the device
    /// reports Passive.
    pub fn attach(link: L, options: SessionOptions) -> Result<Self> {
        let mut session = Self {
            link,
            mode: OiMode::Off,
            last_command: Instant::now(),
            options,
        };
        // the device needs a moment after the port opens
        thread::sleep(session.options.startup_settle);
        session.start()?;
        Ok(session)
    }

    /// Last mode observed or assumed; refreshed by [`Self::oi_mode`].
    pub fn mode(&self) -> OiMode {
        self.mode
    }

    pub fn auto_wake(&self) -> bool {
        self.options.auto_wake
    }

    pub fn set_auto_wake(&mut self, enabled: bool) {
        self.options.auto_wake = enabled;
    }

    pub fn quirks_enabled(&self) -> bool {
        self.options.quirks
    }

    /// Switch the distance/angle strategy at runtime.
    pub fn set_quirks_enabled(&mut self, enabled: bool) {
        self.options.quirks = enabled;
    }

    // ---- transmit path ------------------------------------------------

    /// Encode and transmit one command. The staleness check runs before the
    /// timestamp is stamped for the command about to go out; swapping those
    /// two steps would mask the inactivity the check exists to catch.
    fn send(&mut self, command: &Command) -> Result<()> {
        let frame = command.encode()?;
        self.handle_auto_wake()?;
        self.last_command = Instant::now();
        debug!(opcode = frame[0], len = frame.len(), "sending command");
        self.link.write_all(&frame)?;
        Ok(())
    }

    fn handle_auto_wake(&mut self) -> Result<()> {
        if !self.options.auto_wake || self.mode != OiMode::Passive {
            return Ok(());
        }
        if self.last_command.elapsed() >= POWER_SAVE_WINDOW - WAKE_MARGIN {
            self.wake()?;
        }
        Ok(())
    }

    /// Pulse the wake line: assert, deassert, assert, holding each edge for
    /// the configured pulse time.
    pub fn wake(&mut self) -> Result<()> {
        info!(
            idle_secs = self.last_command.elapsed().as_secs(),
            "waking robot"
        );
        for asserted in [true, false, true] {
            self.link.set_wake_line(asserted)?;
            thread::sleep(self.options.wake_pulse);
        }
        Ok(())
    }

    fn read_sensor(&mut self, id: SensorId) -> Result<Vec<u8>> {
        self.send(&Command::RequestSensor { id })?;
        let expected = id.response_len();
        let data = self.link.read(expected)?;
        if data.len() != expected {
            return Err(DriverError::Communication {
                sensor: id.as_u8(),
                expected,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    // ---- mode state machine -------------------------------------------

    /// Start the OI. The device dumps a text banner on start; it is read
    /// best-effort and discarded before the mode read-back.
    pub fn start(&mut self) -> Result<()> {
        self.send(&Command::Start)?;
        let banner = self.link.read(BANNER_LEN)?;
        if !banner.is_empty() {
            debug!(len = banner.len(), "discarded start banner");
        }
        self.link.flush_input()?;
        self.verify_mode(OiMode::Passive)
    }

    /// Request a mode and verify the device actually took it. The device
    /// can silently refuse (a safe-mode request with a wheel dropped, for
    /// instance), so no transition is trusted without the read-back.
    pub fn set_mode(&mut self, target: OiMode) -> Result<()> {
        let command = match target {
            OiMode::Passive => Command::SetModePassive,
            OiMode::Safe => Command::SetModeSafe,
            OiMode::Full => Command::SetModeFull,
            OiMode::Off => {
                return Err(ProtocolError::InvalidArgument {
                    name: "mode",
                    value: 0,
                }
                .into())
            }
        };
        self.send(&command)?;
        self.verify_mode(target)
    }

    fn verify_mode(&mut self, requested: OiMode) -> Result<()> {
        let actual = self.oi_mode()?;
        if actual != requested {
            return Err(DriverError::ModeChange { requested, actual });
        }
        Ok(())
    }

    /// Fire-and-forget per protocol; the device gives no read-back.
    pub fn reset(&mut self) -> Result<()> {
        self.send(&Command::Reset)?;
        self.mode = OiMode::Off;
        Ok(())
    }

    /// Fire-and-forget per protocol; the device gives no read-back.
    pub fn stop(&mut self) -> Result<()> {
        self.send(&Command::Stop)?;
        self.mode = OiMode::Off;
        Ok(())
    }

    /// Fire-and-forget per protocol; the device gives no read-back.
    pub fn power_down(&mut self) -> Result<()> {
        self.send(&Command::PowerDown)?;
        self.mode = OiMode::Off;
        Ok(())
    }

    pub fn set_baud(&mut self, code: u8) -> Result<()> {
        self.send(&Command::SetBaud { code })
    }

    // Built-in behaviors switch the device to Passive.

    pub fn clean(&mut self) -> Result<()> {
        self.send(&Command::Clean)?;
        self.verify_mode(OiMode::Passive)
    }

    pub fn clean_max(&mut self) -> Result<()> {
        self.send(&Command::CleanMax)?;
        self.verify_mode(OiMode::Passive)
    }

    pub fn clean_spot(&mut self) -> Result<()> {
        self.send(&Command::CleanSpot)?;
        self.verify_mode(OiMode::Passive)
    }

    pub fn seek_dock(&mut self) -> Result<()> {
        self.send(&Command::SeekDock)?;
        self.verify_mode(OiMode::Passive)
    }

    // ---- scheduling -----------------------------------------------------

    pub fn set_schedule(&mut self, slots: [TimeSlot; 7]) -> Result<()> {
        self.send(&Command::SetSchedule { slots })
    }

    pub fn clear_schedule(&mut self) -> Result<()> {
        self.set_schedule([TimeSlot::default(); 7])
    }

    pub fn set_day_time(&mut self, day: u8, hour: u8, minute: u8) -> Result<()> {
        self.send(&Command::SetDayTime { day, hour, minute })
    }

    // ---- motion ---------------------------------------------------------

    pub fn drive(&mut self, velocity: i16, radius: i32) -> Result<()> {
        self.send(&Command::Drive { velocity, radius })
    }

    pub fn drive_straight(&mut self, velocity: i16) -> Result<()> {
        self.drive(velocity, oi_protocol::drive_radius::STRAIGHT)
    }

    pub fn spin_left(&mut self, velocity: i16) -> Result<()> {
        self.drive(velocity, oi_protocol::drive_radius::TURN_COUNTER_CLOCKWISE)
    }

    pub fn spin_right(&mut self, velocity: i16) -> Result<()> {
        self.drive(velocity, oi_protocol::drive_radius::TURN_CLOCKWISE)
    }

    pub fn drive_direct(&mut self, right: i16, left: i16) -> Result<()> {
        self.send(&Command::DriveDirect { right, left })
    }

    pub fn drive_pwm(&mut self, right: i16, left: i16) -> Result<()> {
        self.send(&Command::DrivePwm { right, left })
    }

    // ---- actuators --------------------------------------------------------

    pub fn set_motors(
        &mut self,
        main_brush: bool,
        main_brush_reverse: bool,
        side_brush: bool,
        side_brush_reverse: bool,
        vacuum: bool,
    ) -> Result<()> {
        self.send(&Command::SetMotors {
            main_brush,
            main_brush_reverse,
            side_brush,
            side_brush_reverse,
            vacuum,
        })
    }

    pub fn set_motors_pwm(&mut self, main_brush: i8, side_brush: i8, vacuum: i8) -> Result<()> {
        self.send(&Command::SetMotorsPwm {
            main_brush,
            side_brush,
            vacuum,
        })
    }

    pub fn set_leds(
        &mut self,
        debris: bool,
        spot: bool,
        dock: bool,
        check_robot: bool,
        power_color: u8,
        power_intensity: u8,
    ) -> Result<()> {
        self.send(&Command::SetLeds {
            debris,
            spot,
            dock,
            check_robot,
            power_color,
            power_intensity,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_scheduling_leds(
        &mut self,
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
    ) -> Result<()> {
        self.send(&Command::SetSchedulingLeds {
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
        })
    }

    pub fn set_raw_leds(&mut self, digit1: u8, digit2: u8, digit3: u8, digit4: u8) -> Result<()> {
        self.send(&Command::SetRawLeds {
            digit1,
            digit2,
            digit3,
            digit4,
        })
    }

    pub fn set_ascii_leds(&mut self, char1: u8, char2: u8, char3: u8, char4: u8) -> Result<()> {
        self.send(&Command::SetAsciiLeds {
            char1,
            char2,
            char3,
            char4,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn trigger_buttons(
        &mut self,
        clean: bool,
        spot: bool,
        dock: bool,
        minute: bool,
        hour: bool,
        day: bool,
        schedule: bool,
        clock: bool,
    ) -> Result<()> {
        self.send(&Command::TriggerButtons {
            clean,
            spot,
            dock,
            minute,
            hour,
            day,
            schedule,
            clock,
        })
    }

    pub fn set_song(&mut self, number: u8, notes: &[Note]) -> Result<()> {
        self.send(&Command::SetSong {
            number,
            notes: notes.to_vec(),
        })
    }

    pub fn play_song(&mut self, number: u8) -> Result<()> {
        self.send(&Command::PlaySong { number })
    }

    // ---- firmware / quirks ------------------------------------------------

    /// Read the reset banner. This is state-disruptive: it resets the robot
    /// (Off), waits for the settle time, captures the banner, then starts
    /// the OI again, leaving the session in Passive.
    pub fn firmware_version(&mut self) -> Result<String> {
        self.reset()?;
        thread::sleep(self.options.reset_settle);
        let banner = self.link.read(BANNER_LEN)?;
        let banner = String::from_utf8_lossy(&banner).into_owned();
        self.start()?;
        self.link.flush_input()?;
        Ok(banner)
    }

    /// Read the firmware banner and set the quirks flag from it. An
    /// unreadable banner is not an error; it selects the quirked strategy,
    /// which is correct on every release.
    pub fn resolve_quirks(&mut self) -> Result<bool> {
        let banner = self.firmware_version()?;
        match FirmwareVersion::parse_banner(&banner) {
            Some(version) => info!(?version, "firmware release parsed from banner"),
            None => warn!("no release tag in firmware banner, assuming old firmware"),
        }
        let quirks = quirks_required(&banner);
        self.options.quirks = quirks;
        Ok(quirks)
    }

    // ---- odometry -----------------------------------------------------

    /// Distance travelled since last read, in millimetres. Dispatches on
    /// the quirks flag: old firmware gets the encoder computation, new
    /// firmware the device's own packet 19.
    pub fn distance(&mut self) -> Result<f64> {
        if self.options.quirks {
            let left = self.left_encoder_counts()?;
            let right = self.right_encoder_counts()?;
            Ok(distance_from_encoder_counts(left, right))
        } else {
            let data = self.read_sensor(SensorId::Distance)?;
            Ok(decode_i16("distance", &data)? as f64)
        }
    }

    /// Angle turned since last read. Quirked reads come back in radians
    /// from the encoders; unquirked reads are the device's packet 20 in
    /// degrees.
    pub fn angle(&mut self) -> Result<f64> {
        if self.options.quirks {
            let left = self.left_encoder_counts()?;
            let right = self.right_encoder_counts()?;
            Ok(angle_from_encoder_counts(left, right))
        } else {
            let data = self.read_sensor(SensorId::Angle)?;
            Ok(decode_i16("angle", &data)? as f64)
        }
    }

    // ---- individual sensors ----------------------------------------------

    pub fn bumps_and_wheel_drops(&mut self) -> Result<BumpsAndWheelDrops> {
        let data = self.read_sensor(SensorId::BumpsAndWheelDrops)?;
        Ok(BumpsAndWheelDrops::decode(&data)?)
    }

    pub fn wall(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::Wall)?;
        Ok(decode_bool("wall", &data)?)
    }

    pub fn cliff_left(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::CliffLeft)?;
        Ok(decode_bool("cliff_left", &data)?)
    }

    pub fn cliff_front_left(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::CliffFrontLeft)?;
        Ok(decode_bool("cliff_front_left", &data)?)
    }

    pub fn cliff_front_right(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::CliffFrontRight)?;
        Ok(decode_bool("cliff_front_right", &data)?)
    }

    pub fn cliff_right(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::CliffRight)?;
        Ok(decode_bool("cliff_right", &data)?)
    }

    pub fn virtual_wall(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::VirtualWall)?;
        Ok(decode_bool("virtual_wall", &data)?)
    }

    pub fn wheel_overcurrents(&mut self) -> Result<WheelOvercurrents> {
        let data = self.read_sensor(SensorId::WheelOvercurrents)?;
        Ok(WheelOvercurrents::decode(&data)?)
    }

    pub fn dirt_detect(&mut self) -> Result<i8> {
        let data = self.read_sensor(SensorId::DirtDetect)?;
        Ok(decode_i8("dirt_detect", &data)?)
    }

    pub fn ir_char_omni(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::IrCharOmni)?;
        Ok(decode_u8("ir_char_omni", &data)?)
    }

    pub fn ir_char_left(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::IrCharLeft)?;
        Ok(decode_u8("ir_char_left", &data)?)
    }

    pub fn ir_char_right(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::IrCharRight)?;
        Ok(decode_u8("ir_char_right", &data)?)
    }

    pub fn buttons(&mut self) -> Result<Buttons> {
        let data = self.read_sensor(SensorId::Buttons)?;
        Ok(Buttons::decode(&data)?)
    }

    pub fn charging_state(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::ChargingState)?;
        Ok(decode_u8("charging_state", &data)?)
    }

    pub fn voltage(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::Voltage)?;
        Ok(decode_u16("voltage", &data)?)
    }

    pub fn current(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::Current)?;
        Ok(decode_i16("current", &data)?)
    }

    pub fn temperature(&mut self) -> Result<i8> {
        let data = self.read_sensor(SensorId::Temperature)?;
        Ok(decode_i8("temperature", &data)?)
    }

    pub fn battery_charge(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::BatteryCharge)?;
        Ok(decode_u16("battery_charge", &data)?)
    }

    pub fn battery_capacity(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::BatteryCapacity)?;
        Ok(decode_u16("battery_capacity", &data)?)
    }

    pub fn wall_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::WallSignal)?;
        Ok(decode_u16("wall_signal", &data)?)
    }

    pub fn cliff_left_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::CliffLeftSignal)?;
        Ok(decode_u16("cliff_left_signal", &data)?)
    }

    pub fn cliff_front_left_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::CliffFrontLeftSignal)?;
        Ok(decode_u16("cliff_front_left_signal", &data)?)
    }

    pub fn cliff_front_right_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::CliffFrontRightSignal)?;
        Ok(decode_u16("cliff_front_right_signal", &data)?)
    }

    pub fn cliff_right_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::CliffRightSignal)?;
        Ok(decode_u16("cliff_right_signal", &data)?)
    }

    pub fn charging_sources(&mut self) -> Result<ChargingSources> {
        let data = self.read_sensor(SensorId::ChargingSources)?;
        Ok(ChargingSources::decode(&data)?)
    }

    /// Query the device's mode and refresh the session cache.
    pub fn oi_mode(&mut self) -> Result<OiMode> {
        let data = self.read_sensor(SensorId::OiMode)?;
        let mode = OiMode::from_u8(decode_u8("oi_mode", &data)?)?;
        self.mode = mode;
        Ok(mode)
    }

    pub fn song_number(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::SongNumber)?;
        Ok(decode_u8("song_number", &data)?)
    }

    pub fn is_song_playing(&mut self) -> Result<bool> {
        let data = self.read_sensor(SensorId::SongPlaying)?;
        Ok(decode_bool("song_playing", &data)?)
    }

    pub fn stream_packet_count(&mut self) -> Result<u8> {
        let data = self.read_sensor(SensorId::StreamPacketCount)?;
        Ok(decode_u8("stream_packet_count", &data)?)
    }

    pub fn requested_velocity(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::RequestedVelocity)?;
        Ok(decode_i16("requested_velocity", &data)?)
    }

    pub fn requested_radius(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::RequestedRadius)?;
        Ok(decode_i16("requested_radius", &data)?)
    }

    pub fn requested_right_velocity(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::RequestedRightVelocity)?;
        Ok(decode_i16("requested_right_velocity", &data)?)
    }

    pub fn requested_left_velocity(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::RequestedLeftVelocity)?;
        Ok(decode_i16("requested_left_velocity", &data)?)
    }

    /// Free-running unsigned 16-bit counter; wraps.
    pub fn left_encoder_counts(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LeftEncoderCounts)?;
        Ok(decode_u16("left_encoder_counts", &data)?)
    }

    /// Free-running unsigned 16-bit counter; wraps.
    pub fn right_encoder_counts(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::RightEncoderCounts)?;
        Ok(decode_u16("right_encoder_counts", &data)?)
    }

    pub fn light_bumper(&mut self) -> Result<LightBumper> {
        let data = self.read_sensor(SensorId::LightBumper)?;
        Ok(LightBumper::decode(&data)?)
    }

    pub fn light_bump_left_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpLeftSignal)?;
        Ok(decode_u16("light_bump_left_signal", &data)?)
    }

    pub fn light_bump_front_left_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpFrontLeftSignal)?;
        Ok(decode_u16("light_bump_front_left_signal", &data)?)
    }

    pub fn light_bump_center_left_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpCenterLeftSignal)?;
        Ok(decode_u16("light_bump_center_left_signal", &data)?)
    }

    pub fn light_bump_center_right_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpCenterRightSignal)?;
        Ok(decode_u16("light_bump_center_right_signal", &data)?)
    }

    pub fn light_bump_front_right_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpFrontRightSignal)?;
        Ok(decode_u16("light_bump_front_right_signal", &data)?)
    }

    pub fn light_bump_right_signal(&mut self) -> Result<u16> {
        let data = self.read_sensor(SensorId::LightBumpRightSignal)?;
        Ok(decode_u16("light_bump_right_signal", &data)?)
    }

    pub fn left_motor_current(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::LeftMotorCurrent)?;
        Ok(decode_i16("left_motor_current", &data)?)
    }

    pub fn right_motor_current(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::RightMotorCurrent)?;
        Ok(decode_i16("right_motor_current", &data)?)
    }

    pub fn main_brush_motor_current(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::MainBrushMotorCurrent)?;
        Ok(decode_i16("main_brush_motor_current", &data)?)
    }

    pub fn side_brush_motor_current(&mut self) -> Result<i16> {
        let data = self.read_sensor(SensorId::SideBrushMotorCurrent)?;
        Ok(decode_i16("side_brush_motor_current", &data)?)
    }

    pub fn stasis(&mut self) -> Result<Stasis> {
        let data = self.read_sensor(SensorId::Stasis)?;
        Ok(Stasis::decode(&data)?)
    }

    // ---- sensor groups --------------------------------------------------

    pub fn sensor_group0(&mut self) -> Result<SensorGroup0> {
        let data = self.read_sensor(SensorId::Group0)?;
        Ok(SensorGroup0::try_from(data.as_slice())?)
    }

    pub fn sensor_group1(&mut self) -> Result<SensorGroup1> {
        let data = self.read_sensor(SensorId::Group1)?;
        Ok(SensorGroup1::try_from(data.as_slice())?)
    }

    pub fn sensor_group2(&mut self) -> Result<SensorGroup2> {
        let data = self.read_sensor(SensorId::Group2)?;
        Ok(SensorGroup2::try_from(data.as_slice())?)
    }

    pub fn sensor_group3(&mut self) -> Result<SensorGroup3> {
        let data = self.read_sensor(SensorId::Group3)?;
        Ok(SensorGroup3::try_from(data.as_slice())?)
    }

    pub fn sensor_group4(&mut self) -> Result<SensorGroup4> {
        let data = self.read_sensor(SensorId::Group4)?;
        Ok(SensorGroup4::try_from(data.as_slice())?)
    }

    pub fn sensor_group5(&mut self) -> Result<SensorGroup5> {
        let data = self.read_sensor(SensorId::Group5)?;
        Ok(SensorGroup5::try_from(data.as_slice())?)
    }

    pub fn sensor_group6(&mut self) -> Result<SensorGroup6> {
        let data = self.read_sensor(SensorId::Group6)?;
        Ok(SensorGroup6::try_from(data.as_slice())?)
    }

    pub fn sensor_group100(&mut self) -> Result<SensorGroup100> {
        let data = self.read_sensor(SensorId::Group100)?;
        Ok(SensorGroup100::try_from(data.as_slice())?)
    }

    pub fn sensor_group101(&mut self) -> Result<SensorGroup101> {
        let data = self.read_sensor(SensorId::Group101)?;
        Ok(SensorGroup101::try_from(data.as_slice())?)
    }

    pub fn sensor_group106(&mut self) -> Result<SensorGroup106> {
        let data = self.read_sensor(SensorId::Group106)?;
        Ok(SensorGroup106::try_from(data.as_slice())?)
    }

    pub fn sensor_group107(&mut self) -> Result<SensorGroup107> {
        let data = self.read_sensor(SensorId::Group107)?;
        Ok(SensorGroup107::try_from(data.as_slice())?)
    }
}

impl<L: SerialLink> Drop for OiSession<L> {
    // Best-effort stop regardless of exit path. No wake, no verification,
    // nothing that can sleep or fail loudly in a destructor.
    fn drop(&mut self) {
        if let Ok(frame) = Command::Stop.encode() {
            let _ = self.link.write_all(&frame);
        }
    }
}

#[cfg(feature = "serial")]
impl OiSession<serial_transport::UartLink> {
    /// Open a native serial port and start a session over it.
    pub fn open_serial(
        path: &str,
        baud: u32,
        timeout: Duration,
        options: SessionOptions,
    ) -> Result<Self> {
        let link = serial_transport::UartLink::open(path, baud, timeout).map_err(|source| {
            DriverError::Connection {
                port: path.to_string(),
                baud,
                source,
            }
        })?;
        Self::attach(link, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oi_protocol::MM_PER_TICK;
    use serial_transport::MockLink;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn instant_options() -> SessionOptions {
        SessionOptions {
            startup_settle: Duration::ZERO,
            reset_settle: Duration::ZERO,
            wake_pulse: Duration::ZERO,
            ..SessionOptions::default()
        }
    }

    // A link scripted for a clean attach: start banner, then mode = passive.
    fn attach_link() -> MockLink {
        let mut link = MockLink::new();
        link.push_read(b"Roomba by iRobot!");
        link.push_read(&[1]);
        link
    }

    fn passive_session() -> OiSession<MockLink> {
        let mut session = OiSession::attach(attach_link(), instant_options()).unwrap();
        session.link.clear_written();
        session
    }

    #[test]
    fn test_attach_starts_and_verifies_passive() {
        let session = OiSession::attach(attach_link(), instant_options()).unwrap();
        // start opcode, then the mode query
        assert_eq!(session.link.written(), &[128, 142, 35]);
        assert_eq!(session.mode(), OiMode::Passive);
        assert_eq!(session.link.flush_count(), 1);
    }

    #[test]
    fn test_attach_fails_when_device_stays_off() {
        let mut link = MockLink::new();
        link.push_read(b"banner");
        link.push_read(&[0]);
        let err = OiSession::attach(link, instant_options()).unwrap_err();
        match err {
            DriverError::ModeChange { requested, actual } => {
                assert_eq!(requested, OiMode::Passive);
                assert_eq!(actual, OiMode::Off);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_set_mode_refused_reports_both_modes() {
        let mut session = passive_session();
        session.link.push_read(&[2]); // device ends up in safe
        let err = session.set_mode(OiMode::Full).unwrap_err();
        match err {
            DriverError::ModeChange { requested, actual } => {
                assert_eq!(requested, OiMode::Full);
                assert_eq!(actual, OiMode::Safe);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // cache reflects what the device reported, not the request
        assert_eq!(session.mode(), OiMode::Safe);
    }

    #[test]
    fn test_set_mode_verified() {
        let mut session = passive_session();
        session.link.push_read(&[2]);
        session.set_mode(OiMode::Safe).unwrap();
        assert_eq!(session.mode(), OiMode::Safe);
        assert_eq!(session.link.written(), &[131, 142, 35]);
    }

    #[test]
    fn test_set_mode_off_rejected_locally() {
        let mut session = passive_session();
        let err = session.set_mode(OiMode::Off).unwrap_err();
        assert!(matches!(err, DriverError::Protocol(_)));
        assert!(session.link.written().is_empty());
    }

    #[test]
    fn test_clean_verifies_passive() {
        let mut session = passive_session();
        session.link.push_read(&[1]);
        session.clean().unwrap();
        assert_eq!(session.link.written(), &[135, 142, 35]);
    }

    #[test]
    fn test_stop_forces_mode_off() {
        let mut session = passive_session();
        session.stop().unwrap();
        assert_eq!(session.mode(), OiMode::Off);
        assert_eq!(session.link.written(), &[173]);
    }

    #[test]
    fn test_short_sensor_read_is_communication_error() {
        let mut session = passive_session();
        session.link.push_read(&[0x01]); // voltage needs two bytes
        let err = session.voltage().unwrap_err();
        match err {
            DriverError::Communication {
                sensor,
                expected,
                actual,
            } => {
                assert_eq!(sensor, 22);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_link_reads_zero_bytes() {
        let mut session = passive_session();
        let err = session.wall().unwrap_err();
        assert!(matches!(
            err,
            DriverError::Communication {
                sensor: 8,
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_auto_wake_pulses_before_stale_send() {
        let mut session = passive_session();
        session.last_command = Instant::now() - (POWER_SAVE_WINDOW - WAKE_MARGIN);
        session.drive_straight(100).unwrap();
        assert_eq!(session.link.wake_transitions(), &[true, false, true]);
        // drive straight uses the unsigned sentinel radius
        assert_eq!(session.link.written(), &[137, 0x00, 0x64, 0x80, 0x00]);
    }

    #[test]
    fn test_no_wake_when_fresh_or_disabled() {
        let mut session = passive_session();
        session.drive_straight(100).unwrap();
        assert!(session.link.wake_transitions().is_empty());

        session.set_auto_wake(false);
        session.last_command = Instant::now() - POWER_SAVE_WINDOW;
        session.drive_straight(100).unwrap();
        assert!(session.link.wake_transitions().is_empty());
    }

    #[test]
    fn test_no_wake_outside_passive() {
        let mut session = passive_session();
        session.link.push_read(&[3]);
        session.set_mode(OiMode::Full).unwrap();
        session.last_command = Instant::now() - POWER_SAVE_WINDOW;
        session.drive_straight(100).unwrap();
        assert!(session.link.wake_transitions().is_empty());
    }

    #[test]
    fn test_spin_directions() {
        let mut session = passive_session();
        session.spin_left(50).unwrap();
        session.spin_right(50).unwrap();
        assert_eq!(
            session.link.written(),
            &[137, 0x00, 0x32, 0x00, 0x01, 137, 0x00, 0x32, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_invalid_argument_sends_nothing() {
        let mut session = passive_session();
        let err = session.drive(501, 0).unwrap_err();
        assert!(matches!(err, DriverError::Protocol(_)));
        assert!(session.link.written().is_empty());
    }

    #[test]
    fn test_quirked_distance_uses_encoders() {
        let mut session = passive_session();
        assert!(session.quirks_enabled());
        session.link.push_read(&100u16.to_be_bytes());
        session.link.push_read(&200u16.to_be_bytes());
        let distance = session.distance().unwrap();
        assert!((distance - 150.0 * MM_PER_TICK).abs() < 1e-9);
        // two encoder queries, no packet 19
        assert_eq!(session.link.written(), &[142, 43, 142, 44]);
    }

    #[test]
    fn test_unquirked_distance_trusts_device() {
        let mut session = passive_session();
        session.set_quirks_enabled(false);
        session.link.push_read(&500i16.to_be_bytes());
        assert_eq!(session.distance().unwrap(), 500.0);
        assert_eq!(session.link.written(), &[142, 19]);
    }

    #[test]
    fn test_quirked_angle_sign() {
        let mut session = passive_session();
        session.link.push_read(&0u16.to_be_bytes());
        session.link.push_read(&1000u16.to_be_bytes());
        assert!(session.angle().unwrap() > 0.0);
    }

    #[test]
    fn test_group_accessor_decodes() {
        let mut session = passive_session();
        let mut group5 = [0u8; 12];
        group5[0] = 1; // passive
        group5[1] = 2;
        session.link.push_read(&group5);
        let group = session.sensor_group5().unwrap();
        assert_eq!(group.oi_mode, OiMode::Passive);
        assert_eq!(group.song_number, 2);
        assert_eq!(session.link.written(), &[142, 5]);
    }

    #[test]
    fn test_firmware_version_round_trip() {
        let mut session = passive_session();
        session
            .link
            .push_read(b"r3_robot/tags/release-3.5.4:0000 CLEAN\r\n");
        session.link.push_read(b"start banner");
        session.link.push_read(&[1]); // restarted into passive
        let banner = session.firmware_version().unwrap();
        assert!(banner.contains("release-3.5.4"));
        assert_eq!(session.mode(), OiMode::Passive);
        // reset, start, mode query
        assert_eq!(session.link.written(), &[7, 128, 142, 35]);
    }

    #[test]
    fn test_resolve_quirks_from_banner() {
        let mut session = passive_session();
        session.link.push_read(b"r3_robot/tags/release-3.5.4:0000");
        session.link.push_read(b"banner");
        session.link.push_read(&[1]);
        assert!(!session.resolve_quirks().unwrap());
        assert!(!session.quirks_enabled());

        session.link.push_read(b"no tag here");
        session.link.push_read(b"banner");
        session.link.push_read(&[1]);
        assert!(session.resolve_quirks().unwrap());
        assert!(session.quirks_enabled());
    }

    #[test]
    fn test_clear_schedule_zeroes_every_slot() {
        let mut session = passive_session();
        session.clear_schedule().unwrap();
        assert_eq!(session.link.written(), &[167u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    // Mirrors writes into shared storage so they outlive the session.
    struct SharedLink {
        inner: MockLink,
        writes: Rc<RefCell<Vec<u8>>>,
    }

    impl SerialLink for SharedLink {
        fn write_all(&mut self, bytes: &[u8]) -> serial_transport::Result<()> {
            self.writes.borrow_mut().extend_from_slice(bytes);
            self.inner.write_all(bytes)
        }

        fn read(&mut self, max: usize) -> serial_transport::Result<Vec<u8>> {
            self.inner.read(max)
        }

        fn flush_input(&mut self) -> serial_transport::Result<()> {
            self.inner.flush_input()
        }

        fn set_wake_line(&mut self, asserted: bool) -> serial_transport::Result<()> {
            self.inner.set_wake_line(asserted)
        }
    }

    #[test]
    fn test_drop_sends_best_effort_stop() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        {
            let link = SharedLink {
                inner: attach_link(),
                writes: Rc::clone(&writes),
            };
            let session = OiSession::attach(link, instant_options()).unwrap();
            drop(session);
        }
        assert_eq!(writes.borrow().last(), Some(&173));
    }
}
