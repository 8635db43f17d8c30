//! Firmware banner parsing and encoder-based odometry.
//!
//! Firmware older than 3.3.0 reports wrong values from the distance and
//! angle packets (19 and 20), so drivers on those releases recompute both
//! from the raw wheel encoder counts. The reset banner carries the release
//! tag used to make that call.

/// Drive wheel diameter.
pub const WHEEL_DIAMETER_MM: f64 = 72.0;

/// Distance between the drive wheels.
pub const WHEEL_BASE_MM: f64 = 235.0;

/// Encoder ticks per wheel revolution.
pub const TICKS_PER_REV: f64 = 508.8;

/// Millimetres travelled per encoder tick: wheel circumference over ticks
/// per revolution.
pub const MM_PER_TICK: f64 = 0.44456499814949904;

/// Marker preceding the release tag in the reset banner.
const RELEASE_TAG_MARKER: &str = "r3_robot/tags/release-";

/// Firmware release parsed from the reset banner's tag line, e.g.
/// `r3_robot/tags/release-3.5.4:...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub point: u32,
}

impl FirmwareVersion {
    /// Scan a reset banner for the release tag. Returns `None` when no
    /// well-formed tag is present, which callers should treat as an old
    /// firmware.
    pub fn parse_banner(banner: &str) -> Option<Self> {
        let start = banner.find(RELEASE_TAG_MARKER)? + RELEASE_TAG_MARKER.len();
        let rest = &banner[start..];
        let tag: &str = rest
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or(rest);
        let mut parts = tag.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let point = parts.next()?.parse().ok()?;
        Some(Self {
            major,
            minor,
            point,
        })
    }

    /// True for releases before 3.3.0, whose distance and angle packets are
    /// unreliable.
    pub fn requires_quirks(self) -> bool {
        self.major < 3 || (self.major == 3 && self.minor < 3)
    }
}

/// Decide the quirk setting from a raw reset banner. An unreadable banner
/// counts as old firmware; the encoder fallback is correct on every release.
pub fn quirks_required(banner: &str) -> bool {
    FirmwareVersion::parse_banner(banner).map_or(true, FirmwareVersion::requires_quirks)
}

/// Distance in millimetres from raw wheel encoder counts, averaged over
/// both wheels.
pub fn distance_from_encoder_counts(left: u16, right: u16) -> f64 {
    (left as f64 * MM_PER_TICK + right as f64 * MM_PER_TICK) / 2.0
}

/// Angle in radians from raw wheel encoder counts.
pub fn angle_from_encoder_counts(left: u16, right: u16) -> f64 {
    (right as f64 * MM_PER_TICK - left as f64 * MM_PER_TICK) / WHEEL_BASE_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = "bl-start\r\nSTR730\r\nbootloader id: #x47175347 4C636FFF\r\n\
                          bootloader info rev: #xF000\r\nbootloader rev: #x0001\r\n\
                          2007-05-14-1715-L\r\nRoomba by iRobot!\r\n\
                          str730\r\n2012-03-22-1549-L   \r\nbattery-current-zero 252\r\n\
                          \r\nr3_robot/tags/release-3.5.4:6058 CLEAN\r\n";

    #[test]
    fn test_parse_release_tag() {
        let version = FirmwareVersion::parse_banner(BANNER).unwrap();
        assert_eq!(
            version,
            FirmwareVersion {
                major: 3,
                minor: 5,
                point: 4
            }
        );
        assert!(!version.requires_quirks());
    }

    #[test]
    fn test_parse_tag_without_suffix() {
        let version = FirmwareVersion::parse_banner("r3_robot/tags/release-3.2.9").unwrap();
        assert_eq!(version.point, 9);
        assert!(version.requires_quirks());
    }

    #[test]
    fn test_quirk_boundary() {
        assert!(!quirks_required("r3_robot/tags/release-3.3.0:x"));
        assert!(quirks_required("r3_robot/tags/release-3.2.9:x"));
        assert!(quirks_required("r3_robot/tags/release-2.9.9:x"));
        assert!(!quirks_required("r3_robot/tags/release-4.0.0:x"));
    }

    #[test]
    fn test_unparseable_banner_defaults_to_quirks() {
        assert!(quirks_required(""));
        assert!(quirks_required("Roomba by iRobot!"));
        assert!(quirks_required("r3_robot/tags/release-"));
        assert!(quirks_required("r3_robot/tags/release-3.5"));
        assert!(quirks_required("r3_robot/tags/release-x.y.z"));
    }

    #[test]
    fn test_mm_per_tick_matches_geometry() {
        let derived = core::f64::consts::PI * WHEEL_DIAMETER_MM / TICKS_PER_REV;
        assert!((derived - MM_PER_TICK).abs() < 1e-12);
    }

    #[test]
    fn test_distance_from_encoders() {
        assert_eq!(distance_from_encoder_counts(0, 0), 0.0);
        // One full revolution of both wheels covers one circumference
        let ticks = 509u16;
        let distance = distance_from_encoder_counts(ticks, ticks);
        let circumference = core::f64::consts::PI * WHEEL_DIAMETER_MM;
        assert!((distance - circumference).abs() < MM_PER_TICK);
    }

    #[test]
    fn test_angle_from_encoders() {
        // Equal counts mean no net rotation
        assert_eq!(angle_from_encoder_counts(1000, 1000), 0.0);
        // Right wheel ahead turns counter-clockwise (positive)
        assert!(angle_from_encoder_counts(0, 1000) > 0.0);
        assert!(angle_from_encoder_counts(1000, 0) < 0.0);
        let angle = angle_from_encoder_counts(0, 1000);
        assert!((angle - 1000.0 * MM_PER_TICK / WHEEL_BASE_MM).abs() < 1e-12);
    }
}
