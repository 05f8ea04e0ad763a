//! Dock status snapshots
//!
//! Turns the raw attribute contents located by [`PowerSupplyPaths`] into a
//! fully populated [`DockStatusSnapshot`]. Every field has a fallback, so a
//! snapshot is always complete no matter which attributes exist.

use crate::power::PowerSupplyPaths;
use crate::sysfs::{self, FLAG_CAPACITY, VALUE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Byte offset of the detect flag in the `ec_dock` line ("dock detect = 1")
const DOCK_DETECT_OFFSET: usize = 14;

/// Dock battery charging status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    #[default]
    Unknown,
    Charging,
    NotCharging,
}

impl ChargeStatus {
    /// Classify a `status` attribute by its first byte.
    ///
    /// The driver writes "Charging" or "Not charging"; anything else,
    /// including an empty value or lowercase text, is `Unknown`.
    pub fn from_raw(raw: &[u8]) -> Self {
        match raw.first() {
            Some(b'C') => ChargeStatus::Charging,
            Some(b'N') => ChargeStatus::NotCharging,
            _ => {
                tracing::warn!(
                    "Unknown dock battery status '{}'",
                    String::from_utf8_lossy(raw)
                );
                ChargeStatus::Unknown
            }
        }
    }

    /// Host code for this status
    pub fn code(&self, codes: &StatusCodes) -> i32 {
        match self {
            ChargeStatus::Unknown => codes.unknown,
            ChargeStatus::Charging => codes.charging,
            ChargeStatus::NotCharging => codes.not_charging,
        }
    }
}

/// Opaque status codes supplied by the host battery manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodes {
    pub unknown: i32,
    pub charging: i32,
    pub not_charging: i32,
}

impl Default for StatusCodes {
    fn default() -> Self {
        // android.os.BatteryManager values
        Self {
            unknown: 1,
            charging: 2,
            not_charging: 4,
        }
    }
}

/// Dock state gathered by one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DockStatusSnapshot {
    pub status: ChargeStatus,
    /// Battery level in percent, 0 when unreadable
    pub level: i32,
    pub battery_present: bool,
    pub pad_usb_online: bool,
    pub ac_online: bool,
    pub dock_ac_online: bool,
}

/// Anything that can produce dock status snapshots
pub trait DockStatusSource {
    fn snapshot(&self) -> DockStatusSnapshot;
}

/// Reads dock status from the sysfs attributes resolved at construction
#[derive(Debug, Clone)]
pub struct DockBatteryMonitor {
    paths: PowerSupplyPaths,
}

impl DockBatteryMonitor {
    /// Resolve attribute paths under `root` and keep them for every later poll
    pub fn new(root: &Path) -> Self {
        Self::with_paths(PowerSupplyPaths::resolve(root))
    }

    /// Use already resolved paths
    pub fn with_paths(paths: PowerSupplyPaths) -> Self {
        Self { paths }
    }

    /// Get the resolved paths
    pub fn paths(&self) -> &PowerSupplyPaths {
        &self.paths
    }

    /// Read every attribute and build a fresh snapshot
    pub fn update(&self) -> DockStatusSnapshot {
        let paths = &self.paths;

        DockStatusSnapshot {
            level: read_int(paths.dock_battery_capacity.as_deref(), 0),
            status: read_charge_status(paths.dock_battery_status.as_deref()),
            battery_present: read_dock_present(paths.dock_battery_present.as_deref()),
            pad_usb_online: read_bool(paths.pad_usb_online.as_deref()),
            ac_online: read_bool(paths.ac_online.as_deref()),
            dock_ac_online: read_bool(paths.dock_ac_online.as_deref()),
        }
    }
}

impl DockStatusSource for DockBatteryMonitor {
    fn snapshot(&self) -> DockStatusSnapshot {
        self.update()
    }
}

/// Read an integer attribute, falling back to `default` when nothing was read
pub fn read_int(path: Option<&Path>, default: i32) -> i32 {
    match sysfs::read_from_file(path, VALUE_CAPACITY) {
        Some(raw) if !raw.is_empty() => parse_int(&raw),
        _ => default,
    }
}

/// Read a flag attribute: true when non-empty and not starting with `'0'`
pub fn read_bool(path: Option<&Path>) -> bool {
    sysfs::read_from_file(path, FLAG_CAPACITY)
        .and_then(|raw| raw.first().copied())
        .is_some_and(|first| first != b'0')
}

/// Read the charge status attribute
pub fn read_charge_status(path: Option<&Path>) -> ChargeStatus {
    match sysfs::read_from_file(path, VALUE_CAPACITY) {
        Some(raw) if !raw.is_empty() => ChargeStatus::from_raw(&raw),
        _ => ChargeStatus::Unknown,
    }
}

/// Read the `ec_dock` diagnostic line and report whether the dock is attached
pub fn read_dock_present(path: Option<&Path>) -> bool {
    sysfs::read_from_file(path, VALUE_CAPACITY).is_some_and(|raw| dock_detected(&raw))
}

/// Check the detect flag of an `ec_dock` line such as `"dock detect = 1"`.
///
/// The line must be at least 15 bytes long and carry `'1'` at offset 14.
pub fn dock_detected(line: &[u8]) -> bool {
    line.get(DOCK_DETECT_OFFSET) == Some(&b'1')
}

/// Parse a decimal integer the way C `atoi` does: optional leading
/// whitespace, optional sign, then digits up to the first non-digit.
/// Yields 0 when no digits are present; saturates on overflow.
pub fn parse_int(raw: &[u8]) -> i32 {
    let mut bytes = raw.iter().copied().skip_while(u8::is_ascii_whitespace).peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let magnitude = bytes
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            (acc * 10 + i64::from(digit - b'0')).min(i64::from(i32::MAX) + 1)
        });

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_attr(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_charge_status_first_byte() {
        assert_eq!(ChargeStatus::from_raw(b"Charging"), ChargeStatus::Charging);
        assert_eq!(ChargeStatus::from_raw(b"Not charging"), ChargeStatus::NotCharging);
        assert_eq!(ChargeStatus::from_raw(b"C"), ChargeStatus::Charging);
        assert_eq!(ChargeStatus::from_raw(b"Full"), ChargeStatus::Unknown);
        assert_eq!(ChargeStatus::from_raw(b"Discharging"), ChargeStatus::Unknown);
    }

    #[test]
    fn test_charge_status_is_case_sensitive() {
        assert_eq!(ChargeStatus::from_raw(b"not charging"), ChargeStatus::Unknown);
        assert_eq!(ChargeStatus::from_raw(b"charging"), ChargeStatus::Unknown);
    }

    #[test]
    fn test_charge_status_empty_read() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "status", "\n");
        assert_eq!(read_charge_status(Some(&path)), ChargeStatus::Unknown);
        assert_eq!(read_charge_status(None), ChargeStatus::Unknown);
    }

    #[test]
    fn test_charge_status_codes() {
        let codes = StatusCodes::default();
        assert_eq!(ChargeStatus::Unknown.code(&codes), 1);
        assert_eq!(ChargeStatus::Charging.code(&codes), 2);
        assert_eq!(ChargeStatus::NotCharging.code(&codes), 4);

        let custom = StatusCodes {
            unknown: -1,
            charging: 10,
            not_charging: 20,
        };
        assert_eq!(ChargeStatus::Charging.code(&custom), 10);
    }

    #[test]
    fn test_dock_detected_boundaries() {
        // 14 bytes: too short
        assert!(!dock_detected(b"dock detect = "));
        assert!(dock_detected(b"dock detect = 1"));
        assert!(!dock_detected(b"dock detect = 0"));
        assert!(dock_detected(b"dock detect = 1 extra"));
        assert!(!dock_detected(b""));
    }

    #[test]
    fn test_read_dock_present() {
        let dir = TempDir::new().unwrap();
        let attached = write_attr(&dir, "attached", "dock detect = 1\n");
        let detached = write_attr(&dir, "detached", "dock detect = 0\n");

        assert!(read_dock_present(Some(&attached)));
        assert!(!read_dock_present(Some(&detached)));
        assert!(!read_dock_present(None));
    }

    #[test]
    fn test_read_bool() {
        let dir = TempDir::new().unwrap();
        let on = write_attr(&dir, "on", "1\n");
        let off = write_attr(&dir, "off", "0\n");
        let empty = write_attr(&dir, "empty", "");
        let two = write_attr(&dir, "two", "2\n");

        assert!(read_bool(Some(&on)));
        assert!(!read_bool(Some(&off)));
        assert!(!read_bool(Some(&empty)));
        assert!(read_bool(Some(&two)));
        assert!(!read_bool(None));
    }

    #[test]
    fn test_read_int() {
        let dir = TempDir::new().unwrap();
        let level = write_attr(&dir, "capacity", "  87\n");
        let empty = write_attr(&dir, "empty", "");

        assert_eq!(read_int(Some(&level), 0), 87);
        assert_eq!(read_int(Some(&empty), 5), 5);
        assert_eq!(read_int(None, 0), 0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(b"42"), 42);
        assert_eq!(parse_int(b" \t-7"), -7);
        assert_eq!(parse_int(b"+13"), 13);
        assert_eq!(parse_int(b"55%"), 55);
        assert_eq!(parse_int(b"abc"), 0);
        assert_eq!(parse_int(b""), 0);
        assert_eq!(parse_int(b"99999999999"), i32::MAX);
        assert_eq!(parse_int(b"-99999999999"), i32::MIN);
    }

    #[test]
    fn test_monitor_without_paths_yields_defaults() {
        let monitor = DockBatteryMonitor::with_paths(PowerSupplyPaths::default());
        assert_eq!(monitor.update(), DockStatusSnapshot::default());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = DockStatusSnapshot {
            status: ChargeStatus::NotCharging,
            level: 64,
            battery_present: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"status\":\"not_charging\""));
        assert!(json.contains("\"level\":64"));
    }
}
