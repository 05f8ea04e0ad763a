//! Power-supply path discovery
//!
//! Walks the power-supply class directory once and records where the dock
//! battery, dock AC adapter, tablet AC adapter, and tablet USB charger
//! publish their state. Based on the type-attribute classification used by
//! the kernel power-supply class.

use crate::sysfs::{self, TYPE_CAPACITY};
use nix::unistd::{AccessFlags, access};
use std::fs;
use std::path::{Path, PathBuf};

/// Standard power-supply enumeration root
pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Power-supply kinds this dock exposes, keyed by the `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyKind {
    /// Tablet AC adapter
    Mains,
    /// Tablet USB port
    Usb,
    /// Battery inside the keyboard dock
    DockBattery,
    /// AC adapter plugged into the dock
    DockAc,
}

impl SupplyKind {
    /// Classify a trimmed `type` attribute value
    pub fn parse(value: &[u8]) -> Option<Self> {
        match value {
            b"Mains" => Some(SupplyKind::Mains),
            b"USB" => Some(SupplyKind::Usb),
            b"DockBattery" => Some(SupplyKind::DockBattery),
            b"DockAC" => Some(SupplyKind::DockAc),
            _ => None,
        }
    }

    /// Get sysfs type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyKind::Mains => "Mains",
            SupplyKind::Usb => "USB",
            SupplyKind::DockBattery => "DockBattery",
            SupplyKind::DockAc => "DockAC",
        }
    }
}

/// Attribute files of interest, resolved to absolute paths.
///
/// Built once by [`PowerSupplyPaths::resolve`] and read-only afterwards.
/// A `None` entry means the attribute was not found or was not readable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerSupplyPaths {
    pub dock_battery_status: Option<PathBuf>,
    pub dock_battery_capacity: Option<PathBuf>,
    pub dock_battery_present: Option<PathBuf>,
    pub pad_usb_online: Option<PathBuf>,
    pub ac_online: Option<PathBuf>,
    pub dock_ac_online: Option<PathBuf>,
}

impl PowerSupplyPaths {
    /// Scan `root` and record the attribute paths for every recognized supply.
    ///
    /// Never fails: an unreadable root leaves every path unset. Each path that
    /// is still unset after the scan is logged as a warning.
    pub fn resolve(root: &Path) -> Self {
        let mut paths = Self::default();

        match fs::read_dir(root) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    paths.classify(&entry.path());
                }
            }
            Err(e) => {
                tracing::warn!("Could not open {}: {}", root.display(), e);
            }
        }

        for name in paths.missing() {
            tracing::warn!("{} path not found", name);
        }

        paths
    }

    /// Names of the attributes that were not resolved
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("dock_battery_status", &self.dock_battery_status),
            ("dock_battery_capacity", &self.dock_battery_capacity),
            ("dock_battery_present", &self.dock_battery_present),
            ("pad_usb_online", &self.pad_usb_online),
            ("dock_ac_online", &self.dock_ac_online),
            ("ac_online", &self.ac_online),
        ]
        .into_iter()
        .filter(|(_, path)| path.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// True when every attribute was resolved
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    fn classify(&mut self, supply: &Path) {
        let type_path = supply.join("type");
        let Some(value) = sysfs::read_from_file(Some(&type_path), TYPE_CAPACITY) else {
            return;
        };
        let Some(kind) = SupplyKind::parse(&value) else {
            tracing::debug!(
                "Ignoring {} of type {}",
                supply.display(),
                String::from_utf8_lossy(&value)
            );
            return;
        };

        tracing::info!("Found {} supply at {}", kind.as_str(), supply.display());

        match kind {
            SupplyKind::Mains => record(&mut self.ac_online, supply.join("online")),
            SupplyKind::Usb => record(&mut self.pad_usb_online, supply.join("online")),
            SupplyKind::DockBattery => {
                record(&mut self.dock_battery_status, supply.join("status"));
                record(&mut self.dock_battery_capacity, supply.join("capacity"));
                record(&mut self.dock_battery_present, supply.join("device/ec_dock"));
            }
            SupplyKind::DockAc => record(&mut self.dock_ac_online, supply.join("online")),
        }
    }
}

/// Store `candidate` in `slot` only if it is readable
fn record(slot: &mut Option<PathBuf>, candidate: PathBuf) {
    if access(&candidate, AccessFlags::R_OK).is_ok() {
        *slot = Some(candidate);
    } else {
        tracing::debug!("Skipping unreadable {}", candidate.display());
    }
}
