//! Hardware Abstraction Layer for the Asus transformer keyboard dock
//!
//! The dock exposes its battery, AC adapter, and the tablet's USB charger
//! through the kernel power-supply class, and its touchpad through the
//! `asusdec` character device. This crate locates the relevant sysfs
//! attributes once, turns them into typed status snapshots on every poll,
//! and drives the touchpad control ioctl.
//!
//! # Example
//!
//! ```no_run
//! use asusdec_hal::{DockBatteryMonitor, POWER_SUPPLY_ROOT};
//! use std::path::Path;
//!
//! let monitor = DockBatteryMonitor::new(Path::new(POWER_SUPPLY_ROOT));
//! let snapshot = monitor.update();
//! println!("Dock battery at {}% ({:?})", snapshot.level, snapshot.status);
//! ```

pub mod device;
pub mod handler;
pub mod keys;
pub mod mock;
pub mod power;
pub mod status;
pub mod sysfs;
pub mod touchpad;

pub use device::{CommandError, DockError};
pub use handler::{DockBatteryHandler, DockNotification, PlugSource};
pub use keys::{DockKey, DockKeyEvent, KeyHandled, KeyState, handle_key_event};
pub use power::{POWER_SUPPLY_ROOT, PowerSupplyPaths, SupplyKind};
pub use status::{
    ChargeStatus, DockBatteryMonitor, DockStatusSnapshot, DockStatusSource, StatusCodes,
};
pub use touchpad::{
    ASUSDEC_DEVICE, AsusdecDevice, TouchpadControl, TouchpadOutcome, TouchpadSwitch,
};

/// HAL Result type
pub type Result<T> = std::result::Result<T, DockError>;
