//! Dock battery change tracking
//!
//! Polls a [`DockStatusSource`], derives where the dock is drawing power
//! from, and tells the caller whether anything changed since the last
//! report.

use crate::status::{DockStatusSnapshot, DockStatusSource, StatusCodes};
use serde::{Deserialize, Serialize};

/// Where charging power comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlugSource {
    #[default]
    None,
    Ac,
    Usb,
}

impl PlugSource {
    /// Derive the plug source; AC (tablet or dock adapter) wins over USB
    pub fn from_snapshot(snapshot: &DockStatusSnapshot) -> Self {
        if snapshot.ac_online || snapshot.dock_ac_online {
            PlugSource::Ac
        } else if snapshot.pad_usb_online {
            PlugSource::Usb
        } else {
            PlugSource::None
        }
    }

    /// Battery manager plug code
    pub fn code(&self) -> i32 {
        match self {
            PlugSource::None => 0,
            PlugSource::Ac => 1,
            PlugSource::Usb => 2,
        }
    }
}

/// Data handed to the host when the dock state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockNotification {
    pub dock_status: i32,
    pub dock_level: i32,
    pub dock_present: bool,
    pub dock_plugged: i32,
    pub usb_wakeup: bool,
    pub ac_online: bool,
    pub dock_ac_online: bool,
}

/// Tracks dock battery state between polls
pub struct DockBatteryHandler<S> {
    source: S,
    codes: StatusCodes,
    current: DockStatusSnapshot,
    plugged: PlugSource,
    last: Option<(DockStatusSnapshot, PlugSource)>,
}

impl<S: DockStatusSource> DockBatteryHandler<S> {
    pub fn new(source: S, codes: StatusCodes) -> Self {
        Self {
            source,
            codes,
            current: DockStatusSnapshot::default(),
            plugged: PlugSource::None,
            last: None,
        }
    }

    /// Take a fresh snapshot from the source
    pub fn update(&mut self) {
        self.current = self.source.snapshot();
    }

    /// Derive the plug source from the current snapshot
    pub fn process(&mut self) {
        self.plugged = PlugSource::from_snapshot(&self.current);
    }

    /// Whether anything changed since the previous call.
    ///
    /// Always true the first time. Each call remembers the current values.
    pub fn has_new_data(&mut self) -> bool {
        let now = (self.current, self.plugged);
        let changed = self.last != Some(now);
        if changed {
            tracing::debug!("Dock state changed: {:?}", self.current);
        }
        self.last = Some(now);
        changed
    }

    /// Dock battery present and some charger connected
    pub fn is_plugged(&self) -> bool {
        self.current.battery_present && self.plugged != PlugSource::None
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &DockStatusSnapshot {
        &self.current
    }

    /// Current plug source
    pub fn plugged(&self) -> PlugSource {
        self.plugged
    }

    /// Build the host notification from the current state
    pub fn notify_data(&self) -> DockNotification {
        DockNotification {
            dock_status: self.current.status.code(&self.codes),
            dock_level: self.current.level,
            dock_present: self.current.battery_present,
            dock_plugged: self.plugged.code(),
            usb_wakeup: self.current.pad_usb_online,
            ac_online: self.current.ac_online,
            dock_ac_online: self.current.dock_ac_online,
        }
    }
}
