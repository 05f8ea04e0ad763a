//! Mock implementations for testing without real hardware
//!
//! This module provides mock backends for the dock status source and the
//! touchpad control, allowing development and testing on machines without
//! an Asus keyboard dock.
//!
//! # Usage
//!
//! ```no_run
//! use asusdec_hal::mock::{MockDock, MockScenario};
//!
//! // A docked tablet charging from the dock's AC adapter
//! let dock = MockDock::new(MockScenario::DockCharging);
//! dock.status().set_level(42);
//! ```

use crate::status::{ChargeStatus, DockStatusSnapshot, DockStatusSource};
use crate::touchpad::{TouchpadControl, TouchpadOutcome};
use crate::device::CommandError;
use crate::DockError;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable selecting a mock scenario
pub const MOCK_SCENARIO_ENV: &str = "ASUSDEC_MOCK_SCENARIO";

/// Pre-defined dock scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockScenario {
    /// Tablet alone, nothing plugged in
    Undocked,
    /// Dock attached, running from the dock battery
    DockOnBattery,
    /// Dock attached, dock AC adapter charging the dock battery
    DockCharging,
    /// Dock attached, tablet charging over USB, dock battery full
    UsbCharging,
}

impl MockScenario {
    /// Get the snapshot this scenario reports
    pub fn to_snapshot(self) -> DockStatusSnapshot {
        match self {
            MockScenario::Undocked => DockStatusSnapshot::default(),
            MockScenario::DockOnBattery => DockStatusSnapshot {
                status: ChargeStatus::NotCharging,
                level: 76,
                battery_present: true,
                ..Default::default()
            },
            MockScenario::DockCharging => DockStatusSnapshot {
                status: ChargeStatus::Charging,
                level: 38,
                battery_present: true,
                dock_ac_online: true,
                ..Default::default()
            },
            MockScenario::UsbCharging => DockStatusSnapshot {
                status: ChargeStatus::NotCharging,
                level: 100,
                battery_present: true,
                pad_usb_online: true,
                ..Default::default()
            },
        }
    }

    /// Parse from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['-', '_'], "").as_str() {
            "undocked" => Some(MockScenario::Undocked),
            "dockonbattery" | "battery" => Some(MockScenario::DockOnBattery),
            "dockcharging" | "charging" => Some(MockScenario::DockCharging),
            "usbcharging" | "usb" => Some(MockScenario::UsbCharging),
            _ => None,
        }
    }

    /// Scenario named by `ASUSDEC_MOCK_SCENARIO`, if set and valid
    pub fn from_env() -> Option<Self> {
        std::env::var(MOCK_SCENARIO_ENV)
            .ok()
            .and_then(|s| Self::from_name(&s))
    }

    /// Get all scenarios
    pub fn all() -> &'static [MockScenario] {
        &[
            MockScenario::Undocked,
            MockScenario::DockOnBattery,
            MockScenario::DockCharging,
            MockScenario::UsbCharging,
        ]
    }
}

/// Shared mock state for synchronized access
#[derive(Debug)]
pub struct MockState {
    /// Snapshot returned by the status source
    pub snapshot: DockStatusSnapshot,
    /// Whether the device node can be opened
    pub device_present: bool,
    /// Error the control command fails with
    pub command_error: Option<CommandError>,
    /// Every touchpad request that reached the device, in order
    pub requests: Vec<bool>,
}

impl MockState {
    pub fn new(scenario: MockScenario) -> Self {
        Self {
            snapshot: scenario.to_snapshot(),
            device_present: true,
            command_error: None,
            requests: Vec::new(),
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(MockScenario::Undocked)
    }
}

/// Mock status source
#[derive(Debug, Clone)]
pub struct MockDockStatus {
    state: Arc<RwLock<MockState>>,
}

impl MockDockStatus {
    pub fn new(state: Arc<RwLock<MockState>>) -> Self {
        Self { state }
    }

    /// Simulate battery level change
    pub fn set_level(&self, level: i32) {
        if let Ok(mut state) = self.state.write() {
            state.snapshot.level = level;
        }
    }

    /// Simulate the dock AC adapter being plugged or unplugged
    pub fn set_dock_ac(&self, online: bool) {
        if let Ok(mut state) = self.state.write() {
            state.snapshot.dock_ac_online = online;
            state.snapshot.status = if online {
                ChargeStatus::Charging
            } else {
                ChargeStatus::NotCharging
            };
        }
    }

    /// Simulate attaching or detaching the dock
    pub fn set_docked(&self, docked: bool) {
        if let Ok(mut state) = self.state.write() {
            state.snapshot.battery_present = docked;
        }
    }
}

impl DockStatusSource for MockDockStatus {
    fn snapshot(&self) -> DockStatusSnapshot {
        self.state
            .read()
            .map(|s| s.snapshot)
            .unwrap_or_default()
    }
}

/// Mock touchpad control recording every request
#[derive(Debug, Clone)]
pub struct MockTouchpad {
    state: Arc<RwLock<MockState>>,
}

impl MockTouchpad {
    /// Standalone mock with its own state
    pub fn new() -> Self {
        Self::with_state(Arc::new(RwLock::new(MockState::default())))
    }

    pub fn with_state(state: Arc<RwLock<MockState>>) -> Self {
        Self { state }
    }

    /// Simulate the driver being loaded or not
    pub fn set_device_present(&self, present: bool) {
        if let Ok(mut state) = self.state.write() {
            state.device_present = present;
        }
    }

    /// Make the control command fail with `error`
    pub fn set_command_error(&self, error: Option<CommandError>) {
        if let Ok(mut state) = self.state.write() {
            state.command_error = error;
        }
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<bool> {
        self.state
            .read()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Last state the device accepted
    pub fn touchpad_enabled(&self) -> Option<bool> {
        self.state.read().ok().and_then(|s| {
            if s.command_error.is_some() {
                None
            } else {
                s.requests.last().copied()
            }
        })
    }
}

impl Default for MockTouchpad {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchpadControl for MockTouchpad {
    fn set_touchpad(&self, enable: bool) -> Result<TouchpadOutcome, DockError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| io::Error::other("mock state poisoned"))?;

        if !state.device_present {
            return Err(DockError::DeviceOpen {
                path: PathBuf::from("/dev/asusdec"),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        state.requests.push(enable);
        tracing::debug!("[MOCK] Touchpad set to {}", enable);

        Ok(TouchpadOutcome {
            enabled: enable,
            command_error: state.command_error,
        })
    }
}

/// Complete mock dock: status source and touchpad sharing one state
pub struct MockDock {
    pub status: MockDockStatus,
    pub touchpad: MockTouchpad,
    state: Arc<RwLock<MockState>>,
}

impl MockDock {
    /// Create a mock dock in the given scenario
    pub fn new(scenario: MockScenario) -> Self {
        let state = Arc::new(RwLock::new(MockState::new(scenario)));

        Self {
            status: MockDockStatus::new(Arc::clone(&state)),
            touchpad: MockTouchpad::with_state(Arc::clone(&state)),
            state,
        }
    }

    /// Get the status source
    pub fn status(&self) -> &MockDockStatus {
        &self.status
    }

    /// Get shared state for manipulation in tests
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }
}
