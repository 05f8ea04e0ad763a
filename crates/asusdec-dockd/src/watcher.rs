//! Poll loop state for `watch`

use crate::actions::report_outcome;
use asusdec_hal::{
    DockBatteryHandler, DockError, DockNotification, DockStatusSource, StatusCodes,
    TouchpadControl, TouchpadOutcome, TouchpadSwitch,
};
use tracing::{info, warn};

/// Follows the dock across polls and keeps the touchpad in the desired state
pub struct DockWatcher<S, C> {
    handler: DockBatteryHandler<S>,
    switch: TouchpadSwitch<C>,
    was_docked: bool,
    started: bool,
}

impl<S: DockStatusSource, C: TouchpadControl> DockWatcher<S, C> {
    pub fn new(source: S, control: C, codes: StatusCodes, touchpad_enabled: bool) -> Self {
        Self {
            handler: DockBatteryHandler::new(source, codes),
            switch: TouchpadSwitch::new(control, touchpad_enabled),
            was_docked: false,
            started: false,
        }
    }

    /// Poll once. Returns the host record when anything changed.
    ///
    /// The touchpad state is pushed at most once per attach. On the first
    /// poll an attached dock counts as an attach; without a dock the stored
    /// preference is restored instead.
    pub fn tick(&mut self) -> Option<DockNotification> {
        self.handler.update();
        self.handler.process();

        let docked = self.handler.snapshot().battery_present;
        if docked && !self.was_docked {
            info!("Dock attached");
            apply(self.switch.on_dock_event(true));
        } else if !docked && self.was_docked {
            info!("Dock detached");
        } else if !self.started {
            apply(self.switch.restore());
        }
        self.was_docked = docked;
        self.started = true;

        self.handler
            .has_new_data()
            .then(|| self.handler.notify_data())
    }

    /// Desired touchpad state
    pub fn touchpad_enabled(&self) -> bool {
        self.switch.enabled()
    }
}

fn apply(result: Result<Option<TouchpadOutcome>, DockError>) {
    match result {
        Ok(Some(outcome)) => report_outcome(&outcome),
        Ok(None) => {}
        Err(e) => warn!("Could not apply touchpad state: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asusdec_hal::mock::{MockDock, MockDockStatus, MockScenario, MockTouchpad};

    fn watcher(
        dock: &MockDock,
        touchpad_enabled: bool,
    ) -> DockWatcher<MockDockStatus, MockTouchpad> {
        DockWatcher::new(
            dock.status.clone(),
            dock.touchpad.clone(),
            StatusCodes::default(),
            touchpad_enabled,
        )
    }

    #[test]
    fn test_docked_start_pushes_disabled_preference_once() {
        let dock = MockDock::new(MockScenario::DockOnBattery);
        let mut watcher = watcher(&dock, false);

        assert!(watcher.tick().is_some());
        assert!(watcher.tick().is_none());
        assert_eq!(dock.touchpad.requests(), vec![false]);
    }

    #[test]
    fn test_undocked_start_restores_disabled_preference() {
        let dock = MockDock::new(MockScenario::Undocked);
        let mut watcher = watcher(&dock, false);

        watcher.tick();
        watcher.tick();
        assert_eq!(dock.touchpad.requests(), vec![false]);
    }

    #[test]
    fn test_undocked_start_leaves_enabled_touchpad_alone() {
        let dock = MockDock::new(MockScenario::Undocked);
        let mut watcher = watcher(&dock, true);

        watcher.tick();
        assert!(dock.touchpad.requests().is_empty());
        assert!(watcher.touchpad_enabled());
    }

    #[test]
    fn test_reattach_reapplies_preference() {
        let dock = MockDock::new(MockScenario::DockOnBattery);
        let mut watcher = watcher(&dock, false);
        watcher.tick();

        dock.status.set_docked(false);
        let detached = watcher.tick().unwrap();
        assert!(!detached.dock_present);
        assert_eq!(dock.touchpad.requests(), vec![false]);

        dock.status.set_docked(true);
        assert!(watcher.tick().unwrap().dock_present);
        assert_eq!(dock.touchpad.requests(), vec![false, false]);
    }

    #[test]
    fn test_level_change_is_reported() {
        let dock = MockDock::new(MockScenario::DockCharging);
        let mut watcher = watcher(&dock, true);
        watcher.tick();

        dock.status.set_level(39);
        let notification = watcher.tick().unwrap();
        assert_eq!(notification.dock_level, 39);
        assert_eq!(notification.dock_plugged, 1);
    }

    #[test]
    fn test_missing_device_does_not_stop_polling() {
        let dock = MockDock::new(MockScenario::DockOnBattery);
        dock.touchpad.set_device_present(false);
        let mut watcher = watcher(&dock, false);

        assert!(watcher.tick().is_some());
        assert!(dock.touchpad.requests().is_empty());
        assert!(!watcher.touchpad_enabled());
    }
}
