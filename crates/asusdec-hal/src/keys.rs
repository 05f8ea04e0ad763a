//! Dock keyboard special keys
//!
//! The dock's top row reports vendor scancodes rather than standard
//! keycodes. Only the touchpad key is acted on here; the others are
//! classified so the host can run its own action for them.

use crate::touchpad::{TouchpadControl, TouchpadOutcome, TouchpadSwitch};
use crate::DockError;

pub const SCANCODE_TOGGLE_WIFI: u16 = 238;
pub const SCANCODE_TOGGLE_BT: u16 = 237;
pub const SCANCODE_TOGGLE_TOUCHPAD: u16 = 60;
pub const SCANCODE_BRIGHTNESS_DOWN: u16 = 224;
pub const SCANCODE_BRIGHTNESS_UP: u16 = 225;
pub const SCANCODE_BRIGHTNESS_AUTO: u16 = 61;
pub const SCANCODE_SCREENSHOT: u16 = 212;
pub const SCANCODE_SETTINGS: u16 = 62;
pub const SCANCODE_VOLUME_MUTE: u16 = 113;

/// Special keys on the dock keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockKey {
    ToggleWifi,
    ToggleBluetooth,
    ToggleTouchpad,
    BrightnessDown,
    BrightnessUp,
    BrightnessAuto,
    Screenshot,
    Settings,
    VolumeMute,
}

impl DockKey {
    /// Classify a raw scancode
    pub fn from_scancode(scancode: u16) -> Option<Self> {
        match scancode {
            SCANCODE_TOGGLE_WIFI => Some(DockKey::ToggleWifi),
            SCANCODE_TOGGLE_BT => Some(DockKey::ToggleBluetooth),
            SCANCODE_TOGGLE_TOUCHPAD => Some(DockKey::ToggleTouchpad),
            SCANCODE_BRIGHTNESS_DOWN => Some(DockKey::BrightnessDown),
            SCANCODE_BRIGHTNESS_UP => Some(DockKey::BrightnessUp),
            SCANCODE_BRIGHTNESS_AUTO => Some(DockKey::BrightnessAuto),
            SCANCODE_SCREENSHOT => Some(DockKey::Screenshot),
            SCANCODE_SETTINGS => Some(DockKey::Settings),
            SCANCODE_VOLUME_MUTE => Some(DockKey::VolumeMute),
            _ => None,
        }
    }

    /// Whether handling the key hides it from the rest of the input stack.
    ///
    /// Mute is acted on but still passed along, since the regular key
    /// handling needs to see it too.
    pub fn is_consumed(self) -> bool {
        !matches!(self, DockKey::VolumeMute)
    }
}

/// Key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// A key event from the dock keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockKeyEvent {
    pub scancode: u16,
    pub state: KeyState,
    /// Autorepeat count, 0 for the initial press
    pub repeat_count: u32,
}

impl DockKeyEvent {
    /// Initial key-down for `scancode`
    pub fn down(scancode: u16) -> Self {
        Self {
            scancode,
            state: KeyState::Down,
            repeat_count: 0,
        }
    }

    /// The key this event triggers. Releases and autorepeats trigger nothing.
    pub fn key(&self) -> Option<DockKey> {
        if self.state != KeyState::Down || self.repeat_count != 0 {
            return None;
        }
        DockKey::from_scancode(self.scancode)
    }
}

/// What handling one key event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHandled {
    pub key: Option<DockKey>,
    /// True when the event must not reach the rest of the input stack
    pub consumed: bool,
    /// Set when the event toggled the touchpad
    pub touchpad: Option<TouchpadOutcome>,
}

/// Handle a key event, toggling the touchpad on the touchpad key.
///
/// A device-open failure is returned after the desired state has flipped,
/// so the caller can still persist the new preference.
pub fn handle_key_event<C: TouchpadControl>(
    switch: &mut TouchpadSwitch<C>,
    event: &DockKeyEvent,
) -> Result<KeyHandled, DockError> {
    let Some(key) = event.key() else {
        return Ok(KeyHandled {
            key: None,
            consumed: false,
            touchpad: None,
        });
    };

    tracing::debug!("Dock key {:?}", key);

    let touchpad = match key {
        DockKey::ToggleTouchpad => Some(switch.toggle()?),
        _ => None,
    };

    Ok(KeyHandled {
        key: Some(key),
        consumed: key.is_consumed(),
        touchpad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTouchpad;

    #[test]
    fn test_from_scancode() {
        assert_eq!(DockKey::from_scancode(60), Some(DockKey::ToggleTouchpad));
        assert_eq!(DockKey::from_scancode(238), Some(DockKey::ToggleWifi));
        assert_eq!(DockKey::from_scancode(113), Some(DockKey::VolumeMute));
        assert_eq!(DockKey::from_scancode(30), None);
    }

    #[test]
    fn test_mute_is_not_consumed() {
        assert!(DockKey::ToggleTouchpad.is_consumed());
        assert!(DockKey::Screenshot.is_consumed());
        assert!(!DockKey::VolumeMute.is_consumed());
    }

    #[test]
    fn test_only_first_key_down_triggers() {
        let press = DockKeyEvent::down(SCANCODE_TOGGLE_TOUCHPAD);
        assert_eq!(press.key(), Some(DockKey::ToggleTouchpad));

        let repeat = DockKeyEvent {
            repeat_count: 1,
            ..press
        };
        assert_eq!(repeat.key(), None);

        let release = DockKeyEvent {
            state: KeyState::Up,
            ..press
        };
        assert_eq!(release.key(), None);
    }

    #[test]
    fn test_touchpad_key_toggles() {
        let mock = MockTouchpad::new();
        let mut switch = TouchpadSwitch::new(mock.clone(), true);

        let handled = handle_key_event(&mut switch, &DockKeyEvent::down(60)).unwrap();
        assert!(handled.consumed);
        assert_eq!(handled.key, Some(DockKey::ToggleTouchpad));
        assert!(!handled.touchpad.unwrap().enabled);

        handle_key_event(&mut switch, &DockKeyEvent::down(60)).unwrap();
        assert_eq!(mock.requests(), vec![false, true]);
        assert!(switch.enabled());
    }

    #[test]
    fn test_other_keys_leave_touchpad_alone() {
        let mock = MockTouchpad::new();
        let mut switch = TouchpadSwitch::new(mock.clone(), true);

        let mute = handle_key_event(&mut switch, &DockKeyEvent::down(113)).unwrap();
        assert_eq!(mute.key, Some(DockKey::VolumeMute));
        assert!(!mute.consumed);

        let unknown = handle_key_event(&mut switch, &DockKeyEvent::down(30)).unwrap();
        assert_eq!(unknown.key, None);
        assert!(!unknown.consumed);

        let held = DockKeyEvent {
            repeat_count: 3,
            ..DockKeyEvent::down(60)
        };
        assert!(!handle_key_event(&mut switch, &held).unwrap().consumed);

        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_touchpad_key_flips_preference_without_device() {
        let mock = MockTouchpad::new();
        mock.set_device_present(false);
        let mut switch = TouchpadSwitch::new(mock, true);

        assert!(handle_key_event(&mut switch, &DockKeyEvent::down(60)).is_err());
        assert!(!switch.enabled());
    }
}
