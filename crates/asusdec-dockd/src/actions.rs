//! Touchpad commands that persist the user's preference

use anyhow::{Context, Result};
use asusdec_config::UserState;
use asusdec_hal::{
    DockError, DockKeyEvent, KeyHandled, TouchpadControl, TouchpadOutcome, TouchpadSwitch,
    handle_key_event,
};
use clap::ValueEnum;
use std::path::Path;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TouchpadAction {
    On,
    Off,
    Toggle,
}

/// Switch the touchpad and save the resulting preference
pub fn apply_touchpad_action<C: TouchpadControl>(
    control: C,
    state_file: &Path,
    action: TouchpadAction,
) -> Result<TouchpadOutcome> {
    with_saved_preference(control, state_file, |switch| match action {
        TouchpadAction::On => switch.set(true),
        TouchpadAction::Off => switch.set(false),
        TouchpadAction::Toggle => switch.toggle(),
    })
}

/// Handle one dock key event and save the preference if it changed
pub fn apply_key_event<C: TouchpadControl>(
    control: C,
    state_file: &Path,
    event: &DockKeyEvent,
) -> Result<KeyHandled> {
    with_saved_preference(control, state_file, |switch| {
        handle_key_event(switch, event)
    })
}

/// Run `f` against the stored preference and save it if `f` changed it.
/// The save happens even when the device could not be opened.
fn with_saved_preference<C, T, F>(control: C, state_file: &Path, f: F) -> Result<T>
where
    C: TouchpadControl,
    F: FnOnce(&mut TouchpadSwitch<C>) -> Result<T, DockError>,
{
    let mut state = UserState::load_or_default(state_file);
    let mut switch = TouchpadSwitch::new(control, state.touchpad_enabled);

    let result = f(&mut switch);

    if switch.enabled() != state.touchpad_enabled {
        state.touchpad_enabled = switch.enabled();
        state
            .save(state_file)
            .with_context(|| format!("Failed to save state to {}", state_file.display()))?;
    }

    result.context("Touchpad control failed")
}

pub fn report_outcome(outcome: &TouchpadOutcome) {
    if let Some(err) = outcome.command_error {
        error!(
            "Driver rejected touchpad command ({}), reporting requested state",
            err
        );
    }
}
