//! Touchpad control
//!
//! The dock's touchpad is powered on and off through an ioctl on the
//! `asusdec` character device. The device node is opened for the duration
//! of a single request and closed again before returning.

use crate::device::CommandError;
use crate::DockError;
use std::fs::OpenOptions;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Dock controller device node
pub const ASUSDEC_DEVICE: &str = "/dev/asusdec";

/// Payload values understood by the driver
const ASUSDEC_TP_ON: libc::c_int = 1;
const ASUSDEC_TP_OFF: libc::c_int = 0;

const ASUSDEC_IOC_MAGIC: u8 = 0xf4;
const ASUSDEC_TP_CONTROL_NR: u8 = 5;

// The driver declares the request as _IOR(0xf4, 5, int) but takes the
// payload by value, not through a pointer.
nix::ioctl_write_int_bad!(
    asusdec_tp_control,
    nix::request_code_read!(
        ASUSDEC_IOC_MAGIC,
        ASUSDEC_TP_CONTROL_NR,
        std::mem::size_of::<libc::c_int>()
    )
);

/// Result of a touchpad request that reached the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchpadOutcome {
    /// The state that was requested and is reported to the host
    pub enabled: bool,
    /// Why the control command was not accepted, if it wasn't
    pub command_error: Option<CommandError>,
}

impl TouchpadOutcome {
    /// True when the driver accepted the command
    pub fn is_confirmed(&self) -> bool {
        self.command_error.is_none()
    }
}

/// Anything that can switch the touchpad on or off
pub trait TouchpadControl {
    /// Request the touchpad state.
    ///
    /// Fails only when the device cannot be opened. A rejected control
    /// command is reported through [`TouchpadOutcome::command_error`].
    fn set_touchpad(&self, enable: bool) -> Result<TouchpadOutcome, DockError>;
}

/// The `asusdec` character device
#[derive(Debug, Clone)]
pub struct AsusdecDevice {
    path: PathBuf,
}

impl AsusdecDevice {
    /// Use the standard device node
    pub fn new() -> Self {
        Self::with_path(ASUSDEC_DEVICE)
    }

    /// Use a custom device node
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get device node path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for AsusdecDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchpadControl for AsusdecDevice {
    fn set_touchpad(&self, enable: bool) -> Result<TouchpadOutcome, DockError> {
        tracing::debug!("Switching touchpad {}", enable);

        let device = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
            .map_err(|source| {
                tracing::error!("Could not open device {}: {}", self.path.display(), source);
                DockError::DeviceOpen {
                    path: self.path.clone(),
                    source,
                }
            })?;

        let payload = if enable { ASUSDEC_TP_ON } else { ASUSDEC_TP_OFF };

        // SAFETY: the descriptor stays open for the duration of the call and
        // the request takes its argument by value.
        let command_error =
            command_failure(unsafe { asusdec_tp_control(device.as_raw_fd(), payload) });

        drop(device);

        tracing::info!("Touchpad is {}", payload);
        Ok(TouchpadOutcome {
            enabled: enable,
            command_error,
        })
    }
}

/// Map the raw ioctl result; anything but a zero return is a failure
fn command_failure(result: nix::Result<libc::c_int>) -> Option<CommandError> {
    match result {
        Ok(0) => None,
        Ok(status) => {
            tracing::error!("Error calling ioctl, returned {}", status);
            Some(CommandError::Status(status))
        }
        Err(errno) => {
            tracing::error!("Error calling ioctl, {}", errno);
            Some(CommandError::Errno(errno))
        }
    }
}

/// Tracks the desired touchpad state and pushes it to a [`TouchpadControl`]
pub struct TouchpadSwitch<C> {
    control: C,
    enabled: bool,
}

impl<C: TouchpadControl> TouchpadSwitch<C> {
    /// Create the switch with the stored preference
    pub fn new(control: C, enabled: bool) -> Self {
        Self { control, enabled }
    }

    /// Push a disabled preference to the device.
    ///
    /// The driver brings the touchpad up enabled, so only "off" needs
    /// restoring. Returns `None` when there was nothing to do.
    pub fn restore(&self) -> Result<Option<TouchpadOutcome>, DockError> {
        if self.enabled {
            return Ok(None);
        }
        self.apply().map(Some)
    }

    /// Desired touchpad state
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the desired state and apply it.
    ///
    /// The desired state flips even if the device cannot be reached.
    pub fn toggle(&mut self) -> Result<TouchpadOutcome, DockError> {
        self.enabled = !self.enabled;
        self.apply()
    }

    /// Set the desired state and apply it
    pub fn set(&mut self, enabled: bool) -> Result<TouchpadOutcome, DockError> {
        self.enabled = enabled;
        self.apply()
    }

    /// Re-apply the desired state when the dock is attached.
    ///
    /// Returns `None` on undock, where there is nothing to configure.
    pub fn on_dock_event(&self, docked: bool) -> Result<Option<TouchpadOutcome>, DockError> {
        if !docked {
            return Ok(None);
        }
        self.apply().map(Some)
    }

    fn apply(&self) -> Result<TouchpadOutcome, DockError> {
        self.control.set_touchpad(self.enabled)
    }
}
