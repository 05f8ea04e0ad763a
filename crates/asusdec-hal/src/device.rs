//! Error types shared by the dock components

use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DockError {
    #[error("Could not open device {path}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DockError {
    /// True when the failure means the dock driver is simply not present
    pub fn is_device_missing(&self) -> bool {
        matches!(
            self,
            DockError::DeviceOpen { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// A touchpad control command the driver did not accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("ioctl failed: {0}")]
    Errno(#[from] Errno),

    /// The call went through but returned a non-zero status
    #[error("driver returned status {0}")]
    Status(libc::c_int),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_dock_error_display() {
        let err = DockError::DeviceOpen {
            path: PathBuf::from("/dev/asusdec"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(format!("{err}").starts_with("Could not open device /dev/asusdec"));
        assert!(err.is_device_missing());
    }

    #[test]
    fn test_permission_denied_is_not_missing() {
        let err = DockError::DeviceOpen {
            path: PathBuf::from("/dev/asusdec"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!err.is_device_missing());
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::from(Errno::ENOTTY);
        assert_eq!(err, CommandError::Errno(Errno::ENOTTY));
        assert!(format!("{err}").starts_with("ioctl failed"));

        let err = CommandError::Status(3);
        assert_eq!(format!("{err}"), "driver returned status 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: DockError = io::Error::other("boom").into();
        assert!(matches!(err, DockError::Io(_)));
    }
}
