use thiserror::Error;

use crate::device::{DeviceId, HardwareProperty};

/// Raw status code returned by the OS (`OSStatus` on macOS)
pub type OsStatus = i32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: OsStatus,
    },

    #[error("Device {0} has no readable name")]
    NameUnavailable(DeviceId),

    #[error("Failed to register listener for {property:?}: status {status}")]
    ListenerRegistration {
        property: HardwareProperty,
        status: OsStatus,
    },

    #[error("Failed to register hotkey {id}: status {status}")]
    HotKeyRegistration { id: u32, status: OsStatus },

    #[error("Hotkey event handler error: status {0}")]
    HotKeyHandler(OsStatus),

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),
}

impl AudioError {
    pub fn status(operation: &'static str, status: OsStatus) -> Self {
        Self::Status { operation, status }
    }
}
