use std::sync::Arc;

use crate::device::{DeviceId, Direction};
use crate::traits::AudioHardware;

/// Reads and writes the OS-wide default device. Every read goes to the OS;
/// writes are fire-and-forget and confirmed later by a change notification.
#[derive(Clone)]
pub struct DefaultDeviceController {
    hardware: Arc<dyn AudioHardware>,
}

impl DefaultDeviceController {
    pub fn new(hardware: Arc<dyn AudioHardware>) -> Self {
        Self { hardware }
    }

    pub fn get_default_output_device(&self) -> Option<DeviceId> {
        self.default_device(Direction::Output)
    }

    pub fn get_default_input_device(&self) -> Option<DeviceId> {
        self.default_device(Direction::Input)
    }

    pub fn set_default_output_device(&self, id: DeviceId) {
        self.set_default_device(Direction::Output, id);
    }

    pub fn set_default_input_device(&self, id: DeviceId) {
        self.set_default_device(Direction::Input, id);
    }

    /// `None` covers both "no device" and a failed query
    pub fn default_device(&self, direction: Direction) -> Option<DeviceId> {
        match self.hardware.default_device(direction) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%direction, "Error getting default device: {}", e);
                None
            }
        }
    }

    pub fn set_default_device(&self, direction: Direction, id: DeviceId) {
        match self.hardware.set_default_device(direction, id) {
            Ok(()) => tracing::info!(device_id = id, %direction, "Switched default device"),
            Err(e) => tracing::error!(device_id = id, %direction, "Error setting default device: {}", e),
        }
    }
}
