use std::sync::Arc;

use crate::device::{AudioDevice, DeviceId, Direction};
use crate::traits::AudioHardware;

/// Read-only view of the device roster. Nothing is cached between calls and
/// the order is whatever the hardware layer reports.
#[derive(Clone)]
pub struct DeviceDirectory {
    hardware: Arc<dyn AudioHardware>,
}

impl DeviceDirectory {
    pub fn new(hardware: Arc<dyn AudioHardware>) -> Self {
        Self { hardware }
    }

    /// Every named device with at least one usable direction. Query failures
    /// degrade to an empty list.
    pub fn list_devices(&self) -> Vec<AudioDevice> {
        let ids = match self.hardware.device_ids() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Error getting device list: {}", e);
                return Vec::new();
            }
        };

        ids.into_iter().filter_map(|id| self.resolve(id)).collect()
    }

    pub fn list_output_devices(&self) -> Vec<AudioDevice> {
        self.list(Direction::Output)
    }

    pub fn list_input_devices(&self) -> Vec<AudioDevice> {
        self.list(Direction::Input)
    }

    pub fn list(&self, direction: Direction) -> Vec<AudioDevice> {
        self.list_devices()
            .into_iter()
            .filter(|device| device.supports(direction))
            .collect()
    }

    /// Name of a device currently on the roster
    pub fn device_name(&self, id: DeviceId) -> Option<String> {
        self.hardware.device_name(id).ok()
    }

    fn resolve(&self, id: DeviceId) -> Option<AudioDevice> {
        let name = match self.hardware.device_name(id) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(device_id = id, "Skipping device: {}", e);
                return None;
            }
        };

        let has_output = self.channel_count(id, Direction::Output) > 0;
        let has_input = self.channel_count(id, Direction::Input) > 0;

        if !has_output && !has_input {
            tracing::trace!(device_id = id, name = %name, "Skipping device without streams");
            return None;
        }

        Some(AudioDevice::new(id, name, has_output, has_input))
    }

    fn channel_count(&self, id: DeviceId, direction: Direction) -> u32 {
        self.hardware
            .channel_count(id, direction)
            .unwrap_or_else(|e| {
                tracing::debug!(device_id = id, %direction, "Channel count unavailable: {}", e);
                0
            })
    }
}
