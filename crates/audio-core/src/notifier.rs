use std::sync::Arc;

use crate::device::HardwareProperty;
use crate::event::{UiEvent, UiSender};
use crate::traits::{AudioHardware, ChangeCallback};

/// Folds device-list and default-device changes into a single payload-free
/// [`UiEvent::DevicesChanged`] delivered on the UI queue.
pub struct DeviceChangeNotifier {
    hardware: Arc<dyn AudioHardware>,
}

impl DeviceChangeNotifier {
    pub fn new(hardware: Arc<dyn AudioHardware>) -> Self {
        Self { hardware }
    }

    /// Register listeners for the process lifetime. Returns the properties
    /// that were actually subscribed; a failed one is logged and skipped.
    pub fn start_monitoring(&self, sender: UiSender) -> Vec<HardwareProperty> {
        let mut watched = Vec::new();

        for property in HardwareProperty::ALL {
            let sender = sender.clone();
            let callback: ChangeCallback = Arc::new(move || sender.post(UiEvent::DevicesChanged));

            match self.hardware.add_property_listener(property, callback) {
                Ok(()) => watched.push(property),
                Err(e) => tracing::warn!(?property, "Failed to register change listener: {}", e),
            }
        }

        tracing::debug!(count = watched.len(), "Device change monitoring started");
        watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ui_channel;
    use crate::testing::FakeHardware;

    #[test]
    fn test_subscribes_to_all_three_properties() {
        let hardware = Arc::new(FakeHardware::speakers_and_headset());
        let (tx, _rx) = ui_channel();

        let watched = DeviceChangeNotifier::new(hardware.clone()).start_monitoring(tx);

        assert_eq!(watched.len(), 3);
        for property in HardwareProperty::ALL {
            assert!(hardware.listened_properties().contains(&property));
        }
    }

    #[test]
    fn test_every_trigger_becomes_devices_changed() {
        let hardware = Arc::new(FakeHardware::speakers_and_headset());
        let (tx, mut rx) = ui_channel();
        DeviceChangeNotifier::new(hardware.clone()).start_monitoring(tx);

        hardware.fire(HardwareProperty::DeviceList);
        hardware.fire(HardwareProperty::DefaultOutput);
        hardware.fire(HardwareProperty::DefaultInput);

        for _ in 0..3 {
            assert_eq!(rx.try_recv(), Some(UiEvent::DevicesChanged));
        }
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_failed_listener_does_not_abort_the_rest() {
        let hardware = Arc::new(FakeHardware::speakers_and_headset());
        hardware.fail_listener(HardwareProperty::DefaultInput);
        let (tx, mut rx) = ui_channel();

        let watched = DeviceChangeNotifier::new(hardware.clone()).start_monitoring(tx);

        assert_eq!(
            watched,
            vec![HardwareProperty::DefaultOutput, HardwareProperty::DeviceList]
        );
        hardware.fire(HardwareProperty::DefaultInput);
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_callback_from_foreign_thread_reaches_queue() {
        let hardware = Arc::new(FakeHardware::speakers_and_headset());
        let (tx, mut rx) = ui_channel();
        DeviceChangeNotifier::new(hardware.clone()).start_monitoring(tx);

        let remote = hardware.clone();
        std::thread::spawn(move || remote.fire(HardwareProperty::DeviceList))
            .join()
            .unwrap();

        assert_eq!(rx.try_recv(), Some(UiEvent::DevicesChanged));
    }
}
