//! In-memory hardware and hotkey backends for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use crate::device::{DeviceId, Direction, HardwareProperty};
use crate::error::AudioError;
use crate::hotkey::HotKeyBinding;
use crate::traits::{AudioHardware, ChangeCallback, HotKeyBackend, HotKeyHandle, HotKeyHandler};

#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub id: DeviceId,
    pub name: Option<String>,
    pub output_channels: u32,
    pub input_channels: u32,
}

#[derive(Default)]
struct FakeState {
    devices: Vec<FakeDevice>,
    default_output: Option<DeviceId>,
    default_input: Option<DeviceId>,
    fail_enumeration: bool,
    fail_writes: bool,
    failing_listeners: Vec<HardwareProperty>,
    set_calls: Vec<(Direction, DeviceId)>,
    listeners: Vec<(HardwareProperty, ChangeCallback)>,
}

#[derive(Default)]
pub struct FakeHardware {
    state: Mutex<FakeState>,
}

impl FakeHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speakers (id 1, output only) and a headset (id 2, output + input),
    /// speakers as the default output and the headset as default input
    pub fn speakers_and_headset() -> Self {
        Self::new()
            .with_device(1, "Speakers", 2, 0)
            .with_device(2, "Headset", 2, 1)
            .with_defaults(Some(1), Some(2))
    }

    pub fn with_device(self, id: DeviceId, name: &str, output_channels: u32, input_channels: u32) -> Self {
        self.push_device(FakeDevice {
            id,
            name: Some(name.to_string()),
            output_channels,
            input_channels,
        });
        self
    }

    pub fn with_unnamed_device(self, id: DeviceId, output_channels: u32, input_channels: u32) -> Self {
        self.push_device(FakeDevice {
            id,
            name: None,
            output_channels,
            input_channels,
        });
        self
    }

    pub fn with_defaults(self, output: Option<DeviceId>, input: Option<DeviceId>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.default_output = output;
            state.default_input = input;
        }
        self
    }

    pub fn push_device(&self, device: FakeDevice) {
        self.state.lock().unwrap().devices.push(device);
    }

    pub fn remove_device(&self, id: DeviceId) {
        self.state.lock().unwrap().devices.retain(|d| d.id != id);
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.state.lock().unwrap().fail_enumeration = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_listener(&self, property: HardwareProperty) {
        self.state.lock().unwrap().failing_listeners.push(property);
    }

    /// Simulate another process or the user changing the system default
    pub fn set_system_default(&self, direction: Direction, id: Option<DeviceId>) {
        let mut state = self.state.lock().unwrap();
        match direction {
            Direction::Output => state.default_output = id,
            Direction::Input => state.default_input = id,
        }
    }

    pub fn set_calls(&self) -> Vec<(Direction, DeviceId)> {
        self.state.lock().unwrap().set_calls.clone()
    }

    pub fn listened_properties(&self) -> Vec<HardwareProperty> {
        self.state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .map(|(property, _)| *property)
            .collect()
    }

    /// Invoke every listener registered for `property`, outside the lock
    pub fn fire(&self, property: HardwareProperty) {
        let callbacks: Vec<ChangeCallback> = self
            .state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|(p, _)| *p == property)
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in callbacks {
            callback();
        }
    }
}

impl AudioHardware for FakeHardware {
    fn device_ids(&self) -> Result<Vec<DeviceId>, AudioError> {
        let state = self.state.lock().unwrap();
        if state.fail_enumeration {
            return Err(AudioError::status("AudioObjectGetPropertyDataSize", -50));
        }
        Ok(state.devices.iter().map(|d| d.id).collect())
    }

    fn device_name(&self, id: DeviceId) -> Result<String, AudioError> {
        let state = self.state.lock().unwrap();
        state
            .devices
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.name.clone())
            .ok_or(AudioError::NameUnavailable(id))
    }

    fn channel_count(&self, id: DeviceId, direction: Direction) -> Result<u32, AudioError> {
        let state = self.state.lock().unwrap();
        let device = state
            .devices
            .iter()
            .find(|d| d.id == id)
            .ok_or(AudioError::status("AudioObjectGetPropertyData", -50))?;
        Ok(match direction {
            Direction::Output => device.output_channels,
            Direction::Input => device.input_channels,
        })
    }

    fn default_device(&self, direction: Direction) -> Result<Option<DeviceId>, AudioError> {
        let state = self.state.lock().unwrap();
        Ok(match direction {
            Direction::Output => state.default_output,
            Direction::Input => state.default_input,
        })
    }

    fn set_default_device(&self, direction: Direction, id: DeviceId) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        state.set_calls.push((direction, id));
        if state.fail_writes {
            return Err(AudioError::status("AudioObjectSetPropertyData", -50));
        }
        match direction {
            Direction::Output => state.default_output = Some(id),
            Direction::Input => state.default_input = Some(id),
        }
        Ok(())
    }

    fn add_property_listener(
        &self,
        property: HardwareProperty,
        callback: ChangeCallback,
    ) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_listeners.contains(&property) {
            return Err(AudioError::ListenerRegistration {
                property,
                status: -50,
            });
        }
        state.listeners.push((property, callback));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeHotKeys {
    pub handler: Option<HotKeyHandler>,
    pub registered: HashMap<u64, (u32, HotKeyBinding)>,
    pub failing_ids: Vec<u32>,
    pub fail_install: bool,
    pub install_count: usize,
    pub handler_installed_before_first_register: Option<bool>,
    pub unregister_calls: usize,
    pub remove_handler_calls: usize,
    pub next_handle: u64,
}

impl FakeHotKeys {
    pub fn press(&self, id: u32) {
        if let Some(handler) = &self.handler {
            handler(id);
        }
    }
}

impl HotKeyBackend for FakeHotKeys {
    fn install_handler(&mut self, handler: HotKeyHandler) -> Result<(), AudioError> {
        if self.fail_install {
            return Err(AudioError::HotKeyHandler(-9874));
        }
        self.install_count += 1;
        self.handler = Some(handler);
        Ok(())
    }

    fn register(&mut self, id: u32, binding: &HotKeyBinding) -> Result<HotKeyHandle, AudioError> {
        if self.handler_installed_before_first_register.is_none() {
            self.handler_installed_before_first_register = Some(self.handler.is_some());
        }
        if self.failing_ids.contains(&id) {
            return Err(AudioError::HotKeyRegistration { id, status: -9878 });
        }
        self.next_handle += 1;
        self.registered.insert(self.next_handle, (id, *binding));
        Ok(HotKeyHandle(self.next_handle))
    }

    fn unregister(&mut self, handle: HotKeyHandle) -> Result<(), AudioError> {
        self.unregister_calls += 1;
        self.registered.remove(&handle.0);
        Ok(())
    }

    fn remove_handler(&mut self) -> Result<(), AudioError> {
        self.remove_handler_calls += 1;
        self.handler = None;
        Ok(())
    }
}
