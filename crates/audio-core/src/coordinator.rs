//! Switch coordination
//!
//! [`SwitchCoordinator`] is the only owner of [`SwitchHistory`]. It lives on
//! the UI thread and is driven by the dispatcher; OS callbacks never reach it
//! directly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::controller::DefaultDeviceController;
use crate::device::{AudioDevice, DeviceId, Direction};
use crate::directory::DeviceDirectory;
use crate::history::SwitchHistory;
use crate::hotkey::HotKeyAction;
use crate::traits::AudioHardware;

/// Transient confirmation surfaced after a switch request was issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfirmation {
    pub direction: Direction,
    pub device_id: DeviceId,
    pub device_name: Option<String>,
}

impl SwitchConfirmation {
    pub fn message(&self) -> String {
        let kind = match self.direction {
            Direction::Output => "Output",
            Direction::Input => "Input",
        };
        match &self.device_name {
            Some(name) => format!("{}: {}", kind, name),
            None => format!("{}: device {}", kind, self.device_id),
        }
    }
}

/// Everything a presentation layer needs to redraw after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub outputs: Vec<AudioDevice>,
    pub inputs: Vec<AudioDevice>,
    pub default_output: Option<DeviceId>,
    pub default_input: Option<DeviceId>,
}

pub struct SwitchCoordinator {
    directory: DeviceDirectory,
    controller: DefaultDeviceController,
    history: SwitchHistory,
}

impl SwitchCoordinator {
    /// Seed the history from the defaults the OS reports right now
    pub fn new(hardware: Arc<dyn AudioHardware>) -> Self {
        let directory = DeviceDirectory::new(hardware.clone());
        let controller = DefaultDeviceController::new(hardware);
        let history = SwitchHistory::new(
            controller.get_default_output_device(),
            controller.get_default_input_device(),
        );

        tracing::debug!(
            output = ?history.current(Direction::Output),
            input = ?history.current(Direction::Input),
            "Switch history initialized"
        );

        Self {
            directory,
            controller,
            history,
        }
    }

    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    pub fn controller(&self) -> &DefaultDeviceController {
        &self.controller
    }

    pub fn history(&self) -> &SwitchHistory {
        &self.history
    }

    pub fn list_output_devices(&self) -> Vec<AudioDevice> {
        self.directory.list_output_devices()
    }

    pub fn list_input_devices(&self) -> Vec<AudioDevice> {
        self.directory.list_input_devices()
    }

    pub fn get_default_output_device(&self) -> Option<DeviceId> {
        self.controller.get_default_output_device()
    }

    pub fn get_default_input_device(&self) -> Option<DeviceId> {
        self.controller.get_default_input_device()
    }

    pub fn switch_output(&mut self, id: DeviceId) -> Option<SwitchConfirmation> {
        self.switch(Direction::Output, id)
    }

    pub fn switch_input(&mut self, id: DeviceId) -> Option<SwitchConfirmation> {
        self.switch(Direction::Input, id)
    }

    /// Write the new default and remember the device it replaced. Asking for
    /// the current device re-asserts it and leaves `previous` alone.
    pub fn switch(&mut self, direction: Direction, id: DeviceId) -> Option<SwitchConfirmation> {
        let entry = self.history.get(direction);
        if entry.current == Some(id) {
            tracing::debug!(device_id = id, %direction, "Re-asserting current device");
        }

        self.controller.set_default_device(direction, id);
        self.history.get_mut(direction).record(id);

        Some(SwitchConfirmation {
            direction,
            device_id: id,
            device_name: self.directory.device_name(id),
        })
    }

    pub fn toggle_last_two(&mut self) -> Option<SwitchConfirmation> {
        match self.history.previous(Direction::Output) {
            Some(previous) => self.switch_output(previous),
            None => {
                tracing::info!("No previous output device to toggle to");
                None
            }
        }
    }

    /// Zero-based slot resolved against a live output listing
    pub fn switch_to_slot(&mut self, slot: usize) -> Option<SwitchConfirmation> {
        let outputs = self.directory.list_output_devices();
        match outputs.get(slot) {
            Some(device) => self.switch_output(device.id),
            None => {
                tracing::info!(slot, available = outputs.len(), "No output device in slot");
                None
            }
        }
    }

    pub fn handle_action(&mut self, action: HotKeyAction) -> Option<SwitchConfirmation> {
        tracing::debug!(?action, "Hotkey pressed");
        match action {
            HotKeyAction::ToggleLastTwo => self.toggle_last_two(),
            HotKeyAction::OutputSlot(slot) => self.switch_to_slot(slot as usize),
        }
    }

    /// Pull `current` back in line with the OS after an external change
    pub fn sync_with_system(&mut self) {
        for direction in [Direction::Output, Direction::Input] {
            let observed = self.controller.default_device(direction);
            self.history.get_mut(direction).observe(observed);
        }
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            outputs: self.list_output_devices(),
            inputs: self.list_input_devices(),
            default_output: self.get_default_output_device(),
            default_input: self.get_default_input_device(),
        }
    }
}
