//! Textual model of the status-bar menu
//!
//! Rebuilt from scratch on every refresh, so rendering the same hardware
//! state twice yields identical output.

use audioswitch_audio_core::{
    AudioDevice, DeviceId, DeviceSnapshot, Direction, SwitchCoordinator,
};

const MENU_TITLE: &str = "Audio Devices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Title(String),
    Header(String),
    Device {
        direction: Direction,
        id: DeviceId,
        name: String,
        checked: bool,
    },
    Separator,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    pub items: Vec<MenuItem>,
}

impl MenuModel {
    pub fn build(coordinator: &SwitchCoordinator) -> Self {
        Self::from_snapshot(&coordinator.snapshot())
    }

    pub fn from_snapshot(snapshot: &DeviceSnapshot) -> Self {
        let mut items = vec![MenuItem::Title(MENU_TITLE.to_string()), MenuItem::Separator];

        items.push(MenuItem::Header("Output Devices:".to_string()));
        push_devices(&mut items, Direction::Output, &snapshot.outputs, snapshot.default_output);
        items.push(MenuItem::Separator);

        items.push(MenuItem::Header("Input Devices:".to_string()));
        push_devices(&mut items, Direction::Input, &snapshot.inputs, snapshot.default_input);
        items.push(MenuItem::Separator);

        items.push(MenuItem::Quit);
        Self { items }
    }

    /// Device entries for one direction, in menu order
    pub fn devices(&self, direction: Direction) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| matches!(item, MenuItem::Device { direction: d, .. } if *d == direction))
            .collect()
    }

    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(|item| match item {
                MenuItem::Title(title) => title.clone(),
                MenuItem::Header(header) => header.clone(),
                MenuItem::Device { name, checked, .. } => {
                    format!("  {} {}", if *checked { "✓" } else { " " }, name)
                }
                MenuItem::Separator => "---".to_string(),
                MenuItem::Quit => "Quit (⌘Q)".to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn push_devices(
    items: &mut Vec<MenuItem>,
    direction: Direction,
    devices: &[AudioDevice],
    default: Option<DeviceId>,
) {
    items.extend(devices.iter().map(|device| MenuItem::Device {
        direction,
        id: device.id,
        name: device.name.clone(),
        checked: Some(device.id) == default,
    }));
}
