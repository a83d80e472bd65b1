use serde::{Deserialize, Serialize};

/// Opaque hardware identifier, stable only while the device stays attached
pub type DeviceId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Output,
    Input,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Input => "input",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audio endpoint as reported by a single directory query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioDevice {
    pub id: DeviceId,
    pub name: String,
    pub has_output: bool,
    pub has_input: bool,
}

impl AudioDevice {
    pub fn new(id: DeviceId, name: String, has_output: bool, has_input: bool) -> Self {
        Self {
            id,
            name,
            has_output,
            has_input,
        }
    }

    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Output => self.has_output,
            Direction::Input => self.has_input,
        }
    }
}

/// System-object properties whose changes trigger a UI refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareProperty {
    DeviceList,
    DefaultOutput,
    DefaultInput,
}

impl HardwareProperty {
    pub const ALL: [HardwareProperty; 3] = [
        HardwareProperty::DefaultOutput,
        HardwareProperty::DefaultInput,
        HardwareProperty::DeviceList,
    ];

    pub fn default_for(direction: Direction) -> Self {
        match direction {
            Direction::Output => Self::DefaultOutput,
            Direction::Input => Self::DefaultInput,
        }
    }
}
