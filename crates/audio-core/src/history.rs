use crate::device::{DeviceId, Direction};

/// Current and previous device for one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionHistory {
    pub current: Option<DeviceId>,
    pub previous: Option<DeviceId>,
}

impl DirectionHistory {
    pub fn new(current: Option<DeviceId>) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    /// Move to `id`. `previous` only changes when the current device
    /// actually changes; returns whether it did.
    pub fn record(&mut self, id: DeviceId) -> bool {
        if self.current == Some(id) {
            return false;
        }
        self.previous = self.current;
        self.current = Some(id);
        true
    }

    /// Follow an externally observed default. `previous` is left alone
    /// unless the OS moved back to it, in which case the two swap.
    pub fn observe(&mut self, id: Option<DeviceId>) {
        if id == self.current {
            return;
        }
        if id.is_some() && id == self.previous {
            self.previous = self.current;
        }
        self.current = id;
    }
}

/// Per-process memory of the last two distinct devices per direction.
/// Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchHistory {
    output: DirectionHistory,
    input: DirectionHistory,
}

impl SwitchHistory {
    pub fn new(current_output: Option<DeviceId>, current_input: Option<DeviceId>) -> Self {
        Self {
            output: DirectionHistory::new(current_output),
            input: DirectionHistory::new(current_input),
        }
    }

    pub fn get(&self, direction: Direction) -> &DirectionHistory {
        match direction {
            Direction::Output => &self.output,
            Direction::Input => &self.input,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut DirectionHistory {
        match direction {
            Direction::Output => &mut self.output,
            Direction::Input => &mut self.input,
        }
    }

    pub fn current(&self, direction: Direction) -> Option<DeviceId> {
        self.get(direction).current
    }

    pub fn previous(&self, direction: Direction) -> Option<DeviceId> {
        self.get(direction).previous
    }
}
