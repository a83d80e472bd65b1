use std::sync::Arc;

use crate::device::{DeviceId, Direction, HardwareProperty};
use crate::error::AudioError;
use crate::hotkey::HotKeyBinding;

/// Invoked by the OS when a watched property changes. Runs on a context
/// the application does not own.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Invoked by the OS with the numeric id of the pressed hotkey. Runs on a
/// context the application does not own.
pub type HotKeyHandler = Arc<dyn Fn(u32) + Send + Sync>;

/// Hardware abstraction layer queried and mutated by the core
#[cfg_attr(test, mockall::automock)]
pub trait AudioHardware: Send + Sync {
    /// Full device roster, in whatever order the OS reports it
    fn device_ids(&self) -> Result<Vec<DeviceId>, AudioError>;

    /// Human-readable name of a device
    fn device_name(&self, id: DeviceId) -> Result<String, AudioError>;

    /// Total channel count across all streams of a device in one direction
    fn channel_count(&self, id: DeviceId, direction: Direction) -> Result<u32, AudioError>;

    /// Current system default, `None` when there is no device at all
    fn default_device(&self, direction: Direction) -> Result<Option<DeviceId>, AudioError>;

    /// Write the system default for one direction
    fn set_default_device(&self, direction: Direction, id: DeviceId) -> Result<(), AudioError>;

    /// Subscribe to changes of a system-object property for the process lifetime
    fn add_property_listener(
        &self,
        property: HardwareProperty,
        callback: ChangeCallback,
    ) -> Result<(), AudioError>;
}

/// Opaque token for one registered hotkey, minted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotKeyHandle(pub u64);

/// OS global hotkey facility
pub trait HotKeyBackend {
    /// Install the single process-wide press handler
    fn install_handler(&mut self, handler: HotKeyHandler) -> Result<(), AudioError>;

    /// Register one key combination under a numeric id
    fn register(&mut self, id: u32, binding: &HotKeyBinding) -> Result<HotKeyHandle, AudioError>;

    fn unregister(&mut self, handle: HotKeyHandle) -> Result<(), AudioError>;

    fn remove_handler(&mut self) -> Result<(), AudioError>;
}
