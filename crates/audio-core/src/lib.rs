mod controller;
mod coordinator;
mod device;
mod directory;
mod dispatch;
mod error;
mod event;
mod history;
mod hotkey;
mod notifier;
mod traits;

#[cfg(test)]
mod testing;

pub use controller::DefaultDeviceController;
pub use coordinator::{DeviceSnapshot, SwitchConfirmation, SwitchCoordinator};
pub use device::{AudioDevice, DeviceId, Direction, HardwareProperty};
pub use directory::DeviceDirectory;
pub use dispatch::{ConfirmationSubscriber, RefreshSubscriber, UiDispatcher};
pub use error::{AudioError, OsStatus};
pub use event::{ui_channel, UiEvent, UiReceiver, UiSender};
pub use history::{DirectionHistory, SwitchHistory};
pub use hotkey::{
    default_bindings, four_char_code, key_code, HotKeyAction, HotKeyBinding, HotKeyRegistrar,
    Modifiers, RegistrarState, HOTKEY_SIGNATURE, OUTPUT_SLOT_COUNT,
};
pub use notifier::DeviceChangeNotifier;
pub use traits::{AudioHardware, ChangeCallback, HotKeyBackend, HotKeyHandle, HotKeyHandler};
