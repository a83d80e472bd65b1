//! Global hotkey table and registrar
//!
//! The registrar installs one press handler, then registers the fixed
//! binding table. A press only resolves the numeric id to a
//! [`HotKeyAction`] and posts it to the UI queue.

use std::ops::BitOr;
use std::sync::Arc;

use crate::error::AudioError;
use crate::event::{UiEvent, UiSender};
use crate::traits::{HotKeyBackend, HotKeyHandle, HotKeyHandler};

/// Number of positional output-device shortcuts
pub const OUTPUT_SLOT_COUNT: u8 = 5;

/// Four-character code identifying hotkeys owned by this process
pub const HOTKEY_SIGNATURE: u32 = four_char_code(b"swat");

pub const fn four_char_code(code: &[u8; 4]) -> u32 {
    ((code[0] as u32) << 24) | ((code[1] as u32) << 16) | ((code[2] as u32) << 8) | code[3] as u32
}

/// Virtual key codes for the ANSI keyboard layout
pub mod key_code {
    pub const ANSI_A: u32 = 0x00;
    pub const ANSI_1: u32 = 0x12;
    pub const ANSI_2: u32 = 0x13;
    pub const ANSI_3: u32 = 0x14;
    pub const ANSI_4: u32 = 0x15;
    pub const ANSI_5: u32 = 0x17;

    pub(crate) fn label(code: u32) -> Option<&'static str> {
        match code {
            ANSI_A => Some("A"),
            ANSI_1 => Some("1"),
            ANSI_2 => Some("2"),
            ANSI_3 => Some("3"),
            ANSI_4 => Some("4"),
            ANSI_5 => Some("5"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotKeyAction {
    ToggleLastTwo,
    /// Zero-based position in the live output-device listing
    OutputSlot(u8),
}

impl HotKeyAction {
    pub fn id(&self) -> u32 {
        match self {
            Self::ToggleLastTwo => 1,
            Self::OutputSlot(slot) => 2 + *slot as u32,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::ToggleLastTwo),
            2..=6 => Some(Self::OutputSlot((id - 2) as u8)),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::ToggleLastTwo => "Toggle between last two devices".to_string(),
            Self::OutputSlot(slot) => format!("Switch to device {}", *slot as u32 + 1),
        }
    }
}

/// Carbon-style modifier mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const COMMAND: Modifiers = Modifiers(1 << 8);
    pub const SHIFT: Modifiers = Modifiers(1 << 9);
    pub const OPTION: Modifiers = Modifiers(1 << 11);
    pub const CONTROL: Modifiers = Modifiers(1 << 12);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Glyphs in the conventional macOS menu order
    pub fn symbols(&self) -> String {
        [
            (Self::CONTROL, "⌃"),
            (Self::OPTION, "⌥"),
            (Self::SHIFT, "⇧"),
            (Self::COMMAND, "⌘"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, glyph)| *glyph)
        .collect()
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotKeyBinding {
    pub action: HotKeyAction,
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl HotKeyBinding {
    pub fn new(action: HotKeyAction, key_code: u32, modifiers: Modifiers) -> Self {
        Self {
            action,
            key_code,
            modifiers,
        }
    }

    pub fn shortcut(&self) -> String {
        let key = key_code::label(self.key_code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.key_code));
        format!("{}{}", self.modifiers.symbols(), key)
    }
}

/// ⌘⇧A toggles the last two outputs, ⌘⌥1 through ⌘⌥5 pick an output slot
pub fn default_bindings() -> Vec<HotKeyBinding> {
    let slot_keys = [
        key_code::ANSI_1,
        key_code::ANSI_2,
        key_code::ANSI_3,
        key_code::ANSI_4,
        key_code::ANSI_5,
    ];

    let mut bindings = vec![HotKeyBinding::new(
        HotKeyAction::ToggleLastTwo,
        key_code::ANSI_A,
        Modifiers::COMMAND | Modifiers::SHIFT,
    )];
    bindings.extend(slot_keys.iter().enumerate().map(|(slot, key)| {
        HotKeyBinding::new(
            HotKeyAction::OutputSlot(slot as u8),
            *key,
            Modifiers::COMMAND | Modifiers::OPTION,
        )
    }));
    bindings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrarState {
    Unregistered,
    Registered,
    /// Torn down; registration is one-shot per process run
    Released,
}

pub struct HotKeyRegistrar<B: HotKeyBackend> {
    backend: B,
    state: RegistrarState,
    handler_installed: bool,
    registered: Vec<(HotKeyAction, HotKeyHandle)>,
}

impl<B: HotKeyBackend> HotKeyRegistrar<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RegistrarState::Unregistered,
            handler_installed: false,
            registered: Vec::new(),
        }
    }

    pub fn state(&self) -> RegistrarState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registered_actions(&self) -> Vec<HotKeyAction> {
        self.registered.iter().map(|(action, _)| *action).collect()
    }

    /// Register the fixed shortcut table, returning how many succeeded
    pub fn register_default_hot_keys(&mut self, sender: UiSender) -> usize {
        let count = self.register_bindings(&default_bindings(), sender);

        if count > 0 {
            tracing::info!(registered = count, "Registered global keyboard shortcuts");
            for binding in default_bindings() {
                tracing::info!("   {} - {}", binding.shortcut(), binding.action.label());
            }
        }

        count
    }

    /// Install the press handler once, then register each binding
    /// independently. A failed binding never fires; the rest proceed.
    pub fn register_bindings(&mut self, bindings: &[HotKeyBinding], sender: UiSender) -> usize {
        if self.state != RegistrarState::Unregistered {
            tracing::warn!(state = ?self.state, "Hotkeys already registered, ignoring");
            return 0;
        }

        let handler: HotKeyHandler = Arc::new(move |id| {
            if let Some(action) = HotKeyAction::from_id(id) {
                sender.post(UiEvent::HotKey(action));
            }
        });

        if let Err(e) = self.backend.install_handler(handler) {
            tracing::error!("Failed to install hotkey event handler: {}", e);
            return 0;
        }
        self.handler_installed = true;

        for binding in bindings {
            match self.backend.register(binding.action.id(), binding) {
                Ok(handle) => self.registered.push((binding.action, handle)),
                Err(e) => {
                    tracing::warn!(shortcut = %binding.shortcut(), "Failed to register hotkey: {}", e);
                }
            }
        }

        self.state = RegistrarState::Registered;
        self.registered.len()
    }

    /// Reverse every successful registration and remove the handler.
    /// Calling this again is a no-op.
    pub fn unregister_all(&mut self) {
        for (action, handle) in self.registered.drain(..) {
            if let Err(e) = self.backend.unregister(handle) {
                tracing::warn!(?action, "Failed to unregister hotkey: {}", e);
            }
        }

        if self.handler_installed {
            if let Err(e) = self.backend.remove_handler() {
                tracing::warn!("Failed to remove hotkey event handler: {}", e);
            }
            self.handler_installed = false;
        }

        if self.state == RegistrarState::Registered {
            tracing::debug!("Global keyboard shortcuts released");
            self.state = RegistrarState::Released;
        }
    }
}

impl<B: HotKeyBackend> Drop for HotKeyRegistrar<B> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ui_channel;
    use crate::testing::FakeHotKeys;

    #[test]
    fn test_action_ids_round_trip_for_table() {
        for binding in default_bindings() {
            assert_eq!(HotKeyAction::from_id(binding.action.id()), Some(binding.action));
        }
        assert_eq!(HotKeyAction::from_id(0), None);
        assert_eq!(HotKeyAction::from_id(7), None);
    }

    #[test]
    fn test_default_table_shape() {
        let bindings = default_bindings();
        assert_eq!(bindings.len(), 1 + OUTPUT_SLOT_COUNT as usize);
        assert_eq!(bindings[0].shortcut(), "⇧⌘A");
        assert_eq!(bindings[1].action, HotKeyAction::OutputSlot(0));
        assert_eq!(bindings[1].shortcut(), "⌥⌘1");
        assert_eq!(bindings[5].key_code, key_code::ANSI_5);
    }

    #[test]
    fn test_signature_is_swat() {
        assert_eq!(HOTKEY_SIGNATURE, 0x7377_6174);
    }

    #[test]
    fn test_register_installs_handler_before_bindings() {
        let (tx, _rx) = ui_channel();
        let mut registrar = HotKeyRegistrar::new(FakeHotKeys::default());

        let count = registrar.register_default_hot_keys(tx);

        assert_eq!(count, 6);
        assert_eq!(registrar.state(), RegistrarState::Registered);
        assert_eq!(registrar.backend().install_count, 1);
        assert_eq!(registrar.backend().handler_installed_before_first_register, Some(true));
    }

    #[test]
    fn test_partial_registration_is_valid() {
        let (tx, _rx) = ui_channel();
        let backend = FakeHotKeys {
            failing_ids: vec![HotKeyAction::OutputSlot(2).id()],
            ..Default::default()
        };
        let mut registrar = HotKeyRegistrar::new(backend);

        let count = registrar.register_default_hot_keys(tx);

        assert_eq!(count, 5);
        assert!(!registrar
            .registered_actions()
            .contains(&HotKeyAction::OutputSlot(2)));
        assert_eq!(registrar.state(), RegistrarState::Registered);
    }

    #[test]
    fn test_handler_install_failure_registers_nothing() {
        let (tx, _rx) = ui_channel();
        let backend = FakeHotKeys {
            fail_install: true,
            ..Default::default()
        };
        let mut registrar = HotKeyRegistrar::new(backend);

        assert_eq!(registrar.register_default_hot_keys(tx), 0);
        assert_eq!(registrar.state(), RegistrarState::Unregistered);
        assert!(registrar.backend().registered.is_empty());
    }

    #[test]
    fn test_press_posts_action_to_ui_queue() {
        let (tx, mut rx) = ui_channel();
        let mut registrar = HotKeyRegistrar::new(FakeHotKeys::default());
        registrar.register_default_hot_keys(tx);

        registrar.backend().press(HotKeyAction::OutputSlot(3).id());
        registrar.backend().press(HotKeyAction::ToggleLastTwo.id());
        registrar.backend().press(42);

        assert_eq!(rx.try_recv(), Some(UiEvent::HotKey(HotKeyAction::OutputSlot(3))));
        assert_eq!(rx.try_recv(), Some(UiEvent::HotKey(HotKeyAction::ToggleLastTwo)));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_unregister_all_is_idempotent() {
        let (tx, _rx) = ui_channel();
        let mut registrar = HotKeyRegistrar::new(FakeHotKeys::default());
        registrar.register_default_hot_keys(tx);

        registrar.unregister_all();
        registrar.unregister_all();

        let backend = registrar.backend();
        assert_eq!(backend.unregister_calls, 6);
        assert_eq!(backend.remove_handler_calls, 1);
        assert!(backend.registered.is_empty());
        assert_eq!(registrar.state(), RegistrarState::Released);
    }

    #[test]
    fn test_unregister_on_empty_set_is_noop() {
        let mut registrar = HotKeyRegistrar::new(FakeHotKeys::default());
        registrar.unregister_all();

        assert_eq!(registrar.backend().unregister_calls, 0);
        assert_eq!(registrar.backend().remove_handler_calls, 0);
        assert_eq!(registrar.state(), RegistrarState::Unregistered);
    }

    #[test]
    fn test_no_reregistration_after_release() {
        let (tx, _rx) = ui_channel();
        let mut registrar = HotKeyRegistrar::new(FakeHotKeys::default());
        registrar.register_default_hot_keys(tx.clone());
        registrar.unregister_all();

        assert_eq!(registrar.register_default_hot_keys(tx), 0);
        assert_eq!(registrar.state(), RegistrarState::Released);
        assert_eq!(registrar.backend().install_count, 1);
    }

    #[test]
    fn test_modifier_symbols() {
        let mods = Modifiers::COMMAND | Modifiers::OPTION;
        assert!(mods.contains(Modifiers::COMMAND));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods.bits(), 0x900);
        assert_eq!(mods.symbols(), "⌥⌘");
    }
}
