//! Carbon global hotkeys
//!
//! Must be driven from the main thread, which also runs the application
//! event loop that delivers `kEventHotKeyPressed`.

use std::collections::HashMap;
use std::ffi::c_void;
use std::mem;
use std::ptr;

use audioswitch_audio_core::{
    AudioError, HotKeyBackend, HotKeyBinding, HotKeyHandle, HotKeyHandler, HOTKEY_SIGNATURE,
};

use crate::ffi::{
    eventNotHandledErr, kEventClassKeyboard, kEventHotKeyPressed, kEventParamDirectObject, noErr,
    typeEventHotKeyID, EventHandlerCallRef, EventHandlerRef, EventHotKeyID, EventHotKeyRef,
    EventRef, EventTypeSpec, GetEventDispatcherTarget, GetEventParameter, InstallEventHandler,
    OSStatus, RegisterEventHotKey, RemoveEventHandler, UnregisterEventHotKey,
};

pub struct CarbonHotKeys {
    handler_ref: EventHandlerRef,
    handler_data: *mut HotKeyHandler,
    hot_keys: HashMap<u64, EventHotKeyRef>,
    next_handle: u64,
}

impl CarbonHotKeys {
    pub fn new() -> Self {
        Self {
            handler_ref: ptr::null_mut(),
            handler_data: ptr::null_mut(),
            hot_keys: HashMap::new(),
            next_handle: 0,
        }
    }
}

impl Default for CarbonHotKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl HotKeyBackend for CarbonHotKeys {
    fn install_handler(&mut self, handler: HotKeyHandler) -> Result<(), AudioError> {
        if !self.handler_ref.is_null() {
            return Ok(());
        }

        let event_type = EventTypeSpec {
            eventClass: kEventClassKeyboard,
            eventKind: kEventHotKeyPressed,
        };
        let user_data = Box::into_raw(Box::new(handler));
        let mut handler_ref: EventHandlerRef = ptr::null_mut();

        let status = unsafe {
            InstallEventHandler(
                GetEventDispatcherTarget(),
                hot_key_event_handler,
                1,
                &event_type,
                user_data as *mut c_void,
                &mut handler_ref,
            )
        };

        if status != noErr {
            drop(unsafe { Box::from_raw(user_data) });
            return Err(AudioError::HotKeyHandler(status));
        }

        self.handler_ref = handler_ref;
        self.handler_data = user_data;
        Ok(())
    }

    fn register(&mut self, id: u32, binding: &HotKeyBinding) -> Result<HotKeyHandle, AudioError> {
        let hot_key_id = EventHotKeyID {
            signature: HOTKEY_SIGNATURE,
            id,
        };
        let mut hot_key_ref: EventHotKeyRef = ptr::null_mut();

        let status = unsafe {
            RegisterEventHotKey(
                binding.key_code,
                binding.modifiers.bits(),
                hot_key_id,
                GetEventDispatcherTarget(),
                0,
                &mut hot_key_ref,
            )
        };

        if status != noErr || hot_key_ref.is_null() {
            return Err(AudioError::HotKeyRegistration { id, status });
        }

        self.next_handle += 1;
        self.hot_keys.insert(self.next_handle, hot_key_ref);
        Ok(HotKeyHandle(self.next_handle))
    }

    fn unregister(&mut self, handle: HotKeyHandle) -> Result<(), AudioError> {
        let Some(hot_key_ref) = self.hot_keys.remove(&handle.0) else {
            return Ok(());
        };

        let status = unsafe { UnregisterEventHotKey(hot_key_ref) };
        if status != noErr {
            return Err(AudioError::status("UnregisterEventHotKey", status));
        }
        Ok(())
    }

    fn remove_handler(&mut self) -> Result<(), AudioError> {
        if self.handler_ref.is_null() {
            return Ok(());
        }

        let status = unsafe { RemoveEventHandler(self.handler_ref) };
        if status != noErr {
            return Err(AudioError::HotKeyHandler(status));
        }

        self.handler_ref = ptr::null_mut();
        drop(unsafe { Box::from_raw(self.handler_data) });
        self.handler_data = ptr::null_mut();
        Ok(())
    }
}

impl Drop for CarbonHotKeys {
    fn drop(&mut self) {
        let handles: Vec<u64> = self.hot_keys.keys().copied().collect();
        for handle in handles {
            if let Err(e) = self.unregister(HotKeyHandle(handle)) {
                tracing::warn!("Failed to unregister hotkey on drop: {}", e);
            }
        }
        if let Err(e) = self.remove_handler() {
            tracing::warn!("Failed to remove hotkey handler on drop: {}", e);
        }
    }
}

/// Runs inside the Carbon event loop. Decodes the hotkey id and hands it to
/// the installed handler, which only posts to the UI queue.
extern "C" fn hot_key_event_handler(
    _next_handler: EventHandlerCallRef,
    event: EventRef,
    user_data: *mut c_void,
) -> OSStatus {
    let mut hot_key_id = EventHotKeyID::default();

    let status = unsafe {
        GetEventParameter(
            event,
            kEventParamDirectObject,
            typeEventHotKeyID,
            ptr::null_mut(),
            mem::size_of::<EventHotKeyID>(),
            ptr::null_mut(),
            &mut hot_key_id as *mut EventHotKeyID as *mut c_void,
        )
    };

    if status != noErr || hot_key_id.signature != HOTKEY_SIGNATURE {
        return eventNotHandledErr;
    }

    match unsafe { (user_data as *const HotKeyHandler).as_ref() } {
        Some(handler) => {
            handler(hot_key_id.id);
            noErr
        }
        None => eventNotHandledErr,
    }
}
