//! Carbon Event Manager bindings used for global hotkeys

#![allow(non_snake_case, non_upper_case_globals)]

use std::ffi::c_void;

use audioswitch_audio_core::four_char_code;

pub type OSStatus = i32;
pub type OSType = u32;

// Opaque Carbon references
pub type EventTargetRef = *mut c_void;
pub type EventHandlerRef = *mut c_void;
pub type EventHandlerCallRef = *mut c_void;
pub type EventRef = *mut c_void;
pub type EventHotKeyRef = *mut c_void;

pub type EventHandlerProcPtr = extern "C" fn(
    in_handler_call_ref: EventHandlerCallRef,
    in_event: EventRef,
    in_user_data: *mut c_void,
) -> OSStatus;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTypeSpec {
    pub eventClass: OSType,
    pub eventKind: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct EventHotKeyID {
    pub signature: OSType,
    pub id: u32,
}

pub const noErr: OSStatus = 0;
pub const eventNotHandledErr: OSStatus = -9874;

pub const kEventClassKeyboard: OSType = four_char_code(b"keyb");
pub const kEventHotKeyPressed: u32 = 5;
pub const kEventParamDirectObject: OSType = four_char_code(b"----");
pub const typeEventHotKeyID: OSType = four_char_code(b"hkid");

#[link(name = "Carbon", kind = "framework")]
extern "C" {
    pub fn GetEventDispatcherTarget() -> EventTargetRef;

    pub fn InstallEventHandler(
        inTarget: EventTargetRef,
        inHandler: EventHandlerProcPtr,
        inNumTypes: u32,
        inList: *const EventTypeSpec,
        inUserData: *mut c_void,
        outRef: *mut EventHandlerRef,
    ) -> OSStatus;

    pub fn RemoveEventHandler(inHandlerRef: EventHandlerRef) -> OSStatus;

    pub fn RegisterEventHotKey(
        inHotKeyCode: u32,
        inHotKeyModifiers: u32,
        inHotKeyID: EventHotKeyID,
        inTarget: EventTargetRef,
        inOptions: u32,
        outRef: *mut EventHotKeyRef,
    ) -> OSStatus;

    pub fn UnregisterEventHotKey(inHotKey: EventHotKeyRef) -> OSStatus;

    pub fn GetEventParameter(
        inEvent: EventRef,
        inName: OSType,
        inDesiredType: OSType,
        outActualType: *mut OSType,
        inBufferSize: usize,
        outActualSize: *mut usize,
        outData: *mut c_void,
    ) -> OSStatus;

    pub fn RunApplicationEventLoop();

    pub fn QuitApplicationEventLoop();
}
