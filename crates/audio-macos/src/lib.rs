//! macOS backend for audioswitch
//!
//! CoreAudio supplies the device roster, default-device reads/writes and
//! change listeners; Carbon supplies global hotkeys and the event loop that
//! delivers them. On other targets this crate is empty.

#![cfg(target_os = "macos")]

mod event_loop;
mod ffi;
mod hardware;
mod hotkey;

pub use event_loop::{quit_event_loop, run_event_loop};
pub use hardware::{system_hardware, CoreAudioHardware};
pub use hotkey::CarbonHotKeys;
