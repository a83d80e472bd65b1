use crate::ffi::{QuitApplicationEventLoop, RunApplicationEventLoop};

/// Block the calling (main) thread in the Carbon application event loop.
/// Hotkey presses are only delivered while this runs.
pub fn run_event_loop() {
    tracing::debug!("Entering application event loop");
    unsafe { RunApplicationEventLoop() };
    tracing::debug!("Application event loop returned");
}

/// Make a running [`run_event_loop`] return
pub fn quit_event_loop() {
    tracing::debug!("Requesting application event loop exit");
    unsafe { QuitApplicationEventLoop() };
}
