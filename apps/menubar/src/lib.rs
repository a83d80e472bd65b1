//! AudioSwitch menu-bar application
//!
//! Wires the platform backend into the switching core and runs it.
//!
//! # Threads
//!
//! - **main**: platform event loop; owns the hotkey registrar
//! - **ui**: single-threaded runtime draining the UI queue; owns the
//!   [`SwitchCoordinator`](audioswitch_audio_core::SwitchCoordinator)
//! - CoreAudio notification threads and the hotkey handler only post to the
//!   UI queue
//!
//! SIGINT or SIGTERM stops the event loop, after which the UI thread is shut
//! down and hotkeys are unregistered.
//!
//! # Platform Support
//!
//! - **macOS**: full support
//! - other targets: `run` reports the platform as unsupported

mod config;
mod menu;

#[cfg(target_os = "macos")]
mod app;
#[cfg(any(target_os = "macos", test))]
mod shutdown;

pub use config::{AppConfig, CONFIG_ENV};
pub use menu::{MenuItem, MenuModel};

/// Application entry point
///
/// Loads configuration, installs logging via `tracing_subscriber`
/// (enhanced in debug builds), then hands over to the platform runner.
pub fn run() -> anyhow::Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config);
    if let Some(e) = config_error {
        tracing::warn!("Using default configuration: {:#}", e);
    }
    tracing::debug!(?config, "Configuration loaded");

    #[cfg(target_os = "macos")]
    {
        app::run(config)
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(audioswitch_audio_core::AudioError::PlatformNotSupported(
            std::env::consts::OS.to_string(),
        )
        .into())
    }
}

fn init_logging(config: &AppConfig) {
    // Enhanced logging for debug builds
    #[cfg(debug_assertions)]
    {
        tracing_subscriber::fmt()
            .with_max_level(std::cmp::max(config.max_level(), tracing::Level::DEBUG))
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .init();
        tracing::info!("Debug mode logging enabled");
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::fmt()
            .with_max_level(config.max_level())
            .compact()
            .init();
    }
}
