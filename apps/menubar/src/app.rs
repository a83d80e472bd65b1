use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context};

use audioswitch_audio_core::{
    ui_channel, AudioHardware, DeviceChangeNotifier, HotKeyRegistrar, SwitchCoordinator,
    UiDispatcher, UiEvent, UiReceiver,
};
use audioswitch_audio_macos::{quit_event_loop, run_event_loop, system_hardware, CarbonHotKeys};

use crate::config::AppConfig;
use crate::menu::MenuModel;
use crate::shutdown;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let hardware = system_hardware();
    let (sender, receiver) = ui_channel();

    let ui_thread = spawn_ui_thread(hardware.clone(), &config, receiver)?;

    DeviceChangeNotifier::new(hardware).start_monitoring(sender.clone());

    // Carbon hotkeys belong to the main thread's event loop
    let mut registrar = HotKeyRegistrar::new(CarbonHotKeys::new());
    if config.hotkeys_enabled {
        registrar.register_default_hot_keys(sender.clone());
    } else {
        tracing::info!("Global shortcuts disabled by configuration");
    }

    run_event_loop();

    sender.post(UiEvent::Shutdown);
    ui_thread
        .join()
        .map_err(|_| anyhow!("UI thread panicked"))?;
    registrar.unregister_all();

    tracing::info!("AudioSwitch stopped");
    Ok(())
}

/// Start the UI-owned thread. The coordinator is built there so that switch
/// history never leaves it.
fn spawn_ui_thread(
    hardware: Arc<dyn AudioHardware>,
    config: &AppConfig,
    receiver: UiReceiver,
) -> anyhow::Result<JoinHandle<()>> {
    let show_confirmation = config.show_switch_confirmation;

    thread::Builder::new()
        .name("ui".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Failed to create tokio runtime: {}", e);
                    return;
                }
            };

            let mut dispatcher = UiDispatcher::new(SwitchCoordinator::new(hardware))
                .with_confirmations(show_confirmation);

            dispatcher.subscribe(|coordinator| {
                let menu = MenuModel::build(coordinator);
                tracing::debug!("Menu rebuilt\n{}", menu.render());
            });
            dispatcher.on_switch(|confirmation| {
                tracing::info!("{}", confirmation.message());
            });

            rt.spawn(shutdown::quit_on(shutdown::shutdown_signal(), quit_event_loop));

            dispatcher.refresh();
            rt.block_on(dispatcher.run(receiver));
        })
        .context("Failed to spawn UI thread")
}
