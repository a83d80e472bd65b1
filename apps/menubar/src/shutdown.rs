//! Process shutdown on SIGINT / SIGTERM

use std::future::Future;

/// Resolves on Ctrl-C, or SIGTERM on unix targets
pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}

/// Wait for `signal`, then run `quit` once
pub async fn quit_on<S, Q>(signal: S, quit: Q)
where
    S: Future,
    Q: FnOnce(),
{
    signal.await;
    tracing::info!("Shutdown requested");
    quit();
}
