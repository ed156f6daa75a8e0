// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) request a graceful shutdown; other platforms
// only get Ctrl+C.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Spawn a task that notifies `shutdown` on the first termination signal
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(name) => {
                logger::log_info(&format!("[Signal] {name} received, initiating graceful shutdown"));
                // notify_one stores a permit if the loop is not parked yet
                shutdown.notify_one();
            }
            Err(e) => logger::log_error(&format!("Failed to register signal handlers: {e}")),
        }
    });
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
