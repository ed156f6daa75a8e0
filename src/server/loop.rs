// Server loop module
// Accepts connections until a shutdown is requested, then drains

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Interval between checks while waiting for open connections to finish
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` is notified.
///
/// After shutdown the listener is closed and open connections get up to
/// `performance.request_timeout` seconds to complete.
pub async fn run_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                logger::log_info("[Shutdown] Stopping accept loop");
                break;
            }
        }
    }

    drop(listener);
    drain_connections(&state).await;
    logger::log_server_stop(state.connection_count());
}

async fn drain_connections(state: &AppState) {
    let deadline = tokio::time::Instant::now()
        + Duration::from_secs(state.config.performance.request_timeout);

    while state.connection_count() > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
