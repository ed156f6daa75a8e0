use std::sync::Arc;
use std::time::Duration;

use maths_server::config::{AppState, Config};
use maths_server::error::ServerError;
use maths_server::{logger, server};
use tokio::sync::Notify;

fn main() -> Result<(), ServerError> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Size the Tokio runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    // Blocking computations still running after the drain get this long
    let grace = Duration::from_secs(cfg.performance.request_timeout);
    let result = runtime.block_on(async_main(cfg));
    runtime.shutdown_timeout(grace);
    result
}

async fn async_main(cfg: Config) -> Result<(), ServerError> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg));
    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server_loop(listener, state, shutdown))
        .await;
    Ok(())
}
