// Application state module
// Read-only configuration plus connection accounting, shared across tasks

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Reserve a connection slot, refusing when `max_connections` is reached
    pub fn try_acquire_connection(&self) -> bool {
        // Increment first, then check, so concurrent accepts cannot overshoot
        let prev = self.active_connections.fetch_add(1, Ordering::SeqCst);
        if let Some(max) = self.config.performance.max_connections {
            if prev >= usize::try_from(max).unwrap_or(usize::MAX) {
                self.active_connections.fetch_sub(1, Ordering::SeqCst);
                return false;
            }
        }
        true
    }

    pub fn release_connection(&self) {
        self.active_connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
