// Application state module
// Shared by every connection: configuration plus the injected record store

use std::time::Instant;

use super::types::Config;
use crate::store::MovieStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: MovieStore,
    pub started_at: Instant,
}

impl AppState {
    /// Wrap a store that was constructed (and seeded) by the caller
    pub fn new(config: &Config, store: MovieStore) -> Self {
        Self {
            config: config.clone(),
            store,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
