//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::GameRegistry;
use crate::util::rate_limit::{create_limiter, Limiter};
use crate::words::WordSource;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<GameRegistry>,
    pub words: Arc<dyn WordSource>,
    /// Shared by the create and join endpoints
    pub entry_limiter: Arc<Limiter>,
}

impl AppState {
    pub fn new(config: Config, words: Arc<dyn WordSource>) -> Self {
        let config = Arc::new(config);

        // Initialize session registry
        let registry = Arc::new(GameRegistry::new(config.game_rules()));

        let entry_limiter = create_limiter(config.request_rate_limit);

        Self {
            config,
            registry,
            words,
            entry_limiter,
        }
    }
}
