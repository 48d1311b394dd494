pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use config::Config;
use gamecenter_identity::IdentityVerifier;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub verifier: IdentityVerifier,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, verifier: IdentityVerifier) -> Self {
        Self {
            verifier,
            config: Arc::new(config),
        }
    }
}
