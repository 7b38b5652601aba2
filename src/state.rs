use std::sync::Arc;
use std::time::Instant;

use crate::auth::{AuthState, RoutePolicy, TokenCodec};
use crate::config::ServerConfig;
use crate::storage::AccountStore;

/// Main server state shared across all handlers
pub struct ServerState {
    pub config: ServerConfig,
    pub accounts: Arc<dyn AccountStore>,
    pub auth: Arc<AuthState>,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig, accounts: Arc<dyn AccountStore>) -> Self {
        let codec = TokenCodec::new(
            &config.session_secret,
            config.session_ttl_seconds as i64,
        );
        let auth = Arc::new(AuthState::new(codec, RoutePolicy::clinic_default()));

        Self {
            config,
            accounts,
            auth,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
