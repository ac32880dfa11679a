use std::sync::Arc;

use crate::backend::AuthBackend;
use crate::config::{AppConfig, SecurityConfig};
use crate::guard::Guard;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<Guard>,
    pub security: Arc<SecurityConfig>,
    pub backend: Arc<dyn AuthBackend>,
}

impl AppState {
    pub fn new(guard: Guard, security: SecurityConfig, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            guard: Arc::new(guard),
            security: Arc::new(security),
            backend,
        }
    }

    pub fn from_config(config: &AppConfig, backend: Arc<dyn AuthBackend>) -> Self {
        Self::new(Guard::from_config(&config.guard), config.security.clone(), backend)
    }
}
