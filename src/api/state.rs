//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::binder::SelectionBinder;
use crate::config::ServerConfig;
use crate::data::Dataset;
use crate::dispatch::{Dispatcher, Selection};

/// Shared application state for all handlers
///
/// Everything here is immutable after startup; viewers never need a lock.
#[derive(Clone)]
pub struct AppState {
    /// Pre-computed tables
    pub dataset: Arc<Dataset>,
    /// Resolves selections into chart descriptions
    pub binder: Arc<SelectionBinder>,
    /// Control -> chart wiring for interactive sessions
    pub dispatcher: Arc<Dispatcher>,
    /// Selection a new page or session starts from
    pub defaults: Selection,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with the standard dashboard wiring
    pub fn new(binder: SelectionBinder, defaults: Selection, config: ApiConfig) -> Self {
        Self::with_dispatcher(binder, Dispatcher::dashboard(), defaults, config)
    }

    /// Create state with a custom dispatcher
    pub fn with_dispatcher(
        binder: SelectionBinder,
        dispatcher: Dispatcher,
        defaults: Selection,
        config: ApiConfig,
    ) -> Self {
        let binder = Arc::new(binder);
        Self {
            dataset: binder.dataset_arc(),
            binder,
            dispatcher: Arc::new(dispatcher),
            defaults,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ServerConfig::default().into()
    }
}

impl From<ServerConfig> for ApiConfig {
    fn from(server: ServerConfig) -> Self {
        Self {
            host: server.host,
            port: server.port,
            cors_origins: server.cors_origins,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
