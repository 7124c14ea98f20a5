//! Server state and configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assets::ImageLoader;
use crate::generate::ImageGenerator;
use crate::studio::StudioSession;

/// Sessions idle for longer than this are dropped.
pub const SESSION_EXPIRATION_SECS: u64 = 60 * 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Surface size for sessions created without explicit dimensions
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            default_width: 800,
            default_height: 600,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    pub generator: Arc<dyn ImageGenerator>,
    pub loader: ImageLoader,
    pub sessions: RwLock<HashMap<Uuid, StudioSession>>,
}

impl AppState {
    pub fn new(config: ServerConfig, generator: Arc<dyn ImageGenerator>, loader: ImageLoader) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            config,
            boot_time,
            generator,
            loader,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}
