//! # HTTP Server for the Coloring Studio
//!
//! Serves the storefront page and a JSON API that drives one studio session
//! per visitor: theme selection (with background generation), carousel
//! picks, brush settings, pointer input, resize, clear, preview and print.
//!
//! ## Usage
//!
//! ```bash
//! GEMINI_API_KEY=... tiabela serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser.

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, SESSION_EXPIRATION_SECS, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::StudioError;

/// Build the router. Exposed so tests can drive it without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Catalog API
        .route("/api/themes", get(handlers::catalog::themes))
        .route("/api/palette", get(handlers::catalog::palette))
        .route("/api/carousel", get(handlers::catalog::carousel))
        .route("/api/products", get(handlers::catalog::products))
        // Checkout
        .route("/checkout/:product", get(handlers::checkout::redirect))
        // Session API
        .route("/api/sessions", post(handlers::session::create))
        .route(
            "/api/sessions/:id",
            get(handlers::session::show).delete(handlers::session::remove),
        )
        .route("/api/sessions/:id/theme", post(handlers::session::select_theme))
        .route(
            "/api/sessions/:id/carousel",
            post(handlers::session::select_carousel),
        )
        .route("/api/sessions/:id/gallery", post(handlers::session::back_to_gallery))
        .route("/api/sessions/:id/brush", post(handlers::session::brush))
        .route("/api/sessions/:id/input", post(handlers::session::input))
        .route("/api/sessions/:id/resize", post(handlers::session::resize))
        .route("/api/sessions/:id/clear", post(handlers::session::clear))
        .route("/api/sessions/:id/preview", get(handlers::session::preview))
        .route("/api/sessions/:id/print", get(handlers::session::print))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tiabela::assets::ImageLoader;
/// use tiabela::generate::Unconfigured;
/// use tiabela::server::{serve, AppState, ServerConfig};
///
/// # async fn example() -> Result<(), tiabela::error::StudioError> {
/// let state = AppState::new(
///     ServerConfig::default(),
///     Arc::new(Unconfigured),
///     ImageLoader::with_default_client()?,
/// );
/// serve(Arc::new(state)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(state: Arc<AppState>) -> Result<(), StudioError> {
    let listen_addr = state.config.listen_addr.clone();

    // Spawn background cache cleanup task
    tokio::spawn(cleanup_sessions(state.clone()));

    let app = router(state);

    info!("Tia Bela studio listening on http://{}/", listen_addr);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| StudioError::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| StudioError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop idle sessions and stale cached images.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);

    loop {
        interval.tick().await;

        {
            let mut sessions = state.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, s| s.last_accessed.elapsed() < expiration);
            let after = sessions.len();
            if before != after {
                info!(
                    "Cleaned up {} expired sessions ({} remaining)",
                    before - after,
                    after
                );
            }
        }

        let (evicted, remaining) = state.loader.evict_older_than(expiration).await;
        if evicted > 0 {
            info!(
                "Cleaned up {} cached images ({} remaining)",
                evicted, remaining
            );
        }
    }
}
