//! # Coloring Studio
//!
//! The selection view's state ([`StudioState`]) and a session type pairing
//! it with a [`DrawingSurface`](crate::surface::DrawingSurface).
//!
//! The HTTP server drives sessions piecewise from spawned tasks. For one-shot
//! use (CLI, tests) [`open_theme`] runs the whole selection in order:
//! select, generate, settle, load the base image.

mod session;
mod state;

pub use session::StudioSession;
pub use state::{Phase, SelectionTicket, StudioSnapshot, StudioState};

use crate::assets::ImageLoader;
use crate::catalog::Theme;
use crate::generate::{self, GenerationOutcome, ImageGenerator};
use crate::surface::PendingLoad;

/// Select `theme`, run the illustration flow and paint the result.
///
/// Returns the outcome. If the base image cannot be loaded the surface keeps
/// its background.
pub async fn open_theme(
    session: &mut StudioSession,
    generator: &dyn ImageGenerator,
    loader: &ImageLoader,
    theme: Theme,
) -> GenerationOutcome {
    let ticket = session.begin_theme(theme.clone());
    let outcome = generate::illustrate(generator, &theme).await;
    if let Some(pending) = session.settle(ticket, outcome.clone()) {
        load_into(session, loader, pending).await;
    }
    outcome
}

/// Resolve a pending base-image load. Failures leave the surface as is.
pub async fn load_into(session: &mut StudioSession, loader: &ImageLoader, pending: PendingLoad) -> bool {
    match loader.load(pending.image()).await {
        Ok(image) => session.complete_load(pending.token(), image),
        Err(_) => false,
    }
}
