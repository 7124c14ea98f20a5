//! # Tiabela - Coloring Studio Library
//!
//! Tiabela powers the Tia Bela storefront: a gallery of coloring themes, an
//! AI line-art generator with a graceful fallback, and a freehand drawing
//! surface that stacks strokes over the generated page. It provides:
//!
//! - **Catalog**: themes, palette, carousel pages and the checkout offer
//! - **Generation**: the [`ImageGenerator`](generate::ImageGenerator) seam and a Gemini client
//! - **Surface**: raster drawing with brush, eraser and bucket tools
//! - **Studio**: selection state with stale-result protection
//! - **Server**: the HTTP API and embedded storefront page
//!
//! ## Quick Start
//!
//! ```no_run
//! use tiabela::{
//!     assets::ImageLoader,
//!     catalog,
//!     generate::Unconfigured,
//!     studio::{self, StudioSession},
//!     surface::{InputEvent, Tool},
//! };
//!
//! # async fn example() -> Result<(), tiabela::StudioError> {
//! let loader = ImageLoader::with_default_client()?;
//! let mut session = StudioSession::new(800, 600);
//!
//! // Without a configured generator the theme's preview image is used
//! let theme = catalog::featured_theme().clone();
//! let outcome = studio::open_theme(&mut session, &Unconfigured, &loader, theme).await;
//! assert!(outcome.is_fallback());
//!
//! // Paint a stroke
//! session.set_color("#3b82f6")?;
//! session.set_tool(Tool::Brush);
//! session.handle_input(&InputEvent::PointerDown { x: 10.0, y: 10.0 });
//! session.handle_input(&InputEvent::PointerMove { x: 200.0, y: 150.0 });
//! session.handle_input(&InputEvent::PointerUp);
//!
//! std::fs::write("page.png", session.print_page()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Themes, palette and store data |
//! | [`assets`] | Base image references and loading |
//! | [`generate`] | Coloring-page generation |
//! | [`surface`] | Drawing surface and input |
//! | [`studio`] | Selection state and sessions |
//! | [`server`] | HTTP server |
//! | [`error`] | Error types |

pub mod assets;
pub mod catalog;
pub mod error;
pub mod generate;
pub mod server;
pub mod studio;
pub mod surface;

// Re-exports for convenience
pub use catalog::Theme;
pub use error::StudioError;
pub use studio::StudioSession;
pub use surface::DrawingSurface;
