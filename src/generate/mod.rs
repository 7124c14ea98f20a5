//! # Illustration Request Flow
//!
//! Turns a [`Theme`] into a base image: one request to an image generation
//! service, first inline image part wins, and any failure falls back to the
//! theme's static preview.
//!
//! The service sits behind the [`ImageGenerator`] trait. [`gemini`] talks to
//! the real API; tests script their own implementations.
//!
//! ```
//! use tiabela::generate::{self, GenerationOutcome, Unconfigured};
//! use tiabela::catalog;
//!
//! # async fn example() {
//! let theme = catalog::featured_theme();
//! let outcome = generate::illustrate(&Unconfigured, theme).await;
//! assert!(matches!(outcome, GenerationOutcome::Fallback { .. }));
//! # }
//! ```

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiGenerator};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::assets::BaseImage;
use crate::catalog::Theme;
use crate::error::StudioError;

/// Appended to every theme prompt.
pub const STYLE_DIRECTIVE: &str = " Professional coloring page, pure white background, black thick outlines only, no color, high resolution.";

/// Coloring pages are always square.
pub const ASPECT_RATIO: &str = "1:1";

/// One outbound generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: String,
}

impl GenerationRequest {
    /// Theme prompt plus the fixed style directive.
    pub fn for_theme(theme: &Theme) -> Self {
        Self {
            prompt: format!("{}{}", theme.prompt, STYLE_DIRECTIVE),
            aspect_ratio: ASPECT_RATIO.to_string(),
        }
    }
}

/// A content part of a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

/// Parts returned by the service, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationResponse {
    pub parts: Vec<ContentPart>,
}

impl GenerationResponse {
    /// The first part carrying inline image data. Later parts are ignored.
    pub fn first_image(&self) -> Option<BaseImage> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::InlineImage { mime_type, data } => {
                Some(BaseImage::inline(mime_type.clone(), data.clone()))
            }
            ContentPart::Text(_) => None,
        })
    }
}

/// An external image generation capability.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, StudioError>;
}

/// Generator used when no API key is configured. Every call fails, so every
/// selection ends on the theme preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl ImageGenerator for Unconfigured {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResponse, StudioError> {
        Err(StudioError::Config("No generation API key configured".to_string()))
    }
}

/// Result of one illustration flow. Exactly one image is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The service returned an image
    Generated(BaseImage),
    /// Generation failed; the theme preview stands in
    Fallback { image: BaseImage, reason: String },
}

impl GenerationOutcome {
    /// Fallback to the theme's preview image.
    pub fn fallback(theme: &Theme, reason: impl Into<String>) -> Self {
        GenerationOutcome::Fallback {
            image: BaseImage::url(theme.preview_url.clone()),
            reason: reason.into(),
        }
    }

    pub fn image(&self) -> &BaseImage {
        match self {
            GenerationOutcome::Generated(image) => image,
            GenerationOutcome::Fallback { image, .. } => image,
        }
    }

    pub fn into_image(self) -> BaseImage {
        match self {
            GenerationOutcome::Generated(image) => image,
            GenerationOutcome::Fallback { image, .. } => image,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationOutcome::Fallback { .. })
    }
}

/// Run the illustration flow for a theme.
///
/// Never fails: errors and image-less responses are logged and folded into
/// [`GenerationOutcome::Fallback`].
pub async fn illustrate(generator: &dyn ImageGenerator, theme: &Theme) -> GenerationOutcome {
    let request = GenerationRequest::for_theme(theme);
    debug!(theme = %theme.id, "requesting illustration");

    let result = generator
        .generate(&request)
        .await
        .and_then(|response| response.first_image().ok_or(StudioError::NoImage));

    match result {
        Ok(image) => GenerationOutcome::Generated(image),
        Err(e) => {
            warn!(theme = %theme.id, error = %e, "illustration failed, using preview image");
            GenerationOutcome::fallback(theme, e.to_string())
        }
    }
}
