//! # Base Image Assets
//!
//! A base image is either inline image bytes (what the generation service
//! returns) or an external image URL (theme previews and carousel pages).
//! [`ImageLoader`] turns either kind into a decoded image.

mod loader;

pub use loader::ImageLoader;

use std::fmt;

/// Reference to the image underlying the drawing raster.
#[derive(Clone, PartialEq, Eq)]
pub enum BaseImage {
    /// Inline image bytes with their MIME type.
    Inline { mime_type: String, data: Vec<u8> },
    /// Externally hosted image.
    Url(String),
}

impl BaseImage {
    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        BaseImage::Inline {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        BaseImage::Url(url.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BaseImage::Inline { .. } => "inline",
            BaseImage::Url(_) => "url",
        }
    }

    /// The URL, for externally hosted images.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            BaseImage::Url(url) => Some(url),
            BaseImage::Inline { .. } => None,
        }
    }
}

// Inline payloads can be megabytes; keep debug output short.
impl fmt::Debug for BaseImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseImage::Inline { mime_type, data } => f
                .debug_struct("Inline")
                .field("mime_type", mime_type)
                .field("bytes", &data.len())
                .finish(),
            BaseImage::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}
