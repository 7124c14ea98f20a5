//! # Error Types
//!
//! This module defines error types used throughout the tiabela library.

use thiserror::Error;

/// Main error type for studio operations
#[derive(Debug, Error)]
pub enum StudioError {
    /// The image generation call failed (transport, HTTP status, bad payload)
    #[error("Generation error: {0}")]
    Generation(String),

    /// The generation response contained no inline image part
    #[error("Generation returned no image")]
    NoImage,

    /// Image fetch or decode error
    #[error("Image error: {0}")]
    Image(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server transport errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid caller input (unknown theme, bad color, zero width)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
