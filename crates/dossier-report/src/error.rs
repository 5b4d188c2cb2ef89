//! Error types for report rendering and persistence.

use thiserror::Error;

/// Errors that can occur while writing one report format.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No PDF renderer is installed
    #[error("No wkhtmltopdf or weasyprint available; cannot generate PDF")]
    Unavailable,

    /// An installed renderer failed
    #[error("{renderer} conversion failed: {reason}")]
    Failed {
        /// Renderer that was tried
        renderer: String,
        /// What went wrong
        reason: String,
    },

    /// A report base name that is not a plain file name
    #[error("invalid report name {0:?}: expected a file name without directories")]
    InvalidName(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, RenderError>;
