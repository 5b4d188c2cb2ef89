//! Error types for probe execution.
//!
//! None of these cross the orchestrator: a probe that returns one of them
//! gets `{error: <message>}` recorded in its report slot.

use crate::command::CommandError;
use thiserror::Error;

/// Errors that can occur while constructing or running a probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External command failures
    #[error("{0}")]
    Command(#[from] CommandError),

    /// DNS resolution failures
    #[error("DNS error: {0}")]
    Dns(String),

    /// WHOIS query failures
    #[error("WHOIS error: {0}")]
    Whois(String),

    /// I/O errors (output directory, capture files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
