//! Dossier Core - Foundation crate for the Dossier probe engine.
//!
//! This crate provides the input context shared by every probe, the
//! application configuration, phone-number heuristics and the central
//! error type that the other Dossier crates build on.
//!
//! # Modules
//!
//! - [`context`] - Immutable identifier bundle passed to every probe
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`phone`] - Best-effort phone number normalization
//! - [`error`] - Central error types using thiserror
//!
//! # Example
//!
//! ```rust
//! use dossier_core::Context;
//!
//! let ctx = Context::builder()
//!     .email("user@example.org")
//!     .domain("example.org")
//!     .build();
//!
//! assert_eq!(ctx.domain(), Some("example.org"));
//! assert!(ctx.has_identifier());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod context;
pub mod error;
pub mod phone;

// Re-export commonly used types
pub use config::{AppConfig, ExternalConfig, GeneralConfig, NetworkConfig, ReportConfig};
pub use context::{Context, ContextBuilder, Identifier, ProbeConfig};
pub use error::{ConfigError, ConfigResult, DossierError, Result};
pub use phone::PhoneValidation;
