//! Core error types for Dossier.
//!
//! Request validation and configuration failures are the only conditions
//! that stop a run before any probe executes. Everything that happens inside
//! a probe is recovered by the orchestrator and never surfaces here.

use thiserror::Error;

/// Central error type for Dossier operations outside of probe execution.
#[derive(Error, Debug)]
pub enum DossierError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid run request (missing consent, no identifiers)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Failures loading, checking or writing the TOML configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory to place the config file in
    #[error("no user config directory available on this system")]
    NoConfigDir,

    /// The file is not valid TOML for [`AppConfig`](crate::AppConfig)
    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML
    #[error("cannot encode config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the file failed
    #[error("config file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A value parsed but is out of range
    #[error("{field} {reason}")]
    InvalidValue {
        /// Dotted path of the offending key
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias using `DossierError`.
pub type Result<T> = std::result::Result<T, DossierError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
