//! Configuration management for Dossier.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/dossier/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Network probe settings
    pub network: NetworkConfig,
    /// External command probe settings
    pub external: ExternalConfig,
    /// Report writer settings
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults if not found.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `DOSSIER_OUTPUT_DIR`: Override the report output directory
    /// - `DOSSIER_TIMEOUT_SECS`: Override the network request timeout
    /// - `DOSSIER_DELAY_MS`: Override the delay between network calls
    /// - `HIBP_API_KEY`: API key for the breach-check probe
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("DOSSIER_OUTPUT_DIR").filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Override general.output_dir from env: {}", dir);
            self.general.output_dir = PathBuf::from(dir);
        }

        if let Some(val) = lookup("DOSSIER_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.network.timeout_secs = secs;
                tracing::debug!("Override network.timeout_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("DOSSIER_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.network.delay_ms = ms;
                tracing::debug!("Override network.delay_ms from env: {}", ms);
            }
        }

        if let Some(key) = lookup("HIBP_API_KEY").filter(|v| !v.trim().is_empty()) {
            tracing::debug!("HIBP API key provided via environment");
            self.network.hibp_api_key = Some(key);
        }
    }

    /// Check value ranges that would otherwise make every probe fail.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.network.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.external.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "external.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.external.default_template.split_whitespace().next().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "external.default_template".to_string(),
                reason: "must name a program".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to the default path.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "has no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/dossier/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "dossier", "dossier").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory every report and external-tool artifact is written under
    pub output_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("osint_reports"),
        }
    }
}

/// Settings shared by the network-bound probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Delay after each network call in milliseconds
    pub delay_ms: u64,
    /// User agent string
    pub user_agent: String,
    /// Base URL of the HIBP v3 API
    pub hibp_base_url: String,
    /// HIBP API key (read from the environment, never written to disk)
    #[serde(skip)]
    pub hibp_api_key: Option<String>,
}

impl NetworkConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Inter-call delay as a `Duration`.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            delay_ms: 1000,
            user_agent: "dossier/0.1.0 (+https://github.com/dossier-osint/dossier)".to_string(),
            hibp_base_url: "https://haveibeenpwned.com/api/v3".to_string(),
            hibp_api_key: None,
        }
    }
}

/// External command probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    /// Hard upper bound on command wall-clock time in seconds
    pub timeout_secs: u64,
    /// Template used when no command is configured but a domain is present
    pub default_template: String,
}

impl ExternalConfig {
    /// Command timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            default_template: "theHarvester -d {domain} -b all -l 200 -f {outbase}".to_string(),
        }
    }
}

/// Report writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Timeout for an external PDF renderer in seconds
    pub pdf_timeout_secs: u64,
}

impl ReportConfig {
    /// Renderer timeout as a `Duration`.
    #[must_use]
    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pdf_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.output_dir, PathBuf::from("osint_reports"));
        assert_eq!(config.network.timeout_secs, 10);
        assert_eq!(config.network.delay_ms, 1000);
        assert_eq!(config.external.timeout_secs, 300);
        assert_eq!(config.report.pdf_timeout_secs, 120);
        assert!(config.network.hibp_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_skips_api_key() {
        let mut config = AppConfig::default();
        config.network.hibp_api_key = Some("secret".to_string());

        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[network]"));
        assert!(toml_str.contains("[external]"));
        assert!(!toml_str.contains("secret"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.external.default_template, config.external.default_template);
        assert!(parsed.network.hibp_api_key.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[general]
output_dir = "/tmp/reports"

[external]
timeout_secs = 30
"#,
        )
        .expect("write config file");

        let config = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(config.general.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.external.timeout_secs, 30);
        // Untouched sections keep defaults
        assert_eq!(config.network.timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let config = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load config");
        assert_eq!(config.network.delay_ms, 1000);
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[network]\ntimeout_secs = 0\n").expect("write config file");

        let err = AppConfig::load_from(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DOSSIER_OUTPUT_DIR", "out"),
            ("DOSSIER_TIMEOUT_SECS", "5"),
            ("DOSSIER_DELAY_MS", "not-a-number"),
            ("HIBP_API_KEY", "abc123"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.general.output_dir, PathBuf::from("out"));
        assert_eq!(config.network.timeout_secs, 5);
        // Unparseable values are ignored
        assert_eq!(config.network.delay_ms, 1000);
        assert_eq!(config.network.hibp_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "HIBP_API_KEY").then(|| "  ".to_string()));
        assert!(config.network.hibp_api_key.is_none());
    }
}
