//! Best-effort phone number normalization.
//!
//! This is a shape check, not a numbering-plan lookup: it only decides
//! whether the input looks like a dialable number and produces an E.164
//! rendering when a country code was given.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-().]").expect("Separator regex is hardcoded and valid"));

static PHONE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+)?(\d{7,15})$").expect("Phone regex is hardcoded and valid"));

/// Outcome of checking a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneValidation {
    /// E.164 form, only when the input carried a country code
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub e164: Option<String>,
    /// Input as given, when it could not be normalized
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw: Option<String>,
    /// Whether the number plausibly exists
    pub valid_guess: bool,
    /// Caveat about the result
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

impl PhoneValidation {
    /// Check a raw phone number.
    #[must_use]
    pub fn check(raw: &str) -> Self {
        let compact = SEPARATORS.replace_all(raw.trim(), "");

        let Some(caps) = PHONE_SHAPE.captures(&compact) else {
            return Self {
                e164: None,
                raw: Some(raw.to_string()),
                valid_guess: false,
                note: Some("not a phone number".to_string()),
            };
        };

        let digits = &caps[2];
        if caps.get(1).is_some() {
            Self {
                e164: Some(format!("+{digits}")),
                raw: None,
                // Shortest assigned E.164 numbers have 8 digits
                valid_guess: digits.len() >= 8,
                note: None,
            }
        } else {
            Self {
                e164: None,
                raw: Some(raw.to_string()),
                valid_guess: true,
                note: Some("no country code; not normalized".to_string()),
            }
        }
    }
}
