//! Email and hostname extraction from unstructured tool output.
//!
//! This is a heuristic scanner, not a validator. Both sets are deduplicated
//! and sorted, so extraction is idempotent and independent of the order in
//! which tokens appear.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("Email regex is hardcoded and valid")
});

static HOST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b")
        .expect("Hostname regex is hardcoded and valid")
});

/// Candidate artifacts recovered from text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    /// Email-like tokens
    pub emails: BTreeSet<String>,
    /// Hostname-like tokens
    pub hosts: BTreeSet<String>,
}

/// Scan `text` for email and hostname candidates.
///
/// Hostnames of three characters or fewer and all-digit tokens are dropped.
#[must_use]
pub fn extract_artifacts(text: &str) -> Artifacts {
    let emails = EMAIL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let hosts = HOST_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|h| h.len() > 3 && !h.chars().all(|c| c.is_ascii_digit()))
        .map(ToString::to_string)
        .collect();

    Artifacts { emails, hosts }
}
