//! The capability contract every probe implements.

use crate::error::Result;
use async_trait::async_trait;
use dossier_core::Context;
use serde_json::{Map, Value};

/// Free-form structured result of a probe.
///
/// By convention a `note` field carries human-readable caveats; every other
/// field is probe-specific. Keys serialize in sorted order.
pub type ProbeResult = Map<String, Value>;

/// A self-contained unit that gathers one category of information.
///
/// Implementations should fold expected failures (missing identifiers,
/// unavailable collaborators, remote errors) into `note` or `error` fields of
/// the result. A returned `Err` is recorded by the orchestrator as
/// `{error: <message>}` for this probe only.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Registry name of this probe.
    fn name(&self) -> &str;

    /// Gather information for the identifiers in `ctx`.
    async fn run(&self, ctx: &Context) -> Result<ProbeResult>;
}

/// Build a result holding only a `note`.
#[must_use]
pub fn note_only(note: impl Into<String>) -> ProbeResult {
    let mut out = ProbeResult::new();
    out.insert("note".to_string(), Value::String(note.into()));
    out
}

/// Build a result holding only an `error`.
#[must_use]
pub fn error_result(message: impl Into<String>) -> ProbeResult {
    let mut out = ProbeResult::new();
    out.insert("error".to_string(), Value::String(message.into()));
    out
}
