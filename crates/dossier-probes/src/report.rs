//! The aggregate result of one orchestration run.

use chrono::{DateTime, Utc};
use dossier_core::Context;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Per-probe results in execution order.
///
/// Serializes as a JSON object whose key order is the order probes ran in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleResults {
    entries: Vec<(String, Value)>,
}

impl ModuleResults {
    /// Create an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result for `name`, replacing an earlier one in place.
    pub fn insert(&mut self, name: impl Into<String>, result: Value) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = result;
        } else {
            self.entries.push((name, result));
        }
    }

    /// Result stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Probe names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, result)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of stored results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no results are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ModuleResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, result) in &self.entries {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// Report produced by one run of the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    generated_at: DateTime<Utc>,
    inputs: Context,
    modules: ModuleResults,
}

impl Report {
    /// Assemble a report.
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>, inputs: Context, modules: ModuleResults) -> Self {
        Self {
            generated_at,
            inputs,
            modules,
        }
    }

    /// When the run started.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// The context every probe saw.
    #[must_use]
    pub fn inputs(&self) -> &Context {
        &self.inputs
    }

    /// Per-probe results.
    #[must_use]
    pub fn modules(&self) -> &ModuleResults {
        &self.modules
    }
}
