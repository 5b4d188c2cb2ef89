//! Name to constructor mapping for probes.

use crate::error::Result;
use crate::probe::Probe;
use dossier_core::Context;
use tracing::debug;

/// Builds a probe for one run.
///
/// Construction may fail (for example when a resolver cannot be created);
/// the orchestrator records that failure in the probe's report slot.
pub type ProbeConstructor = Box<dyn Fn(&Context) -> Result<Box<dyn Probe>> + Send + Sync>;

/// Registry of probe constructors, populated once at startup.
///
/// Iteration follows first-registration order. Registering a name that is
/// already present replaces its constructor in place.
#[derive(Default)]
pub struct ProbeRegistry {
    entries: Vec<(String, ProbeConstructor)>,
}

impl ProbeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe constructor under `name`. Last registration wins.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&Context) -> Result<Box<dyn Probe>> + Send + Sync + 'static,
    {
        let name = name.into();
        let constructor: ProbeConstructor = Box::new(constructor);

        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            debug!(probe = %name, "replacing registered probe");
            slot.1 = constructor;
        } else {
            debug!(probe = %name, "registered probe");
            self.entries.push((name, constructor));
        }
    }

    /// Look up the constructor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProbeConstructor> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, constructor)| constructor)
    }

    /// Check if a probe is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Number of registered probes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no probes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeRegistry")
            .field("probes", &self.names())
            .finish()
    }
}
