//! Sequential probe runner.
//!
//! The orchestrator resolves requested names against the registry and runs
//! each probe inside a failure boundary. Whatever happens to one probe
//! (unregistered name, constructor error, `Err` result, panic) is written to
//! that probe's slot and the run moves on to the next name.

use crate::probe::{error_result, ProbeResult};
use crate::registry::ProbeRegistry;
use crate::report::{ModuleResults, Report};
use chrono::Utc;
use dossier_core::Context;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{info, warn};

/// Error recorded for a requested name with no registered probe.
pub const NOT_REGISTERED: &str = "module not registered";

/// Runs probes from a registry and assembles the report.
#[derive(Debug)]
pub struct Orchestrator {
    registry: ProbeRegistry,
}

impl Orchestrator {
    /// Create an orchestrator over `registry`.
    #[must_use]
    pub fn new(registry: ProbeRegistry) -> Self {
        Self { registry }
    }

    /// The registry this orchestrator draws from.
    #[must_use]
    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Names that a call to [`run_all`](Self::run_all) with `selected` would run.
    #[must_use]
    pub fn plan(&self, selected: &[String]) -> Vec<String> {
        if selected.is_empty() {
            self.registry.names()
        } else {
            selected.to_vec()
        }
    }

    /// Run the selected probes (all registered probes when `selected` is empty).
    ///
    /// Probes run one at a time in the order given. The report carries
    /// exactly one entry per distinct requested name.
    pub async fn run_all(&self, ctx: &Context, selected: &[String]) -> Report {
        let generated_at = Utc::now();
        let plan = self.plan(selected);
        let mut modules = ModuleResults::new();

        info!(probes = ?plan, "starting run");

        for name in plan {
            let started = Instant::now();
            let result = self.run_one(&name, ctx).await;

            match failure_of(&result) {
                Some(error) => {
                    warn!(probe = %name, elapsed = ?started.elapsed(), %error, "probe failed");
                }
                None => {
                    info!(probe = %name, elapsed = ?started.elapsed(), "probe finished");
                }
            }

            modules.insert(name, Value::Object(result));
        }

        Report::new(generated_at, ctx.clone(), modules)
    }

    async fn run_one(&self, name: &str, ctx: &Context) -> ProbeResult {
        let Some(constructor) = self.registry.get(name) else {
            return error_result(NOT_REGISTERED);
        };

        let probe = match std::panic::catch_unwind(AssertUnwindSafe(|| constructor(ctx))) {
            Ok(Ok(probe)) => probe,
            Ok(Err(e)) => return error_result(e.to_string()),
            Err(payload) => return error_result(panic_message(&*payload)),
        };

        match AssertUnwindSafe(probe.run(ctx)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => error_result(e.to_string()),
            Err(payload) => error_result(panic_message(&*payload)),
        }
    }
}

/// The error of a result that holds nothing but `{error}`.
fn failure_of(result: &ProbeResult) -> Option<&Value> {
    match result.get("error") {
        Some(error) if result.len() == 1 => Some(error),
        _ => None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("probe panicked: {detail}")
}
