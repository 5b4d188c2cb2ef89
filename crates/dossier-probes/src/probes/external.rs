//! Run a configurable external tool and mine its output.
//!
//! The command comes from the context's `external_cmd` template, or falls
//! back to a theHarvester invocation when only a domain is known. Whatever
//! happens to the process is recorded under `executed`; the probe itself
//! only fails when the output directory cannot be created.

use super::pause;
use crate::artifacts::extract_artifacts;
use crate::command::{CommandRunner, CommandTemplate, TemplateVars};
use crate::error::Result;
use crate::probe::{error_result, Probe, ProbeResult};
use async_trait::async_trait;
use chrono::Utc;
use dossier_core::Context;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Registry name.
pub const NAME: &str = "external_cli";

/// Separator between process output and a captured `.xml` file.
pub const CAPTURE_MARKER: &str = "\n\n--captured-file--\n\n";

/// Extensions checked next to the outbase after the command ran.
const PRODUCED_EXTENSIONS: [&str; 4] = ["html", "xml", "json", "txt"];

/// Runs an external command and extracts emails and hostnames from it.
pub struct ExternalCommandProbe {
    runner: CommandRunner,
    output_dir: PathBuf,
    default_template: CommandTemplate,
    delay: Duration,
}

impl ExternalCommandProbe {
    /// Create a probe writing artifacts under `output_dir`.
    #[must_use]
    pub fn new(
        runner: CommandRunner,
        output_dir: impl Into<PathBuf>,
        default_template: CommandTemplate,
        delay: Duration,
    ) -> Self {
        Self {
            runner,
            output_dir: output_dir.into(),
            default_template,
            delay,
        }
    }

    fn template_for(&self, ctx: &Context) -> Option<CommandTemplate> {
        match ctx.config().external_cmd() {
            Some(template) => Some(CommandTemplate::new(template)),
            None if ctx.domain().is_some() => Some(self.default_template.clone()),
            None => None,
        }
    }
}

#[async_trait]
impl Probe for ExternalCommandProbe {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &Context) -> Result<ProbeResult> {
        let mut out = ProbeResult::new();
        for key in ["note", "executed", "parsed"] {
            out.insert(key.to_string(), Value::Null);
        }

        let Some(template) = self.template_for(ctx) else {
            out.insert(
                "note".to_string(),
                json!("No external_cmd provided and no domain to run default theHarvester; skipping."),
            );
            return Ok(out);
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let outbase = self
            .output_dir
            .join(format!("external_{}", Utc::now().timestamp()));
        let vars = TemplateVars::from_context(ctx, &outbase);

        let execution = match template.resolve(&vars) {
            Ok(command) => self.runner.run(&command).await,
            Err(e) => Err(e),
        };

        let (executed, parsed) = match execution {
            Ok(mut output) => {
                let capture = with_suffix(&outbase, "xml");
                match tokio::fs::read(&capture).await {
                    Ok(bytes) => {
                        debug!(path = %capture.display(), "merging captured file");
                        output.output.push_str(CAPTURE_MARKER);
                        output.output.push_str(&String::from_utf8_lossy(&bytes));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => warn!(path = %capture.display(), error = %e, "capture file unreadable"),
                }
                let parsed = extract_artifacts(&output.output);
                (serde_json::to_value(&output), parsed)
            }
            Err(e) => {
                warn!(error = %e, "external command failed");
                (
                    Ok(Value::Object(error_result(e.to_string()))),
                    extract_artifacts(""),
                )
            }
        };

        out.insert(
            "executed".to_string(),
            executed.unwrap_or_else(|e| Value::Object(error_result(e.to_string()))),
        );
        out.insert("parsed".to_string(), json!(parsed));

        let mut produced = Vec::new();
        for ext in PRODUCED_EXTENSIONS {
            let path = with_suffix(&outbase, ext);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                produced.push(path.display().to_string());
            }
        }
        if !produced.is_empty() {
            out.insert("produced_files".to_string(), json!(produced));
        }

        pause(self.delay).await;
        Ok(out)
    }
}

/// `<base>.<ext>` without touching dots already in `base`.
fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
