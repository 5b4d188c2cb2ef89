//! Username search through the `sherlock` CLI.

use super::pause;
use crate::command::{CommandRunner, ResolvedCommand};
use crate::error::Result;
use crate::probe::{error_result, Probe, ProbeResult};
use async_trait::async_trait;
use dossier_core::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Registry name.
pub const NAME: &str = "sherlock";

static FOUND_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\+\]\s*([^:]+?):\s*(\S+)").expect("Sherlock regex is hardcoded and valid")
});

/// A profile sherlock reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundProfile {
    /// Site name as printed by sherlock
    pub site: String,
    /// Profile URL
    pub url: String,
}

/// Runs `sherlock <username> --timeout 10 --print-found`.
pub struct SherlockProbe {
    runner: CommandRunner,
    program: String,
    delay: Duration,
}

impl SherlockProbe {
    /// Create a probe invoking `sherlock` from `PATH`.
    #[must_use]
    pub fn new(runner: CommandRunner, delay: Duration) -> Self {
        Self {
            runner,
            program: "sherlock".to_string(),
            delay,
        }
    }

    /// Use a different executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl Probe for SherlockProbe {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &Context) -> Result<ProbeResult> {
        let mut out = ProbeResult::new();
        out.insert("note".to_string(), Value::Null);
        out.insert("executed".to_string(), Value::Null);
        out.insert("found".to_string(), json!([]));

        let Some(username) = ctx.username() else {
            out.insert(
                "note".to_string(),
                json!("No username provided; skipping sherlock."),
            );
            return Ok(out);
        };

        let command = ResolvedCommand::new(
            self.program.clone(),
            [username, "--timeout", "10", "--print-found"],
        );

        match self.runner.run(&command).await {
            Ok(output) => {
                out.insert("found".to_string(), json!(parse_found(&output.output)));
                out.insert("executed".to_string(), json!(output));
            }
            Err(e) => {
                out.insert("executed".to_string(), Value::Object(error_result(e.to_string())));
            }
        }

        pause(self.delay).await;
        Ok(out)
    }
}

/// Parse `[+] Site: url` lines from sherlock output.
#[must_use]
pub fn parse_found(output: &str) -> Vec<FoundProfile> {
    output
        .lines()
        .filter_map(|line| FOUND_LINE.captures(line.trim()))
        .map(|caps| FoundProfile {
            site: caps[1].trim().to_string(),
            url: caps[2].to_string(),
        })
        .collect()
}
