//! Templated subprocess invocation.
//!
//! A [`CommandTemplate`] is a whitespace-tokenizable string with up to four
//! placeholders: `{domain}`, `{email}`, `{username}` and `{outbase}`.
//! Resolution substitutes every placeholder exactly once (empty string for an
//! unset identifier) and then splits on whitespace. Substituted values that
//! contain whitespace therefore become several arguments; quoting and shell
//! metacharacters are passed through untouched.

use dossier_core::Context;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(domain|email|username|outbase)\}")
        .expect("Placeholder regex is hardcoded and valid")
});

/// Terminal failures of a command invocation.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be found
    #[error("command not found: {program}")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// The command exceeded its wall-clock limit and was killed
    #[error("command timeout")]
    Timeout,

    /// The resolved template contained no program
    #[error("empty command")]
    Empty,

    /// Any other spawn or wait failure
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Values substituted into a [`CommandTemplate`].
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    /// Replaces `{domain}`
    pub domain: String,
    /// Replaces `{email}`
    pub email: String,
    /// Replaces `{username}`
    pub username: String,
    /// Replaces `{outbase}`
    pub outbase: String,
}

impl TemplateVars {
    /// Take identifiers from `ctx` and the artifact prefix from `outbase`.
    #[must_use]
    pub fn from_context(ctx: &Context, outbase: &Path) -> Self {
        Self {
            domain: ctx.domain().unwrap_or_default().to_string(),
            email: ctx.email().unwrap_or_default().to_string(),
            username: ctx.username().unwrap_or_default().to_string(),
            outbase: outbase.display().to_string(),
        }
    }
}

/// A command line with named placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    /// Wrap a template string.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute every placeholder in a single pass.
    ///
    /// Values are inserted verbatim and never rescanned, so a value that
    /// itself looks like a placeholder stays as it is. Unrecognized `{...}`
    /// tokens are left in place.
    #[must_use]
    pub fn render(&self, vars: &TemplateVars) -> String {
        PLACEHOLDER
            .replace_all(&self.0, |caps: &Captures<'_>| match &caps[1] {
                "domain" => vars.domain.clone(),
                "email" => vars.email.clone(),
                "username" => vars.username.clone(),
                _ => vars.outbase.clone(),
            })
            .into_owned()
    }

    /// Render and split into program and arguments.
    pub fn resolve(&self, vars: &TemplateVars) -> Result<ResolvedCommand, CommandError> {
        let rendered = self.render(vars);
        let mut parts = rendered.split_whitespace().map(ToString::to_string);
        let program = parts.next().ok_or(CommandError::Empty)?;
        Ok(ResolvedCommand {
            program,
            args: parts.collect(),
        })
    }
}

/// A concrete program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// Program name or path
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
}

impl ResolvedCommand {
    /// Build from a program and its arguments.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// The command line that ran
    pub cmd: String,
    /// Exit code, `None` when terminated by a signal
    pub returncode: Option<i32>,
    /// Standard output followed by standard error
    pub output: String,
}

/// Executes resolved commands with a wall-clock limit.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    /// Create a runner that kills commands after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured limit.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `command`, capturing its output.
    ///
    /// A nonzero exit status is returned in [`CommandOutput::returncode`],
    /// not as an error.
    pub async fn run(&self, command: &ResolvedCommand) -> Result<CommandOutput, CommandError> {
        debug!(cmd = %command, timeout = ?self.timeout, "spawning command");

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::NotFound {
                    program: command.program.clone(),
                },
                _ => CommandError::Io(e),
            })?;

        // Dropping the child on timeout kills it
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CommandError::Timeout)??;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        debug!(cmd = %command, status = ?output.status.code(), bytes = text.len(), "command finished");

        Ok(CommandOutput {
            cmd: command.to_string(),
            returncode: output.status.code(),
            output: text,
        })
    }
}
