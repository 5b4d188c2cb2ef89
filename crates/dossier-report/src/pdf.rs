//! HTML to PDF conversion through external renderers.

use crate::error::{RenderError, Result};
use async_trait::async_trait;
use dossier_probes::{CommandError, CommandRunner, ResolvedCommand};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Converts an HTML file into a PDF file.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Renderer name used in error messages.
    fn name(&self) -> &str;

    /// Render `html` into `pdf`.
    ///
    /// Returns [`RenderError::Unavailable`] when the renderer is not
    /// installed, so the next renderer in a chain can be tried.
    async fn render(&self, html: &Path, pdf: &Path) -> Result<()>;
}

/// A renderer invoked as `<program> <html> <pdf>`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    runner: CommandRunner,
}

impl CommandRenderer {
    /// Renderer running `program` with a wall-clock limit.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            runner: CommandRunner::new(timeout),
        }
    }
}

#[async_trait]
impl PdfRenderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn render(&self, html: &Path, pdf: &Path) -> Result<()> {
        let command = ResolvedCommand::new(
            self.program.clone(),
            [html.display().to_string(), pdf.display().to_string()],
        );

        let failed = |reason: String| RenderError::Failed {
            renderer: self.program.clone(),
            reason,
        };

        match self.runner.run(&command).await {
            Ok(output) if output.returncode == Some(0) => Ok(()),
            Ok(output) => {
                let status = output
                    .returncode
                    .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit status {c}"));
                let detail = output.output.trim();
                Err(failed(if detail.is_empty() {
                    status
                } else {
                    format!("{status}: {detail}")
                }))
            }
            Err(CommandError::NotFound { .. }) => Err(RenderError::Unavailable),
            Err(e) => Err(failed(e.to_string())),
        }
    }
}

/// The renderers tried in order: `wkhtmltopdf`, then `weasyprint`.
#[must_use]
pub fn default_renderers(timeout: Duration) -> Vec<Box<dyn PdfRenderer>> {
    vec![
        Box::new(CommandRenderer::new("wkhtmltopdf", timeout)),
        Box::new(CommandRenderer::new("weasyprint", timeout)),
    ]
}

/// Render with the first available renderer.
///
/// A renderer that is installed but fails ends the chain with its error.
pub async fn render_first_available(
    renderers: &[Box<dyn PdfRenderer>],
    html: &Path,
    pdf: &Path,
) -> Result<()> {
    for renderer in renderers {
        match renderer.render(html, pdf).await {
            Err(RenderError::Unavailable) => {
                debug!(renderer = renderer.name(), "PDF renderer not installed");
            }
            Ok(()) => {
                info!(renderer = renderer.name(), pdf = %pdf.display(), "PDF rendered");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
    Err(RenderError::Unavailable)
}
