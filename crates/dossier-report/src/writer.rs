//! Persisting a report in the requested formats.
//!
//! JSON is always written. HTML is optional, and PDF is produced from the
//! HTML file, so it is only attempted when both are requested. Each format
//! is written to a temporary file in the output directory and renamed into
//! place; a failure in one format is recorded without affecting the others.
//! File writes and `fsync` run on the blocking thread pool.

use crate::error::{RenderError, Result};
use crate::html::render_html;
use crate::pdf::{default_renderers, render_first_available, PdfRenderer};
use chrono::Utc;
use dossier_probes::Report;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Optional formats written next to the JSON report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSelection {
    /// Write `<base>.html`
    pub html: bool,
    /// Write `<base>.pdf` (requires `html`)
    pub pdf: bool,
}

/// Paths written by [`ReportWriter::save`], or the reason a format failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SavedReport {
    /// JSON report path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
    /// Why the JSON report could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_error: Option<String>,
    /// HTML report path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<PathBuf>,
    /// Why the HTML report could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_error: Option<String>,
    /// PDF report path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PathBuf>,
    /// Why the PDF report could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_error: Option<String>,
}

/// Writes reports into one output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
    renderers: Vec<Box<dyn PdfRenderer>>,
}

impl ReportWriter {
    /// Writer using the default PDF renderer chain.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, pdf_timeout: Duration) -> Self {
        Self::with_renderers(output_dir, default_renderers(pdf_timeout))
    }

    /// Writer using a custom PDF renderer chain.
    #[must_use]
    pub fn with_renderers(
        output_dir: impl Into<PathBuf>,
        renderers: Vec<Box<dyn PdfRenderer>>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderers,
        }
    }

    /// Directory reports are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `report` under `base_name` (or a timestamped default).
    ///
    /// A base name containing directories and failing to create the output
    /// directory are errors; per-format failures are reported in the
    /// returned [`SavedReport`].
    pub async fn save(
        &self,
        report: &Report,
        base_name: Option<&str>,
        formats: &FormatSelection,
    ) -> Result<SavedReport> {
        let base = match base_name {
            Some(name) => normalize_base_name(name)?,
            None => default_base_name(),
        };
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut saved = SavedReport::default();

        let json_path = self.output_dir.join(format!("{base}.json"));
        match self.write_json(report, &json_path).await {
            Ok(()) => saved.json = Some(json_path),
            Err(e) => {
                warn!(error = %e, "failed to write JSON report");
                saved.json_error = Some(e.to_string());
            }
        }

        if formats.html {
            self.save_html(report, &base, formats.pdf, &mut saved).await;
        }

        info!(?saved, "report saved");
        Ok(saved)
    }

    async fn save_html(&self, report: &Report, base: &str, pdf: bool, saved: &mut SavedReport) {
        let html_path = self.output_dir.join(format!("{base}.html"));
        if let Err(e) = self.write_atomic(&html_path, render_html(report).into_bytes()).await {
            warn!(error = %e, "failed to write HTML report");
            saved.html_error = Some(e.to_string());
            return;
        }
        saved.html = Some(html_path.clone());

        if pdf {
            let pdf_path = self.output_dir.join(format!("{base}.pdf"));
            match self.write_pdf(&html_path, &pdf_path).await {
                Ok(()) => saved.pdf = Some(pdf_path),
                Err(e) => {
                    warn!(error = %e, "failed to produce PDF report");
                    saved.pdf_error = Some(e.to_string());
                }
            }
        }
    }

    async fn write_json(&self, report: &Report, path: &Path) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(report)?;
        bytes.push(b'\n');
        self.write_atomic(path, bytes).await
    }

    async fn write_atomic(&self, path: &Path, contents: Vec<u8>) -> Result<()> {
        let dir = self.output_dir.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || persist_in(&dir, &path, &contents))
            .await
            .map_err(|e| RenderError::Io(std::io::Error::other(e)))?
    }

    async fn write_pdf(&self, html: &Path, pdf: &Path) -> Result<()> {
        let staging = tempfile::Builder::new()
            .prefix(".dossier-")
            .suffix(".pdf")
            .tempfile_in(&self.output_dir)?
            .into_temp_path();

        render_first_available(&self.renderers, html, &staging).await?;
        staging.persist(pdf).map_err(|e| RenderError::Io(e.error))?;
        Ok(())
    }
}

fn persist_in(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| RenderError::Io(e.error))?;
    Ok(())
}

fn default_base_name() -> String {
    format!("dossier_report_{}", Utc::now().format("%Y%m%dT%H%M%S"))
}

/// Strip a trailing `.json` and require a bare file name, so every
/// format lands inside the output directory.
fn normalize_base_name(name: &str) -> Result<String> {
    let base = name.strip_suffix(".json").unwrap_or(name);
    let plain = !base.is_empty()
        && base != "."
        && base != ".."
        && !base.contains(['/', '\\']);
    if plain {
        Ok(base.to_string())
    } else {
        Err(RenderError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_json_extension() {
        assert_eq!(normalize_base_name("case_42.json").unwrap(), "case_42");
        assert_eq!(normalize_base_name("case_42").unwrap(), "case_42");
        assert_eq!(normalize_base_name("case.json.bak").unwrap(), "case.json.bak");
    }

    #[test]
    fn test_base_name_must_be_a_file_name() {
        for name in ["sub/case", "../escaped", "..", ".json", "", "/tmp/case.json", "dir\\case"] {
            assert!(
                matches!(normalize_base_name(name), Err(RenderError::InvalidName(_))),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn test_default_base_name_shape() {
        let name = default_base_name();
        let stamp = name.strip_prefix("dossier_report_").unwrap();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "T");
    }

    #[test]
    fn test_saved_report_serialization() {
        let saved = SavedReport {
            json: Some(PathBuf::from("out/r.json")),
            html: Some(PathBuf::from("out/r.html")),
            pdf_error: Some("No wkhtmltopdf or weasyprint available; cannot generate PDF".to_string()),
            ..SavedReport::default()
        };
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "json": "out/r.json",
                "html": "out/r.html",
                "pdf_error": "No wkhtmltopdf or weasyprint available; cannot generate PDF",
            })
        );
    }
}
