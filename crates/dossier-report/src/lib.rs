//! Dossier Report - Persisting orchestration reports.
//!
//! A [`Report`](dossier_probes::Report) is always saved as pretty-printed
//! JSON. It can also be rendered to a standalone HTML page, and from that
//! page to PDF through the first installed external renderer.
//!
//! # Example
//!
//! ```rust,ignore
//! use dossier_report::{FormatSelection, ReportWriter};
//! use std::time::Duration;
//!
//! let writer = ReportWriter::new("osint_reports", Duration::from_secs(120));
//! let formats = FormatSelection { html: true, pdf: false };
//! let saved = writer.save(&report, Some("case_42"), &formats).await?;
//! println!("{}", serde_json::to_string(&saved)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod html;
pub mod pdf;
pub mod writer;

pub use error::{RenderError, Result};
pub use html::render_html;
pub use pdf::{default_renderers, render_first_available, CommandRenderer, PdfRenderer};
pub use writer::{FormatSelection, ReportWriter, SavedReport};
