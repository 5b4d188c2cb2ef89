//! Self-contained HTML rendering of a report.

use dossier_probes::Report;
use html_escape::encode_text;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Write};

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:20px} \
pre{background:#f6f6f6;padding:10px;overflow:auto} \
table{border-collapse:collapse;width:100%} td,th{border:1px solid #ddd;padding:6px;text-align:left} \
.error{color:#a00}";

/// Render `report` as a standalone HTML page.
///
/// Every value taken from the report is HTML-escaped.
#[must_use]
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();
    // Writing into a String only fails if a Display impl does, and every
    // value here is already a string.
    if write_page(&mut html, report).is_err() {
        html.clear();
    }
    html
}

fn write_page(html: &mut String, report: &Report) -> fmt::Result {
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Dossier Report</title>");
    writeln!(html, "<style>{STYLE}</style></head><body>")?;
    html.push_str("<h1>Dossier Report</h1>\n");
    writeln!(
        html,
        "<p>Generated at: {}</p>",
        encode_text(&report.generated_at().to_rfc3339())
    )?;

    html.push_str("<h2>Inputs</h2>\n");
    writeln!(html, "<pre>{}</pre>", encode_text(&pretty(report.inputs())))?;

    html.push_str("<h2>Modules</h2>\n<table><tr><th>Module</th><th>Status</th></tr>\n");
    for (name, result) in report.modules().iter() {
        let (class, status) = status_of(result);
        writeln!(
            html,
            "<tr><td>{}</td><td class=\"{class}\">{}</td></tr>",
            encode_text(name),
            encode_text(&status)
        )?;
    }
    html.push_str("</table>\n");

    for (name, result) in report.modules().iter() {
        writeln!(html, "<h3>{}</h3>", encode_text(name))?;
        writeln!(html, "<pre>{}</pre>", encode_text(&pretty(result)))?;
    }

    html.push_str("</body></html>\n");
    Ok(())
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

/// Status cell for one module: a top-level `error`, then a failed
/// external run (`executed.error`), then a `note`.
fn status_of(result: &Value) -> (&'static str, String) {
    let text = |value: Option<&Value>| value.and_then(Value::as_str).map(ToString::to_string);

    if let Some(error) = text(result.get("error")) {
        ("error", error)
    } else if let Some(error) = text(result.get("executed").and_then(|e| e.get("error"))) {
        ("error", error)
    } else if let Some(note) = text(result.get("note")) {
        ("note", note)
    } else {
        ("ok", "ok".to_string())
    }
}
