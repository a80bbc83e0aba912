//! Text and HTML output for resolved regions.

use crate::session::{CycleState, ViewSnapshot};
use crate::types::ResolvedRegion;
use std::fmt::Write;

/// Render regions as FASTA-like records: `>` + the original line, then the
/// residues on one line. Regions whose sequence was not found get an empty
/// residue line.
pub fn fasta_records(regions: &[ResolvedRegion]) -> String {
    let mut out = String::new();
    for region in regions {
        let _ = writeln!(out, ">{}", region.request.text);
        let _ = writeln!(out, "{}", region.residues.as_deref().unwrap_or_default());
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The viewer page: URL field, region text area, error line and records.
pub fn page(snapshot: &ViewSnapshot) -> String {
    let (error, records) = match &snapshot.state {
        CycleState::Success(regions) => (None, fasta_records(regions)),
        CycleState::Failure(message) => (Some(message.as_str()), String::new()),
        CycleState::Idle | CycleState::Pending => (None, String::new()),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>faview</title>\n</head>\n<body>\n");
    html.push_str("<form method=\"post\" action=\"/\">\n");
    let _ = writeln!(
        html,
        "<div style=\"margin: 20px\"><label for=\"url\">URL: </label>\
         <input id=\"url\" name=\"url\" type=\"text\" size=\"80\" value=\"{}\"></div>",
        escape(&snapshot.url)
    );
    let _ = writeln!(
        html,
        "<div style=\"margin: 20px\"><label for=\"locations\">Loc strings:</label>\
         <textarea id=\"locations\" name=\"locations\" rows=\"6\" cols=\"40\">{}</textarea></div>",
        escape(&snapshot.locations)
    );
    html.push_str("<div style=\"margin: 20px\"><button type=\"submit\">Fetch</button></div>\n");
    html.push_str("</form>\n");

    if let Some(message) = error {
        let _ = writeln!(
            html,
            "<div class=\"error\" style=\"color: red\">{}</div>",
            escape(message)
        );
    }

    let _ = writeln!(
        html,
        "<pre data-generation=\"{}\" style=\"margin: 20px; white-space: pre-wrap; word-wrap: break-word\">{}</pre>",
        snapshot.generation,
        escape(&records)
    );
    html.push_str("</body>\n</html>\n");
    html
}
