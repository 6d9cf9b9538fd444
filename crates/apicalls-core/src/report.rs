//! Markdown report of API calls grouped by catalog entry.

use std::io::Write;

use crate::catalog::Catalog;
use crate::request::RequestRecord;
use crate::scanner::unescape_double_quote;

const FENCE: &str = "```";

/// Render a request as `METHOD PATH[?QUERY][ body: BODY]`
pub fn format_request(request: &RequestRecord) -> String {
    let mut line = format!("{} {}", request.method, request.path);
    if let Some(query) = &request.query {
        line.push('?');
        line.push_str(query);
    }
    if let Some(body) = &request.body {
        line.push_str(" body: ");
        line.push_str(&unescape_double_quote(body));
    }
    line
}

/// Header line for a catalog entry
pub fn header(kind: &str, name: &str) -> String {
    format!("### All calls for API endpoint '{} ({})'", kind, name)
}

/// Render the grouped report.
///
/// Entries are listed by type. Each gets a header and, when any request was
/// classified with its type, a fenced block of the sorted request lines.
pub fn render(catalog: &Catalog, requests: &[RequestRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in catalog.sorted_by_type() {
        lines.push(header(&entry.kind, &entry.name));

        let mut calls: Vec<String> = requests
            .iter()
            .filter(|request| {
                request
                    .target
                    .as_ref()
                    .is_some_and(|target| target.kind == entry.kind)
            })
            .map(format_request)
            .collect();
        if calls.is_empty() {
            continue;
        }
        calls.sort();

        lines.push(FENCE.to_string());
        lines.extend(calls);
        lines.push(FENCE.to_string());
    }
    lines
}

/// Output of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// One line per request no catalog entry matched, in input order
    pub diagnostics: Vec<String>,
    /// The grouped report
    pub lines: Vec<String>,
}

impl Report {
    /// Write diagnostics, then the report, one line each
    pub fn write_to<W: Write>(&self, mut out: W) -> crate::Result<()> {
        for line in self.diagnostics.iter().chain(&self.lines) {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    }
}
