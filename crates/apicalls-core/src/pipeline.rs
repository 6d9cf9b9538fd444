//! End-to-end pipeline: scan, scrub, dedupe, classify, render.

use std::collections::HashSet;

use crate::config::Config;
use crate::matcher::UrlPattern;
use crate::report::{self, Report};
use crate::request::RequestRecord;
use crate::scanner;
use crate::scrubber::Scrubber;

/// Run the whole pipeline over the lines of an excon log.
///
/// Fails when no catalog was found or a catalog line was malformed; no
/// partial report is produced in that case.
pub fn run<I, S>(lines: I, config: &Config) -> crate::Result<Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (catalog, requests) = scanner::scan(lines)?.require_catalog()?;
    let scrubber = Scrubber::new(config)?;

    let requests = dedupe(requests.into_iter().map(|r| scrubber.scrub(r)));
    log::debug!("{} unique requests after scrubbing", requests.len());

    let mut diagnostics = Vec::new();
    let mut classified = Vec::with_capacity(requests.len());
    for request in requests {
        let target = catalog.target_for(&request)?;
        if target.is_none() {
            let pattern = UrlPattern::for_request(&request)?;
            log::warn!("No catalog entry for {} {}", request.method, request.path);
            diagnostics.push(format!("nothing found for url '{}'", pattern.describe()));
        }
        classified.push(request.with_target(target));
    }

    Ok(Report {
        diagnostics,
        lines: report::render(&catalog, &classified),
    })
}

/// Drop repeated records, keeping the first occurrence of each
pub fn dedupe<I>(requests: I) -> Vec<RequestRecord>
where
    I: IntoIterator<Item = RequestRecord>,
{
    let mut seen = HashSet::new();
    requests
        .into_iter()
        .filter(|request| seen.insert(request.clone()))
        .collect()
}
