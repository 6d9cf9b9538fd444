//! Classification of requests against the service catalog.
//!
//! A request is matched by rebuilding the start of its URL from host and port
//! and searching for it in the public endpoint URLs of each catalog entry.
//! Several services often share a host and port on test deployments, so the
//! API version segment of the path (`/v2`, `/v2.0`) is tried first and only
//! dropped when nothing carries it.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::catalog::{Catalog, CatalogEntry};
use crate::request::{RequestRecord, Target};

static VERSION_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/v[1-9](\.[0-9]+)?").expect("version pattern is a valid regex"));

/// First `/vN` or `/vN.M` segment in a path or URL
pub fn version_segment(text: &str) -> Option<&str> {
    VERSION_SEGMENT.find(text).map(|m| m.as_str())
}

/// Version segment of a URL's path; the scheme and authority are ignored
pub fn url_version(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => version_segment(parsed.path()).map(str::to_string),
        Err(_) => version_segment(url).map(str::to_string),
    }
}

/// URL patterns derived from a request
#[derive(Debug, Clone)]
pub struct UrlPattern {
    base: String,
    fallback: Regex,
    versioned: Option<Regex>,
}

impl UrlPattern {
    pub fn for_request(request: &RequestRecord) -> crate::Result<Self> {
        let fallback_src = format!(
            "(http|https)://{}:{}",
            regex::escape(&request.host),
            regex::escape(&request.port)
        );
        let versioned = version_segment(&request.path)
            .map(|version| Regex::new(&format!("{}{}", fallback_src, regex::escape(version))))
            .transpose()?;

        Ok(Self {
            base: format!("(http|https)://{}:{}", request.host, request.port),
            fallback: Regex::new(&fallback_src)?,
            versioned,
        })
    }

    /// Human readable form of the fallback pattern, used in diagnostics
    pub fn describe(&self) -> &str {
        &self.base
    }

    pub fn versioned(&self) -> Option<&Regex> {
        self.versioned.as_ref()
    }

    pub fn fallback(&self) -> &Regex {
        &self.fallback
    }
}

/// Public endpoint URLs of `entry` that `pattern` finds
fn matching_urls<'a>(entry: &'a CatalogEntry, pattern: &'a Regex) -> impl Iterator<Item = &'a str> {
    entry
        .endpoints
        .iter()
        .flat_map(|endpoint| endpoint.public_urls())
        .filter(move |url| pattern.is_match(url))
}

impl Catalog {
    /// Entries with at least one public endpoint URL matching `pattern`, in catalog order
    pub fn entries_matching<'a>(&'a self, pattern: &Regex) -> Vec<&'a CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| matching_urls(entry, pattern).next().is_some())
            .collect()
    }

    /// Classify a request.
    ///
    /// The versioned pattern wins when any entry carries it; the first such
    /// entry in catalog order is used. Otherwise the host and port alone are
    /// matched, preferring an entry whose matching URL has no version of its
    /// own, then catalog order. Returns `None` when nothing matches.
    pub fn target_for(&self, request: &RequestRecord) -> crate::Result<Option<Target>> {
        let pattern = UrlPattern::for_request(request)?;
        Ok(self.select(&pattern).map(|entry| Target {
            kind: entry.kind.clone(),
            name: entry.name.clone(),
        }))
    }

    fn select(&self, pattern: &UrlPattern) -> Option<&CatalogEntry> {
        if let Some(versioned) = pattern.versioned() {
            if let Some(entry) = self.entries_matching(versioned).into_iter().next() {
                return Some(entry);
            }
        }

        let candidates = self.entries_matching(pattern.fallback());
        let unversioned = candidates.iter().copied().find(|entry| {
            matching_urls(entry, pattern.fallback()).any(|url| url_version(url).is_none())
        });
        unversioned.or_else(|| candidates.first().copied())
    }
}
