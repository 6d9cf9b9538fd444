//! Line scanner for excon debug logs.
//!
//! The scanner walks the log once, in order, and recognizes two kinds of
//! lines: the identity response that carries the service catalog, and the
//! request lines that describe each HTTP call. Everything else is skipped.
//!
//! A request line looks like this (wrapped for readability):
//!
//! ```text
//! excon.request GET http://x:8774/v2/1234/servers params: {"host":"x",
//!     "query":{"limit":1},"method":"get"} body: {\"server\":{...}}
//! ```
//!
//! The recognized shapes are listed in [`LinePattern`] so each can be tested
//! on its own.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::catalog::Catalog;
use crate::request::RequestRecord;
use crate::Error;

/// Line shapes and sub-shapes recognized by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinePattern {
    /// Identity response mentioning a catalog
    CatalogResponse,
    /// Any `excon.request` line; captures the request descriptor
    Request,
    /// `METHOD scheme://host:port/path params:` at the start of a descriptor
    Descriptor,
    /// `"host":"..."` inside the request params
    Host,
    /// `"query":{...},` inside the request params
    Query,
    /// `body: {...}` payload of a request or response
    Body,
}

static CATALOG_RESPONSE: Lazy<Regex> = Lazy::new(|| compile(LinePattern::CatalogResponse));
static REQUEST: Lazy<Regex> = Lazy::new(|| compile(LinePattern::Request));
static DESCRIPTOR: Lazy<Regex> = Lazy::new(|| compile(LinePattern::Descriptor));
static HOST: Lazy<Regex> = Lazy::new(|| compile(LinePattern::Host));
static QUERY: Lazy<Regex> = Lazy::new(|| compile(LinePattern::Query));
static BODY: Lazy<Regex> = Lazy::new(|| compile(LinePattern::Body));

fn compile(pattern: LinePattern) -> Regex {
    Regex::new(pattern.as_str()).expect("line patterns are valid regexes")
}

impl LinePattern {
    /// Regex source for this shape
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogResponse => r"excon\.response .*?(catalog|serviceCatalog)",
            Self::Request => r"^.*excon\.request (?P<descriptor>.*)$",
            Self::Descriptor => r"^(?P<method>\w+) .*?://.*?:(?P<port>\d+)(?P<path>.*?) params:",
            Self::Host => r#""host":"(?P<host>[^"]*)""#,
            Self::Query => r#""query":(?P<query>\{.*?\}),"#,
            Self::Body => r"body: (?P<body>\{.*\})",
        }
    }

    /// Compiled regex for this shape
    pub fn regex(&self) -> &'static Regex {
        match self {
            Self::CatalogResponse => &CATALOG_RESPONSE,
            Self::Request => &REQUEST,
            Self::Descriptor => &DESCRIPTOR,
            Self::Host => &HOST,
            Self::Query => &QUERY,
            Self::Body => &BODY,
        }
    }

    /// Returns an iterator over all recognized shapes
    pub fn all() -> impl Iterator<Item = Self> {
        use LinePattern::*;
        [CatalogResponse, Request, Descriptor, Host, Query, Body]
            .iter()
            .copied()
    }

    fn capture<'a>(&self, haystack: &'a str, group: &str) -> Option<&'a str> {
        self.regex()
            .captures(haystack)
            .and_then(|caps| caps.name(group))
            .map(|m| m.as_str())
    }
}

/// What a single line contributed
#[derive(Debug, Default)]
pub struct ScannedLine {
    pub catalog: Option<Catalog>,
    pub request: Option<RequestRecord>,
}

/// Everything the scanner collected from the log
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub catalog: Option<Catalog>,
    pub requests: Vec<RequestRecord>,
}

impl ScanOutput {
    /// Split into catalog and requests, failing when no catalog was captured
    pub fn require_catalog(self) -> crate::Result<(Catalog, Vec<RequestRecord>)> {
        match self.catalog {
            Some(catalog) => Ok((catalog, self.requests)),
            None => Err(Error::NoCatalog),
        }
    }
}

/// Scan all lines in order.
///
/// The first catalog captured wins; later catalog lines are not parsed.
pub fn scan<I, S>(lines: I) -> crate::Result<ScanOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = ScanOutput::default();
    for (index, line) in lines.into_iter().enumerate() {
        let scanned = scan_line(line.as_ref(), output.catalog.is_none())?;
        if let Some(catalog) = scanned.catalog {
            if catalog.is_empty() {
                log::warn!("Catalog on line {} lists no services", index + 1);
            }
            log::debug!(
                "Captured catalog with {} entries from line {}",
                catalog.len(),
                index + 1
            );
            output.catalog = Some(catalog);
        }
        if let Some(request) = scanned.request {
            output.requests.push(request);
        }
    }
    log::debug!("Scanned {} request lines", output.requests.len());
    Ok(output)
}

/// Scan one line. `catalog_open` is false once a catalog has been captured.
pub fn scan_line(line: &str, catalog_open: bool) -> crate::Result<ScannedLine> {
    let mut scanned = ScannedLine::default();

    if catalog_open && LinePattern::CatalogResponse.regex().is_match(line) {
        scanned.catalog = parse_catalog_line(line)?;
    }

    if let Some(descriptor) = LinePattern::Request.capture(line, "descriptor") {
        scanned.request = parse_request(descriptor);
    }

    Ok(scanned)
}

fn parse_catalog_line(line: &str) -> crate::Result<Option<Catalog>> {
    let body = LinePattern::Body
        .capture(line, "body")
        .ok_or_else(|| Error::malformed_catalog("catalog response line has no body payload"))?;
    let json: JsonValue = serde_json::from_str(&unescape_double_quote(body))
        .map_err(|e| Error::malformed_catalog(format!("catalog response body is not JSON: {}", e)))?;
    Catalog::from_response_body(&json)
}

fn parse_request(descriptor: &str) -> Option<RequestRecord> {
    let Some(caps) = LinePattern::Descriptor.regex().captures(descriptor) else {
        log::debug!("Skipping request line without a descriptor: {}", descriptor);
        return None;
    };
    let Some(host) = LinePattern::Host.capture(descriptor, "host") else {
        log::debug!("Skipping request line without a host: {}", descriptor);
        return None;
    };

    let mut request = RequestRecord::new(&caps["method"], host, &caps["port"], &caps["path"]);

    if let Some(raw) = LinePattern::Query.capture(descriptor, "query") {
        match query_string(raw) {
            Ok(query) => request.query = query,
            Err(e) => {
                log::warn!("Skipping request with unreadable query {}: {}", raw, e);
                return None;
            }
        }
    }

    if let Some(body) = LinePattern::Body.capture(descriptor, "body") {
        request.body = Some(unescape_double_quote(body));
    }

    Some(request)
}

/// Render a logged query object as `key=value` pairs joined by `&`.
///
/// `{}` renders as no query at all. Keys keep their logged order.
pub fn query_string(raw: &str) -> crate::Result<Option<String>> {
    if raw == "{}" {
        return Ok(None);
    }
    let parsed: JsonValue = serde_json::from_str(&unescape_double_quote(raw))?;
    let JsonValue::Object(map) = parsed else {
        return Err(Error::malformed_query(format!("not an object: {}", raw)));
    };

    let pairs: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("{}={}", key, query_value(value)))
        .collect();
    Ok(Some(pairs.join("&")))
}

fn query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => inspect(other),
    }
}

/// Nested values read the way the client logged its query hash:
/// `{"k"=>"v", "n"=>1}`, `["a", "b"]`, `nil`
fn inspect(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "nil".to_string(),
        JsonValue::Object(map) => {
            let pairs: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}=>{}", JsonValue::from(key.as_str()), inspect(value)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
        JsonValue::Array(items) => {
            let items: Vec<String> = items.iter().map(inspect).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

/// Restore `\"` to `"`
pub fn unescape_double_quote(s: &str) -> String {
    s.replace("\\\"", "\"")
}
