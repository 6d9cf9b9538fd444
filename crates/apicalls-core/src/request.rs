//! Request records extracted from `excon.request` log lines.

use serde::{Deserialize, Serialize};

/// The catalog entry a request was classified into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Catalog `type` (e.g. "compute")
    #[serde(rename = "type")]
    pub kind: String,
    /// Catalog `name` (e.g. "nova")
    pub name: String,
}

/// A single intercepted HTTP client call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestRecord {
    /// HTTP method as logged (e.g. "GET")
    pub method: String,
    /// Host the call was sent to
    pub host: String,
    /// Port the call was sent to
    pub port: String,
    /// Request path, without the query string
    pub path: String,
    /// Query rendered as `key=value` pairs joined by `&`
    #[serde(default)]
    pub query: Option<String>,
    /// Request body with escaped quotes restored
    #[serde(default)]
    pub body: Option<String>,
    /// Assigned by the catalog matcher
    #[serde(default)]
    pub target: Option<Target>,
}

impl RequestRecord {
    /// Create a record with no query, body or target
    pub fn new(
        method: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            host: host.into(),
            port: port.into(),
            path: path.into(),
            query: None,
            body: None,
            target: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_target(mut self, target: Option<Target>) -> Self {
        self.target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_record_new() {
        let request = RequestRecord::new("GET", "x", "8774", "/v2/servers");
        assert_eq!(request.method, "GET");
        assert_eq!(request.port, "8774");
        assert!(request.query.is_none());
        assert!(request.body.is_none());
        assert!(request.target.is_none());
    }

    #[test]
    fn test_builders_set_optional_fields() {
        let request = RequestRecord::new("POST", "x", "8774", "/v2/servers")
            .with_query("limit=1")
            .with_body("{}");
        assert_eq!(request.query.as_deref(), Some("limit=1"));
        assert_eq!(request.body.as_deref(), Some("{}"));
    }
}
