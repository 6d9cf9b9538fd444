//! Service catalog advertised by the identity service.
//!
//! The catalog is captured from the JSON body of an authentication response.
//! Two response shapes are recognized:
//!
//! - identity v3: `{"token": {"catalog": [...]}}`
//! - identity v2: `{"access": {"serviceCatalog": [...]}}`
//!
//! Entries are kept in the order the identity service listed them, which is
//! the order used to break ties during matching.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Error;

/// A reachable location of a catalog service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Identity v2 public URL
    #[serde(rename = "publicURL", default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    /// Identity v3 URL, qualified by `interface`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Identity v3 interface label ("public", "internal", "admin")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

impl Endpoint {
    /// URLs of this endpoint that count as public for matching
    pub fn public_urls(&self) -> impl Iterator<Item = &str> {
        let v3 = match self.interface.as_deref() {
            Some("public") => self.url.as_deref(),
            _ => None,
        };
        self.public_url.as_deref().into_iter().chain(v3)
    }
}

/// One service in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Service type (e.g. "compute", "volumev2")
    #[serde(rename = "type")]
    pub kind: String,
    /// Service name (e.g. "nova")
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl CatalogEntry {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            endpoints,
        }
    }
}

/// Ordered list of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Extract the catalog from an identity response body.
    ///
    /// Returns `Ok(None)` when the body has neither recognized shape, and an
    /// error when a catalog is present but its entries cannot be read.
    pub fn from_response_body(body: &JsonValue) -> crate::Result<Option<Self>> {
        let raw = ["/token/catalog", "/access/serviceCatalog"]
            .iter()
            .filter_map(|pointer| body.pointer(pointer))
            .find(|value| !value.is_null());

        let Some(raw) = raw else {
            return Ok(None);
        };

        let entries: Vec<CatalogEntry> = serde_json::from_value(raw.clone())
            .map_err(|e| Error::malformed_catalog(format!("unreadable catalog entries: {}", e)))?;
        Ok(Some(Self { entries }))
    }

    /// Entries sorted by type, keeping catalog order between equal types
    pub fn sorted_by_type(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<&CatalogEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.kind.cmp(&b.kind));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
