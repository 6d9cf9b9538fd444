//! Configuration for the scrubbing stage of the report pipeline.
//!
//! The `Config` struct lists which request fields are considered volatile or
//! sensitive. It can be created programmatically (the defaults cover the
//! fields seen in the compute, volume, network and identity integration
//! suites) or loaded from a YAML file.
//!
//! # Examples
//!
//! ```no_run
//! use apicalls_core::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> apicalls_core::Result<()> {
//! // Start from the defaults and add a key
//! let mut config = Config::default();
//! config.sensitive_keys.push("security_group".to_string());
//!
//! // Or load overrides from a config file
//! let config = Config::from_file("apicalls.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Scrubbing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Field names whose values are replaced in queries and bodies
    #[serde(default = "default_sensitive_keys")]
    pub sensitive_keys: Vec<String>,

    /// Literal ids used by tests for resources that never existed
    #[serde(default = "default_fake_resource_ids")]
    pub fake_resource_ids: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensitive_keys: default_sensitive_keys(),
            fake_resource_ids: default_fake_resource_ids(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            crate::Error::config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Reject keys the scrubbing rules cannot use
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(key) = self.sensitive_keys.iter().find(|k| k.trim().is_empty()) {
            return Err(crate::Error::config(format!(
                "sensitive key {:?} must not be blank",
                key
            )));
        }
        if self.fake_resource_ids.iter().any(|id| id.is_empty()) {
            return Err(crate::Error::config("fake resource ids must not be empty"));
        }
        Ok(())
    }
}

fn default_sensitive_keys() -> Vec<String> {
    [
        "user_data",
        "display_description",
        "device",
        "password",
        "fixed_ip",
        "availability_zone",
        "key_name",
        "username",
        "tenantName",
        "name",
        "token",
        "ip_address",
        "device_id",
        "version",
        "floating_ip_address",
        "network_id",
        "description",
        "metadata",
        "address",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_fake_resource_ids() -> Vec<String> {
    vec![
        "non-existing-disk".to_string(),
        "non-existing-vm-id".to_string(),
    ]
}
