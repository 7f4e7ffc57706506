//! Plugin configuration as supplied by the host engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SchemaPrefix;
use crate::{Error, error::Result};

/// Connection settings for the SpiceDB backend.
///
/// The host hands these over as the JSON body of the `spicedb` plugin
/// section:
///
/// ```json
/// {"endpoint": "spicedb:50051", "insecure": true, "token": "sk_dev", "schemaprefix": "app/"}
/// ```
///
/// ## Example
///
/// ```rust
/// use rego_spicedb::PluginConfig;
///
/// let config = PluginConfig::parse(br#"{"endpoint": "localhost:50051", "insecure": true}"#)?;
/// assert!(config.insecure);
/// assert_eq!(config.schema_prefix().as_str(), "");
///
/// let config = PluginConfig::builder()
///     .endpoint("grpc.authzed.com:443")
///     .token("tc_secret")
///     .schema_prefix("tenant1/")
///     .build();
/// # Ok::<(), rego_spicedb::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct PluginConfig {
    /// Backend address, `host:port` or a full URI.
    #[builder(into)]
    pub endpoint: String,

    /// Use plaintext instead of TLS.
    #[serde(default)]
    #[builder(default = false)]
    pub insecure: bool,

    /// Bearer token (preshared key) sent with every request.
    #[serde(default)]
    #[builder(into, default)]
    pub token: String,

    /// Prefix applied to every object type.
    #[serde(default, rename = "schemaprefix")]
    #[builder(into, default)]
    pub schema_prefix: String,
}

impl PluginConfig {
    /// Parses and validates the JSON plugin configuration.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let config: PluginConfig = serde_json::from_slice(raw).map_err(|e| {
            Error::configuration(format!("invalid spicedb plugin config: {e}")).with_source(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used to connect.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::configuration("spicedb endpoint cannot be empty"));
        }
        Ok(())
    }

    /// Returns the schema prefix transform.
    pub fn schema_prefix(&self) -> SchemaPrefix {
        SchemaPrefix::new(self.schema_prefix.clone())
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfig")
            .field("endpoint", &self.endpoint)
            .field("insecure", &self.insecure)
            .field("token", &"[REDACTED]")
            .field("schema_prefix", &self.schema_prefix)
            .finish()
    }
}
