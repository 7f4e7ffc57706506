//! Bridge behavior configuration.

use std::time::Duration;

/// Configuration for the builtin façade.
///
/// ## Example
///
/// ```rust
/// use rego_spicedb::BridgeConfig;
/// use std::time::Duration;
///
/// let config = BridgeConfig::builder()
///     .default_timeout(Duration::from_secs(2))
///     .build();
/// assert!(!config.cache_deletes);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct BridgeConfig {
    /// Whether successful `delete_relationships` results are cached.
    ///
    /// Off by default: deletes are mutations, and a cached result would
    /// skip the second delete entirely.
    #[builder(default = false)]
    pub cache_deletes: bool,

    /// Deadline applied to calls whose context carries none.
    pub default_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
