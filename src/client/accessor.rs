//! Shared handle to the configured backend client.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SchemaPrefix;
use crate::transport::PermissionBackendClient;
use crate::{Error, error::Result};

/// A backend client together with the schema prefix it was configured with.
///
/// Both are installed and replaced as one unit so a call never pairs a
/// client with another configuration's prefix.
#[derive(Clone)]
pub struct ConfiguredClient {
    client: Arc<dyn PermissionBackendClient>,
    prefix: SchemaPrefix,
}

impl ConfiguredClient {
    /// Bundles a client with its schema prefix.
    pub fn new(client: Arc<dyn PermissionBackendClient>, prefix: SchemaPrefix) -> Self {
        Self { client, prefix }
    }

    /// Returns the backend client.
    #[inline]
    pub fn client(&self) -> &dyn PermissionBackendClient {
        self.client.as_ref()
    }

    /// Returns the schema prefix.
    #[inline]
    pub fn prefix(&self) -> &SchemaPrefix {
        &self.prefix
    }
}

impl fmt::Debug for ConfiguredClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredClient")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Process-wide access point to the backend client.
///
/// The handle is absent until the plugin configures a backend, and becomes
/// absent again when the plugin stops. Clones share the same slot.
///
/// ```rust
/// use rego_spicedb::{ClientAccessor, ErrorKind};
///
/// let accessor = ClientAccessor::new();
/// assert!(accessor.get().is_none());
/// assert_eq!(accessor.require().unwrap_err().kind(), ErrorKind::BackendUnavailable);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientAccessor {
    slot: Arc<Mutex<Option<ConfiguredClient>>>,
}

impl ClientAccessor {
    /// Creates an accessor with no client installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accessor with `client` already installed.
    pub fn with_client(client: ConfiguredClient) -> Self {
        let accessor = Self::new();
        accessor.install(client);
        accessor
    }

    /// Returns the current client, if one is configured.
    pub fn get(&self) -> Option<ConfiguredClient> {
        self.slot.lock().clone()
    }

    /// Returns the current client or a `BackendUnavailable` error.
    pub fn require(&self) -> Result<ConfiguredClient> {
        self.get().ok_or_else(Error::backend_unavailable)
    }

    /// Installs a client, returning the one it replaces.
    pub fn install(&self, client: ConfiguredClient) -> Option<ConfiguredClient> {
        self.slot.lock().replace(client)
    }

    /// Removes the installed client.
    pub fn clear(&self) -> Option<ConfiguredClient> {
        self.slot.lock().take()
    }

    /// Returns `true` if a client is installed.
    pub fn is_configured(&self) -> bool {
        self.slot.lock().is_some()
    }
}
