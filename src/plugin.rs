//! Lifecycle of the `spicedb` host plugin.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bridge::Bridge;
use crate::client::{ClientAccessor, ConfiguredClient};
use crate::config::{BridgeConfig, PluginConfig};
use crate::error::Result;
use crate::transport::GrpcBackend;

/// Health of the plugin as reported to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PluginState {
    /// Not started, or stopped.
    #[default]
    NotReady,
    /// A backend client is installed.
    Ok,
    /// The last start failed.
    Error,
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginState::NotReady => f.write_str("NOT_READY"),
            PluginState::Ok => f.write_str("OK"),
            PluginState::Error => f.write_str("ERROR"),
        }
    }
}

/// The `spicedb` plugin: owns the connection and installs it into the
/// [`ClientAccessor`] builtins read from.
///
/// Dialing is lazy, so `start` only fails on configuration errors; an
/// unreachable backend shows up as `{"error": "Unavailable", ...}` results.
///
/// ```rust
/// use rego_spicedb::{PluginState, SpiceDbPlugin};
///
/// # tokio_test::block_on(async {
/// let plugin = SpiceDbPlugin::from_json(br#"{"endpoint": "localhost:50051", "insecure": true}"#)?;
/// plugin.start()?;
/// assert_eq!(plugin.state(), PluginState::Ok);
/// assert!(plugin.accessor().is_configured());
///
/// plugin.stop();
/// assert_eq!(plugin.state(), PluginState::NotReady);
/// # Ok::<(), rego_spicedb::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct SpiceDbPlugin {
    accessor: ClientAccessor,
    config: RwLock<PluginConfig>,
    state: RwLock<PluginState>,
}

impl SpiceDbPlugin {
    /// Creates a stopped plugin.
    pub fn new(config: PluginConfig) -> Self {
        Self::with_accessor(config, ClientAccessor::new())
    }

    /// Creates a stopped plugin that installs its client into `accessor`.
    pub fn with_accessor(config: PluginConfig, accessor: ClientAccessor) -> Self {
        Self {
            accessor,
            config: RwLock::new(config),
            state: RwLock::new(PluginState::NotReady),
        }
    }

    /// Creates a stopped plugin from the host's raw JSON configuration.
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        PluginConfig::parse(raw).map(Self::new)
    }

    /// Returns the accessor the plugin installs its client into.
    pub fn accessor(&self) -> &ClientAccessor {
        &self.accessor
    }

    /// Returns a bridge reading from this plugin's accessor.
    pub fn bridge(&self, config: BridgeConfig) -> Bridge {
        Bridge::with_config(self.accessor.clone(), config)
    }

    /// Returns a copy of the active configuration.
    pub fn config(&self) -> PluginConfig {
        self.config.read().clone()
    }

    /// Returns the current state.
    pub fn state(&self) -> PluginState {
        *self.state.read()
    }

    /// Creates the backend client and installs it with the configured
    /// schema prefix.
    ///
    /// On failure any previously installed client is removed, so builtins
    /// fail with `BackendUnavailable` rather than reach a stale endpoint.
    pub fn start(&self) -> Result<()> {
        let config = self.config();
        self.activate(&config)
    }

    fn activate(&self, config: &PluginConfig) -> Result<()> {
        match GrpcBackend::connect_lazy(config) {
            Ok(backend) => {
                self.accessor.install(ConfiguredClient::new(
                    Arc::new(backend),
                    config.schema_prefix(),
                ));
                *self.state.write() = PluginState::Ok;
                tracing::info!(
                    endpoint = %config.endpoint,
                    insecure = config.insecure,
                    schema_prefix = %config.schema_prefix,
                    "spicedb plugin started"
                );
                Ok(())
            },
            Err(err) => {
                self.accessor.clear();
                *self.state.write() = PluginState::Error;
                tracing::warn!(endpoint = %config.endpoint, error = %err, "spicedb plugin failed to start");
                Err(err)
            },
        }
    }

    /// Removes the backend client. Builtins called afterwards fail with
    /// `BackendUnavailable`.
    pub fn stop(&self) {
        self.accessor.clear();
        *self.state.write() = PluginState::NotReady;
        tracing::info!("spicedb plugin stopped");
    }

    /// Applies a new configuration, restarting when anything changed or
    /// the plugin is not running.
    ///
    /// The replacement client and its prefix are installed together, so
    /// concurrent builtin calls see either the old pair or the new one. The
    /// configuration is only committed once its client is installed.
    pub fn reconfigure(&self, config: PluginConfig) -> Result<()> {
        config.validate()?;
        if self.state() == PluginState::Ok && *self.config.read() == config {
            tracing::debug!("spicedb plugin configuration unchanged");
            return Ok(());
        }

        tracing::info!(endpoint = %config.endpoint, "reconfiguring spicedb plugin");
        self.activate(&config)?;
        *self.config.write() = config;
        Ok(())
    }
}
