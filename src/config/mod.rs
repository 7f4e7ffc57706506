//! Configuration types for the bridge.
//!
//! - [`BridgeConfig`]: behavior of the builtin façade
//! - [`PluginConfig`]: backend connection settings supplied by the host
//! - [`SchemaPrefix`]: type-name namespace transform

mod bridge;
mod plugin;
mod prefix;

pub use bridge::BridgeConfig;
pub use plugin::PluginConfig;
pub use prefix::SchemaPrefix;
