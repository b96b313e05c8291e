use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use cache22_store::{IsolationMode, Limits, Lookup, Namespace, NamespaceHandle};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 12049;

/// Pending connections the listener queues.
pub const DEFAULT_BACKLOG: u32 = 20;

/// Server settings. Every field has a default, so a TOML file only needs
/// the ones it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub backlog: u32,
    pub isolation: IsolationMode,
    pub lookup: Lookup,
    pub limits: Limits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            backlog: DEFAULT_BACKLOG,
            isolation: IsolationMode::default(),
            lookup: Lookup::default(),
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let fail = |e: &dyn std::fmt::Display| ServerError::Config(format!("{}: {e}", path.display()));
        let text = std::fs::read_to_string(path).map_err(|e| fail(&e))?;
        toml::from_str(&text).map_err(|e| fail(&e))
    }

    /// An empty namespace with this config's lookup strategy and limits.
    pub fn empty_namespace(&self) -> Namespace {
        Namespace::with_config(self.lookup, self.limits.clone())
    }

    /// Wrap `namespace` in a handle for this config's isolation mode.
    pub fn handle_for(&self, namespace: Namespace) -> NamespaceHandle {
        NamespaceHandle::new(namespace, self.isolation)
    }
}
