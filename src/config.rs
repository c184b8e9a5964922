//! Runtime configuration for one bridge instance

use crate::{BridgeError, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use vscode_bridge_proto::RegistryStore;

pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Interface the WebSocket listener binds to
    pub bind_addr: IpAddr,
    /// Listen port; 0 lets the OS pick a free one
    pub port: u16,
    /// Overrides the host's workspace name in the registry entry
    pub workspace_name: Option<String>,
    /// Registry file; defaults to `~/.vscode_instances.json`
    pub registry_path: Option<PathBuf>,
    /// Accept `eval` commands. Trusted local clients only.
    pub allow_eval: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            port: 0,
            workspace_name: None,
            registry_path: None,
            allow_eval: false,
        }
    }
}

impl BridgeConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn registry_store(&self) -> Result<RegistryStore> {
        match &self.registry_path {
            Some(path) => Ok(RegistryStore::new(path.clone())),
            None => Ok(RegistryStore::at_default_path()?),
        }
    }

    /// Reject configurations that expose `eval` beyond the local machine
    pub fn validate(&self) -> Result<()> {
        if self.allow_eval && !self.bind_addr.is_loopback() {
            return Err(BridgeError::ConfigError(format!(
                "eval can only be enabled on a loopback address, not {}",
                self.bind_addr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_local_and_ephemeral() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.listen_addr(),
            "127.0.0.1:0".parse::<SocketAddr>().unwrap()
        );
        assert!(!config.allow_eval);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_eval_requires_loopback() {
        let config = BridgeConfig {
            bind_addr: "0.0.0.0".parse().unwrap(),
            allow_eval: true,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BridgeError::ConfigError(_))));

        let config = BridgeConfig {
            bind_addr: "0.0.0.0".parse().unwrap(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = BridgeConfig {
            bind_addr: "::1".parse().unwrap(),
            allow_eval: true,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_registry_path() {
        let config = BridgeConfig {
            registry_path: Some(PathBuf::from("/tmp/instances.json")),
            ..Default::default()
        };
        let store = config.registry_store().unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/instances.json"));
    }
}
