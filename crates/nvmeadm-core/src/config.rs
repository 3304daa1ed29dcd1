//! Client configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::firmware::DEFAULT_XFER;

fn default_socket_path() -> String {
    "/var/tmp/nvmeadm.sock".to_string()
}

fn default_xfer() -> usize {
    DEFAULT_XFER
}

/// Connection and transfer defaults, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Path of the daemon's JSON-RPC unix socket.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Default controller name, used when the command line omits one.
    pub controller: Option<String>,
    /// Per-command transfer limit for firmware downloads.
    #[serde(default = "default_xfer")]
    pub xfer: usize,
    /// Command timeout in milliseconds; if 0 or unset, don't track
    /// timeout.
    pub timeout_ms: Option<u64>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            controller: None,
            xfer: default_xfer(),
            timeout_ms: None,
        }
    }
}

impl RpcConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RpcConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Socket timeout as a `Duration`, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            None | Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RpcConfig::default();
        assert_eq!(config.socket_path, "/var/tmp/nvmeadm.sock");
        assert_eq!(config.xfer, DEFAULT_XFER);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_timeout_zero_disables_tracking() {
        let config = RpcConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);

        let config = RpcConfig {
            timeout_ms: Some(1500),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RpcConfig {
            socket_path: "/run/daemon.sock".into(),
            controller: Some("Nvme0".into()),
            xfer: 8192,
            timeout_ms: Some(2000),
        };
        let path = std::env::temp_dir().join(format!("nvmeadm-config-{}.toml", std::process::id()));
        config.save_to_file(&path).unwrap();
        let loaded = RpcConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.socket_path, "/run/daemon.sock");
        assert_eq!(loaded.controller.as_deref(), Some("Nvme0"));
        assert_eq!(loaded.xfer, 8192);
        assert_eq!(loaded.timeout_ms, Some(2000));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RpcConfig = toml::from_str("controller = \"Nvme1\"").unwrap();
        assert_eq!(config.socket_path, "/var/tmp/nvmeadm.sock");
        assert_eq!(config.xfer, DEFAULT_XFER);
        assert_eq!(config.controller.as_deref(), Some("Nvme1"));
    }
}
