//! Creation configuration persisted as the `create-config` artifact.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Artifact key under which the creation configuration is stored.
pub const CREATE_CONFIG_KEY: &str = "create-config";

/// Configuration a container was created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateConfig {
    pub name: String,
    /// Image reference as given by the user
    pub image: String,
    pub image_id: String,
    pub command: Vec<String>,
    pub entrypoint: Option<Vec<String>>,
    /// `KEY=value` pairs
    pub env: Vec<String>,
    pub labels: HashMap<String, String>,
    pub work_dir: Option<String>,
    pub user: Option<String>,
    pub hostname: Option<String>,
    pub tty: bool,
    pub stdin_open: bool,
    pub stop_signal: Option<String>,
    /// e.g. `80/tcp`
    pub exposed_ports: Vec<String>,
    /// `host:container` port mappings
    pub port_bindings: Vec<String>,
    /// `host:guest` volume mounts
    pub volumes: Vec<String>,
    pub network_mode: Option<String>,
    pub restart_policy: Option<String>,
    pub resources: ResourceConfig,
}

/// Resource limits requested at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub cpus: Option<u32>,
    pub memory_mb: Option<u32>,
}

impl CreateConfig {
    /// Decode the artifact bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_document() {
        let cfg = CreateConfig::from_slice(br#"{"name":"web","image":"nginx:latest","tty":true}"#)
            .unwrap();
        assert_eq!(cfg.name, "web");
        assert_eq!(cfg.image, "nginx:latest");
        assert!(cfg.tty);
        assert!(cfg.env.is_empty());
        assert_eq!(cfg.resources, ResourceConfig::default());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(CreateConfig::from_slice(b"not json").is_err());
    }
}
