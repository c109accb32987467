use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::batch::BatchPolicy;
use crate::error::Result;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "A3S_HOME";

/// Name of the optional config file inside the data root.
pub const CONFIG_FILE: &str = "inspect.yaml";

/// Inspector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Data root holding `boxes.json` and `images/`
    pub root_dir: PathBuf,

    /// How failures across a batch are aggregated
    pub batch_policy: BatchPolicy,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root(),
            batch_policy: BatchPolicy::default(),
        }
    }
}

/// `$A3S_HOME`, else `~/.a3s`.
pub fn default_root() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .map(|h| h.join(".a3s"))
        .unwrap_or_else(|| PathBuf::from(".a3s"))
}

impl InspectConfig {
    /// Load configuration for a data root.
    ///
    /// Reads `<root>/inspect.yaml` when present. The root itself always
    /// wins over any `root_dir` in the file.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_yaml::from_str::<InspectConfig>(&data)?
        } else {
            InspectConfig::default()
        };
        config.root_dir = root.to_path_buf();
        Ok(config)
    }

    /// Load using `root` if given, else the default root.
    pub fn load_or_default(root: Option<&Path>) -> Result<Self> {
        match root {
            Some(root) => Self::load(root),
            None => Self::load(&default_root()),
        }
    }
}
