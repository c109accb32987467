//! OCI image layout reader.
//!
//! Loads the image index, the first manifest and its configuration blob.
//! Layers are counted but never read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use a3s_inspect_core::StoreError;
use oci_spec::image::{ImageConfiguration, ImageIndex, ImageManifest};
use serde::de::DeserializeOwned;

/// An OCI image loaded from disk.
#[derive(Debug)]
pub struct OciImage {
    config: OciImageConfig,
    layer_count: usize,
}

/// Image configuration fields surfaced by `inspect`.
#[derive(Debug, Clone, Default)]
pub struct OciImageConfig {
    pub architecture: String,
    pub os: String,
    /// RFC 3339 creation time, if recorded
    pub created: Option<String>,
    pub entrypoint: Option<Vec<String>>,
    pub cmd: Option<Vec<String>>,
    /// `KEY=value` pairs, as stored
    pub env: Vec<String>,
    pub working_dir: Option<String>,
    pub user: Option<String>,
    pub exposed_ports: Vec<String>,
    pub labels: HashMap<String, String>,
    pub rootfs_type: String,
    pub diff_ids: Vec<String>,
}

impl OciImage {
    /// Load an OCI image from a directory containing `oci-layout`,
    /// `index.json` and `blobs/`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root_dir = path.as_ref().to_path_buf();
        validate_layout(&root_dir)?;

        let index: ImageIndex = read_json(&root_dir.join("index.json"))?;
        let manifest_digest = index
            .manifests()
            .first()
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "no manifests in {}",
                    root_dir.join("index.json").display()
                ))
            })?
            .digest()
            .to_string();

        let manifest: ImageManifest = read_json(&blob_path(&root_dir, &manifest_digest))?;
        let config_digest = manifest.config().digest().to_string();
        let oci_config: ImageConfiguration = read_json(&blob_path(&root_dir, &config_digest))?;

        Ok(Self {
            config: OciImageConfig::from_oci_config(&oci_config),
            layer_count: manifest.layers().len(),
        })
    }

    pub fn config(&self) -> &OciImageConfig {
        &self.config
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }
}

fn validate_layout(root_dir: &Path) -> Result<(), StoreError> {
    for required in ["oci-layout", "index.json", "blobs"] {
        if !root_dir.join(required).exists() {
            return Err(StoreError::Corrupt(format!(
                "not a valid OCI layout: missing {} in {}",
                required,
                root_dir.display()
            )));
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Corrupt(format!("failed to parse {}: {}", path.display(), e)))
}

/// Digest format: "sha256:abc123..."
fn blob_path(root_dir: &Path, digest: &str) -> PathBuf {
    let (algorithm, hash) = digest.split_once(':').unwrap_or(("sha256", digest));
    root_dir.join("blobs").join(algorithm).join(hash)
}

impl OciImageConfig {
    fn from_oci_config(oci_config: &ImageConfiguration) -> Self {
        let config = oci_config.config();

        Self {
            architecture: oci_config.architecture().to_string(),
            os: oci_config.os().to_string(),
            created: oci_config.created().clone(),
            entrypoint: config.as_ref().and_then(|c| c.entrypoint().clone()),
            cmd: config.as_ref().and_then(|c| c.cmd().clone()),
            env: config
                .as_ref()
                .and_then(|c| c.env().clone())
                .unwrap_or_default(),
            working_dir: config.as_ref().and_then(|c| c.working_dir().clone()),
            user: config.as_ref().and_then(|c| c.user().clone()),
            exposed_ports: config
                .as_ref()
                .and_then(|c| c.exposed_ports().clone())
                .unwrap_or_default(),
            labels: config
                .as_ref()
                .and_then(|c| c.labels().clone())
                .unwrap_or_default(),
            rootfs_type: oci_config.rootfs().typ().clone(),
            diff_ids: oci_config.rootfs().diff_ids().clone(),
        }
    }
}
