//! Read-only view of the on-disk OCI image store.
//!
//! The store directory holds an `index.json` listing every stored image
//! and, per image, an OCI layout directory under `sha256/<digest>/`.

use std::path::{Path, PathBuf};

use a3s_inspect_core::{LookupError, ObjectKind, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::reference::same_image;

/// Metadata for a stored OCI image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredImage {
    /// Image reference string (e.g., "ghcr.io/a3s-box/code:v0.1.0")
    pub reference: String,
    /// Content digest (e.g., "sha256:abc123...")
    pub digest: String,
    /// Total size in bytes
    pub size_bytes: u64,
    /// When the image was pulled
    pub pulled_at: DateTime<Utc>,
    /// Path to the OCI image layout on disk
    pub path: PathBuf,
}

impl StoredImage {
    /// Digest without the algorithm prefix.
    pub fn digest_hex(&self) -> &str {
        self.digest
            .split_once(':')
            .map(|(_, hex)| hex)
            .unwrap_or(&self.digest)
    }
}

/// Persistent index stored as JSON on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreIndex {
    pub images: Vec<StoredImage>,
}

/// Image index loaded once per invocation.
#[derive(Debug)]
pub struct ImageStore {
    images: Vec<StoredImage>,
}

impl ImageStore {
    /// Load the index under `store_dir`. A missing index is an empty store.
    pub fn load(store_dir: &Path) -> Result<Self, StoreError> {
        let index_path = store_dir.join("index.json");
        let images = if index_path.exists() {
            let data = std::fs::read_to_string(&index_path)?;
            let index: StoreIndex = serde_json::from_str(&data).map_err(|e| {
                StoreError::Corrupt(format!("failed to parse image store index: {e}"))
            })?;
            index
                .images
                .into_iter()
                .filter(|image| {
                    let present = image.path.exists();
                    if !present {
                        warn!(reference = %image.reference, path = %image.path.display(), "skipping image with missing directory");
                    }
                    present
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self { images })
    }

    /// Find an image by reference, digest, or unique digest prefix.
    ///
    /// Matches in order:
    /// 1. Exact reference
    /// 2. Same reference once default registry/tag are applied
    /// 3. Exact digest (with or without `sha256:`)
    /// 4. Unique digest prefix
    pub fn find(&self, query: &str) -> Result<&StoredImage, LookupError> {
        if let Some(image) = self.images.iter().find(|i| i.reference == query) {
            return Ok(image);
        }
        if let Some(image) = self.images.iter().find(|i| same_image(&i.reference, query)) {
            return Ok(image);
        }
        if let Some(image) = self
            .images
            .iter()
            .find(|i| i.digest == query || i.digest_hex() == query)
        {
            return Ok(image);
        }

        let prefix = query.strip_prefix("sha256:").unwrap_or(query);
        let is_hex = !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_hexdigit());
        let matches: Vec<&StoredImage> = if is_hex {
            self.images
                .iter()
                .filter(|i| i.digest_hex().starts_with(prefix))
                .collect()
        } else {
            Vec::new()
        };

        match matches.len() {
            0 => Err(LookupError::NotFound {
                kind: ObjectKind::Image,
                query: query.to_string(),
            }),
            1 => Ok(matches[0]),
            // several tags of one image
            _ if matches.iter().all(|i| i.digest == matches[0].digest) => Ok(matches[0]),
            n => Err(LookupError::Ambiguous {
                kind: ObjectKind::Image,
                query: query.to_string(),
                count: n,
            }),
        }
    }

    /// Find an image by its digest.
    pub fn get_by_digest(&self, digest: &str) -> Option<&StoredImage> {
        self.images.iter().find(|i| i.digest == digest)
    }

    /// All references pointing at a digest.
    pub fn tags_for(&self, digest: &str) -> Vec<String> {
        self.images
            .iter()
            .filter(|i| i.digest == digest)
            .map(|i| i.reference.clone())
            .collect()
    }

    pub fn list(&self) -> &[StoredImage] {
        &self.images
    }
}
