//! OCI image reference normalization.
//!
//! Lets a short name such as `nginx` match an image stored as
//! `docker.io/library/nginx:latest`.

use thiserror::Error;

/// Default registry when none is specified.
const DEFAULT_REGISTRY: &str = "docker.io";

/// Default tag when none is specified.
const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("empty image reference")]
    Empty,

    #[error("invalid digest in reference {0:?}: expected algorithm:hex")]
    InvalidDigest(String),

    #[error("empty repository in reference {0:?}")]
    EmptyRepository(String),
}

/// Parsed OCI image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry hostname (e.g., "ghcr.io", "docker.io")
    pub registry: String,
    /// Repository path (e.g., "library/nginx")
    pub repository: String,
    pub tag: Option<String>,
    /// Digest (e.g., "sha256:abc123...")
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse an image reference, filling in the default registry, the
    /// `library/` namespace and the `latest` tag.
    ///
    /// - `nginx` → docker.io/library/nginx:latest
    /// - `myuser/app:v1` → docker.io/myuser/app:v1
    /// - `ghcr.io/org/image@sha256:abc` → ghcr.io/org/image@sha256:abc
    /// - `localhost:5000/app` → localhost:5000/app:latest
    pub fn parse(reference: &str) -> Result<Self, ReferenceError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let (name_tag, digest) = match reference.rsplit_once('@') {
            Some((name, digest)) if digest.contains(':') => (name, Some(digest.to_string())),
            Some(_) => return Err(ReferenceError::InvalidDigest(reference.to_string())),
            None => (reference, None),
        };

        // A tag is a colon after the last slash; `host:5000/app` has none.
        let last_segment_start = name_tag.rfind('/').map(|p| p + 1).unwrap_or(0);
        let (name, tag) = match name_tag[last_segment_start..].rfind(':') {
            Some(colon) => {
                let split = last_segment_start + colon;
                (&name_tag[..split], Some(name_tag[split + 1..].to_string()))
            }
            None => (name_tag, None),
        };

        let (registry, repository) = split_registry(name)?;

        let tag = match (tag, &digest) {
            (None, None) => Some(DEFAULT_TAG.to_string()),
            (tag, _) => tag,
        };

        Ok(Self {
            registry,
            repository,
            tag,
            digest,
        })
    }

    /// Fully-qualified reference string.
    pub fn full_reference(&self) -> String {
        let mut s = format!("{}/{}", self.registry, self.repository);
        if let Some(tag) = &self.tag {
            s.push(':');
            s.push_str(tag);
        }
        if let Some(digest) = &self.digest {
            s.push('@');
            s.push_str(digest);
        }
        s
    }
}

fn split_registry(name: &str) -> Result<(String, String), ReferenceError> {
    if let Some((first, rest)) = name.split_once('/') {
        if first.contains('.') || first.contains(':') || first == "localhost" {
            if rest.is_empty() {
                return Err(ReferenceError::EmptyRepository(name.to_string()));
            }
            return Ok((first.to_string(), rest.to_string()));
        }
        return Ok((DEFAULT_REGISTRY.to_string(), name.to_string()));
    }
    Ok((DEFAULT_REGISTRY.to_string(), format!("library/{name}")))
}

/// Whether two references name the same image once defaults are applied.
pub fn same_image(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (ImageReference::parse(a), ImageReference::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_reference())
    }
}
