//! Collaborator traits backing the inspection pipeline.
//!
//! The pipeline never touches storage directly. It resolves identifiers
//! through an [`ObjectStore`], reads metadata through an
//! [`InspectionProvider`] and reads persisted artifacts through an
//! [`ArtifactStore`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{LookupError, StoreError};

/// Reference to a container held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    /// Full container ID
    pub id: String,
    /// Container name
    pub name: String,
}

/// Reference to an image held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// Image ID (content digest)
    pub id: String,
    /// Reference the image was stored under
    pub reference: String,
}

/// An identifier resolved to a concrete object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntity {
    Container(ContainerHandle),
    Image(ImageHandle),
}

impl ResolvedEntity {
    pub fn id(&self) -> &str {
        match self {
            ResolvedEntity::Container(c) => &c.id,
            ResolvedEntity::Image(i) => &i.id,
        }
    }
}

/// Name/ID lookups against the container and image stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Find a container by name, ID, or unique ID prefix.
    async fn lookup_container(&self, query: &str) -> Result<ContainerHandle, LookupError>;

    /// Find an image by reference, digest, or unique digest prefix.
    async fn lookup_image(&self, query: &str) -> Result<ImageHandle, LookupError>;

    /// ID of the most recently created container.
    async fn latest_container_id(&self) -> Result<String, LookupError>;
}

/// Live metadata for resolved objects.
#[async_trait]
pub trait InspectionProvider: Send + Sync {
    /// Live container state. Size accounting is only computed when asked.
    async fn container_inspect(
        &self,
        handle: &ContainerHandle,
        include_size: bool,
    ) -> Result<Value, StoreError>;

    async fn image_inspect(&self, handle: &ImageHandle) -> Result<Value, StoreError>;
}

/// Blobs persisted alongside a container at creation time.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn get_artifact(&self, handle: &ContainerHandle, key: &str)
        -> Result<Vec<u8>, StoreError>;
}
