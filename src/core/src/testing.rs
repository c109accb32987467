//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::create_config::{CreateConfig, CREATE_CONFIG_KEY};
use crate::error::{LookupError, StoreError};
use crate::kind::ObjectKind;
use crate::provider::{
    ArtifactStore, ContainerHandle, ImageHandle, InspectionProvider, ObjectStore,
};

/// Containers are named `<name>` with ID `id-<name>`; images are referenced
/// as `<reference>` with ID `sha256:<reference>`.
#[derive(Default)]
pub(crate) struct FakeStore {
    containers: Vec<String>,
    images: Vec<String>,
    failing_inspect: HashSet<String>,
    artifacts: HashMap<String, Option<Vec<u8>>>,
    container_lookups: AtomicUsize,
    image_lookups: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_container(mut self, name: &str) -> Self {
        self.containers.push(name.to_string());
        self
    }

    pub(crate) fn with_image(mut self, reference: &str) -> Self {
        self.images.push(reference.to_string());
        self
    }

    pub(crate) fn with_failing_inspect(mut self, name: &str) -> Self {
        self.failing_inspect.insert(name.to_string());
        self
    }

    pub(crate) fn with_artifact(mut self, name: &str, bytes: &[u8]) -> Self {
        self.artifacts.insert(name.to_string(), Some(bytes.to_vec()));
        self
    }

    pub(crate) fn without_artifact(mut self, name: &str) -> Self {
        self.artifacts.insert(name.to_string(), None);
        self
    }

    pub(crate) fn container_lookups(&self) -> usize {
        self.container_lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn image_lookups(&self) -> usize {
        self.image_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn lookup_container(&self, query: &str) -> Result<ContainerHandle, LookupError> {
        self.container_lookups.fetch_add(1, Ordering::SeqCst);
        self.containers
            .iter()
            .find(|name| name.as_str() == query || format!("id-{name}") == query)
            .map(|name| ContainerHandle {
                id: format!("id-{name}"),
                name: name.clone(),
            })
            .ok_or_else(|| LookupError::NotFound {
                kind: ObjectKind::Container,
                query: query.to_string(),
            })
    }

    async fn lookup_image(&self, query: &str) -> Result<ImageHandle, LookupError> {
        self.image_lookups.fetch_add(1, Ordering::SeqCst);
        self.images
            .iter()
            .find(|reference| reference.as_str() == query)
            .map(|reference| ImageHandle {
                id: format!("sha256:{reference}"),
                reference: reference.clone(),
            })
            .ok_or_else(|| LookupError::NotFound {
                kind: ObjectKind::Image,
                query: query.to_string(),
            })
    }

    async fn latest_container_id(&self) -> Result<String, LookupError> {
        self.containers
            .last()
            .map(|name| format!("id-{name}"))
            .ok_or(LookupError::NoneExists)
    }
}

#[async_trait]
impl InspectionProvider for FakeStore {
    async fn container_inspect(
        &self,
        handle: &ContainerHandle,
        include_size: bool,
    ) -> Result<Value, StoreError> {
        if self.failing_inspect.contains(&handle.name) {
            return Err(StoreError::NotFound(handle.id.clone()));
        }
        let mut value = json!({
            "ID": handle.id,
            "Name": handle.name,
            "Image": "base:latest",
            "ImageID": "sha256:base",
            "State": { "Status": "running" },
        });
        if include_size {
            value["SizeRw"] = json!(0);
            value["SizeRootFs"] = json!(4096);
        }
        Ok(value)
    }

    async fn image_inspect(&self, handle: &ImageHandle) -> Result<Value, StoreError> {
        Ok(json!({
            "ID": handle.id,
            "RepoTags": [handle.reference],
        }))
    }
}

#[async_trait]
impl ArtifactStore for FakeStore {
    async fn get_artifact(
        &self,
        handle: &ContainerHandle,
        key: &str,
    ) -> Result<Vec<u8>, StoreError> {
        if key != CREATE_CONFIG_KEY {
            return Err(StoreError::NotFound(key.to_string()));
        }
        match self.artifacts.get(&handle.name) {
            Some(Some(bytes)) => Ok(bytes.clone()),
            Some(None) => Err(StoreError::NotFound(key.to_string())),
            None => {
                let config = CreateConfig {
                    name: handle.name.clone(),
                    image: "base:latest".to_string(),
                    image_id: "sha256:base".to_string(),
                    command: vec!["sh".to_string()],
                    ..Default::default()
                };
                Ok(serde_json::to_vec(&config)?)
            }
        }
    }
}
