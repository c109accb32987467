//! Local runtime backed by the on-disk data root.
//!
//! ```text
//!  <root>/
//!  ├── boxes.json             (container records)
//!  ├── boxes/<id>/
//!  │   ├── artifacts/<key>    (blobs persisted at creation)
//!  │   ├── rootfs/
//!  │   └── rw/
//!  └── images/                (OCI image store)
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use a3s_inspect_core::{
    ArtifactStore, ContainerHandle, ImageHandle, InspectionProvider, LookupError, ObjectStore,
    StoreError,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::fs::{dir_size, MountPoint};
use crate::oci::{ImageStore, OciImage};
use crate::state::{ContainerRecord, StateFile};

/// Name of the container state file inside the data root.
pub const STATE_FILE: &str = "boxes.json";

/// Name of the image store directory inside the data root.
pub const IMAGES_DIR: &str = "images";

/// Storage driver reported for every container.
pub const DRIVER: &str = "a3s";

/// Reported for timestamps that were never set.
const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Read-only view of containers, images and artifacts under one data root.
#[derive(Debug)]
pub struct LocalRuntime {
    state: StateFile,
    images: ImageStore,
}

impl LocalRuntime {
    /// Load container state and the image index under `root`.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let state = StateFile::load(&root.join(STATE_FILE))?;
        let images = ImageStore::load(&root.join(IMAGES_DIR))?;
        debug!(
            root = %root.display(),
            containers = state.records().len(),
            images = images.list().len(),
            "Opened local runtime"
        );
        Ok(Self {
            state,
            images,
        })
    }

    fn record(&self, handle: &ContainerHandle) -> Result<&ContainerRecord, StoreError> {
        self.state
            .find_by_id(&handle.id)
            .ok_or_else(|| StoreError::NotFound(format!("container {}", handle.id)))
    }

    /// Image ID for a container, falling back to the store when the record
    /// predates `image_id`.
    fn image_id_for(&self, record: &ContainerRecord) -> String {
        if !record.image_id.is_empty() {
            return record.image_id.clone();
        }
        match self.images.find(&record.image) {
            Ok(image) => image.digest.clone(),
            Err(e) => {
                debug!(image = %record.image, error = %e, "Image of container not in store");
                String::new()
            }
        }
    }

    fn container_value(&self, record: &ContainerRecord, include_size: bool) -> Value {
        let image_id = self.image_id_for(record);
        let (path, args) = match record.cmd.split_first() {
            Some((path, args)) => (path.clone(), args.to_vec()),
            None => (String::new(), Vec::new()),
        };

        let mounts: Vec<Value> = record
            .volumes
            .iter()
            .filter_map(|spec| {
                let mount = MountPoint::parse(spec);
                if mount.is_none() {
                    warn!(id = %record.id, volume = %spec, "Ignoring malformed volume spec");
                }
                mount
            })
            .map(|m| m.to_inspect_value())
            .collect();

        let mut value = json!({
            "ID": record.id,
            "Created": record.created_at.to_rfc3339(),
            "Path": path,
            "Args": args,
            "State": {
                "Status": record.status,
                "Running": record.status == "running",
                "Paused": record.status == "paused",
                "Dead": record.status == "dead",
                "Pid": record.pid.unwrap_or(0),
                "StartedAt": record
                    .started_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| ZERO_TIME.to_string()),
            },
            "Image": record.image,
            "ImageID": image_id,
            "ImageName": record.image,
            "Name": record.name,
            "RestartCount": record.restart_count,
            "Driver": DRIVER,
            "Mounts": mounts,
        });

        if include_size {
            let size_rw = dir_size(&record.box_dir.join("rw"));
            let size_rootfs = dir_size(&record.box_dir.join("rootfs")) + size_rw;
            if let Value::Object(map) = &mut value {
                map.insert("SizeRw".to_string(), json!(size_rw));
                map.insert("SizeRootFs".to_string(), json!(size_rootfs));
            }
        }

        value
    }
}

#[async_trait]
impl ObjectStore for LocalRuntime {
    async fn lookup_container(&self, query: &str) -> Result<ContainerHandle, LookupError> {
        let record = self.state.resolve(query)?;
        Ok(ContainerHandle {
            id: record.id.clone(),
            name: record.name.clone(),
        })
    }

    async fn lookup_image(&self, query: &str) -> Result<ImageHandle, LookupError> {
        let image = self.images.find(query)?;
        Ok(ImageHandle {
            id: image.digest.clone(),
            reference: image.reference.clone(),
        })
    }

    async fn latest_container_id(&self) -> Result<String, LookupError> {
        self.state
            .latest()
            .map(|r| r.id.clone())
            .ok_or(LookupError::NoneExists)
    }
}

#[async_trait]
impl InspectionProvider for LocalRuntime {
    async fn container_inspect(
        &self,
        handle: &ContainerHandle,
        include_size: bool,
    ) -> Result<Value, StoreError> {
        let record = self.record(handle)?;
        Ok(self.container_value(record, include_size))
    }

    async fn image_inspect(&self, handle: &ImageHandle) -> Result<Value, StoreError> {
        let stored = self
            .images
            .get_by_digest(&handle.id)
            .ok_or_else(|| StoreError::NotFound(format!("image {}", handle.id)))?;
        let image = OciImage::from_path(&stored.path)?;
        let config = image.config();

        let exposed_ports: Map<String, Value> = config
            .exposed_ports
            .iter()
            .map(|port| (port.clone(), json!({})))
            .collect();
        let labels: BTreeMap<&String, &String> = config.labels.iter().collect();

        Ok(json!({
            "ID": stored.digest,
            "Digest": stored.digest,
            "RepoTags": self.images.tags_for(&stored.digest),
            "Created": config
                .created
                .clone()
                .unwrap_or_else(|| stored.pulled_at.to_rfc3339()),
            "Architecture": config.architecture,
            "Os": config.os,
            "Size": stored.size_bytes,
            "Config": {
                "Entrypoint": config.entrypoint,
                "Cmd": config.cmd,
                "Env": config.env,
                "WorkingDir": config.working_dir.clone().unwrap_or_default(),
                "User": config.user.clone().unwrap_or_default(),
                "ExposedPorts": exposed_ports,
                "Labels": labels,
            },
            "RootFS": {
                "Type": config.rootfs_type,
                "Layers": config.diff_ids,
            },
            "LayerCount": image.layer_count(),
        }))
    }
}

#[async_trait]
impl ArtifactStore for LocalRuntime {
    async fn get_artifact(
        &self,
        handle: &ContainerHandle,
        key: &str,
    ) -> Result<Vec<u8>, StoreError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let record = self.record(handle)?;
        let path = record.artifacts_dir().join(key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(
                format!("artifact {key} for container {}", handle.id),
            )),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
