//! Metadata retrieval for resolved objects.
//!
//! Images are a single inspect call. Containers combine live state with
//! the configuration recorded at creation time: the live record is kept
//! as-is and `Config` / `HostConfig` sections derived from the creation
//! configuration are added to it.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::create_config::{CreateConfig, CREATE_CONFIG_KEY};
use crate::error::{FetchStage, InspectError, Result};
use crate::provider::{ArtifactStore, ContainerHandle, InspectionProvider, ResolvedEntity};
use crate::record::InspectionRecord;

/// Source of the decoded creation configuration for a container.
#[async_trait]
pub trait CreationConfigSource: Send + Sync {
    async fn creation_config(&self, handle: &ContainerHandle) -> Result<CreateConfig>;
}

/// Reads the `create-config` artifact and decodes it as JSON.
pub struct ArtifactDecoder<'a> {
    artifacts: &'a dyn ArtifactStore,
}

impl<'a> ArtifactDecoder<'a> {
    pub fn new(artifacts: &'a dyn ArtifactStore) -> Self {
        Self { artifacts }
    }
}

#[async_trait]
impl CreationConfigSource for ArtifactDecoder<'_> {
    async fn creation_config(&self, handle: &ContainerHandle) -> Result<CreateConfig> {
        let bytes = self
            .artifacts
            .get_artifact(handle, CREATE_CONFIG_KEY)
            .await
            .map_err(|e| fetch_error(FetchStage::Artifact, &handle.id, e))?;

        CreateConfig::from_slice(&bytes).map_err(|e| fetch_error(FetchStage::Decode, &handle.id, e))
    }
}

fn fetch_error(stage: FetchStage, id: &str, err: impl std::fmt::Display) -> InspectError {
    InspectError::FetchFailed {
        stage,
        id: id.to_string(),
        message: err.to_string(),
    }
}

/// Retrieve the inspection record for a resolved object.
pub async fn fetch(
    entity: &ResolvedEntity,
    include_size: bool,
    provider: &dyn InspectionProvider,
    creation: &dyn CreationConfigSource,
) -> Result<InspectionRecord> {
    match entity {
        ResolvedEntity::Container(handle) => {
            debug!(id = %handle.id, include_size, "inspecting container");
            let live = provider
                .container_inspect(handle, include_size)
                .await
                .map_err(|e| fetch_error(FetchStage::ContainerInspect, &handle.id, e))?;
            let config = creation.creation_config(handle).await?;
            merge_container_record(&handle.id, live, &config)
        }
        ResolvedEntity::Image(handle) => {
            debug!(id = %handle.id, "inspecting image");
            provider
                .image_inspect(handle)
                .await
                .map(InspectionRecord::new)
                .map_err(|e| fetch_error(FetchStage::ImageInspect, &handle.id, e))
        }
    }
}

/// Combine live container state with its creation configuration.
pub fn merge_container_record(
    id: &str,
    live: Value,
    config: &CreateConfig,
) -> Result<InspectionRecord> {
    let mut record = match live {
        Value::Object(map) => map,
        other => {
            return Err(fetch_error(
                FetchStage::Merge,
                id,
                format!("live inspect data is not an object: {other}"),
            ))
        }
    };

    record.insert("Config".to_string(), config_section(config));
    record.insert("HostConfig".to_string(), host_config_section(config));

    Ok(InspectionRecord::new(Value::Object(record)))
}

fn config_section(config: &CreateConfig) -> Value {
    let exposed: Map<String, Value> = config
        .exposed_ports
        .iter()
        .map(|port| (port.clone(), json!({})))
        .collect();

    json!({
        "Hostname": config.hostname.clone().unwrap_or_default(),
        "User": config.user.clone().unwrap_or_default(),
        "Env": config.env,
        "Cmd": config.command,
        "Entrypoint": config.entrypoint,
        "Image": config.image,
        "WorkingDir": config.work_dir.clone().unwrap_or_default(),
        "Labels": config.labels,
        "StopSignal": config.stop_signal,
        "Tty": config.tty,
        "OpenStdin": config.stdin_open,
        "ExposedPorts": exposed,
    })
}

fn host_config_section(config: &CreateConfig) -> Value {
    let port_bindings: Map<String, Value> = config
        .port_bindings
        .iter()
        .filter_map(|binding| binding.split_once(':'))
        .map(|(host, container)| {
            let key = if container.contains('/') {
                container.to_string()
            } else {
                format!("{container}/tcp")
            };
            (key, json!([{ "HostIp": "", "HostPort": host }]))
        })
        .collect();

    json!({
        "Binds": config.volumes,
        "PortBindings": port_bindings,
        "NetworkMode": config.network_mode.clone().unwrap_or_else(|| "default".to_string()),
        "RestartPolicy": {
            "Name": config.restart_policy.clone().unwrap_or_else(|| "no".to_string()),
        },
        "NanoCpus": config.resources.cpus.map(|c| u64::from(c) * 1_000_000_000).unwrap_or(0),
        "Memory": config.resources.memory_mb.map(|m| u64::from(m) * 1024 * 1024).unwrap_or(0),
    })
}
