//! Container state, read from `~/.a3s/boxes.json`.
//!
//! The file is only read. Running records whose PID is gone are reported
//! as dead without rewriting the file.

use std::path::{Path, PathBuf};

use a3s_inspect_core::{LookupError, ObjectKind, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metadata record for a single container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Full UUID
    pub id: String,
    /// First 12 hex chars of the UUID (no dashes)
    pub short_id: String,
    /// User-assigned or auto-generated name
    pub name: String,
    /// OCI image reference
    pub image: String,
    /// Digest of the image the container was created from
    #[serde(default)]
    pub image_id: String,
    /// "created" | "running" | "paused" | "stopped" | "dead"
    pub status: String,
    /// Shim process PID (set when running)
    pub pid: Option<u32>,
    /// Command and arguments
    #[serde(default)]
    pub cmd: Vec<String>,
    /// Volume mounts ("host:guest" pairs)
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub restart_count: u32,
    /// Container working directory (~/.a3s/boxes/<id>/)
    pub box_dir: PathBuf,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Start timestamp
    pub started_at: Option<DateTime<Utc>>,
}

impl ContainerRecord {
    /// Generate a short ID from a full UUID (first 12 hex characters, no dashes).
    pub fn make_short_id(id: &str) -> String {
        id.replace('-', "").chars().take(12).collect()
    }

    /// Directory holding creation artifacts.
    pub fn artifacts_dir(&self) -> PathBuf {
        self.box_dir.join("artifacts")
    }
}

/// Container state loaded once per invocation.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    records: Vec<ContainerRecord>,
}

impl StateFile {
    /// Load state from disk. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let records = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| {
                StoreError::Corrupt(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };

        let mut sf = Self {
            path: path.to_path_buf(),
            records,
        };
        sf.reconcile();
        Ok(sf)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find a record by exact ID.
    pub fn find_by_id(&self, id: &str) -> Option<&ContainerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Find a record by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&ContainerRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Find records matching an ID prefix.
    pub fn find_by_id_prefix(&self, prefix: &str) -> Vec<&ContainerRecord> {
        self.records
            .iter()
            .filter(|r| r.id.starts_with(prefix) || r.short_id.starts_with(prefix))
            .collect()
    }

    /// Resolve a query string to a single record.
    ///
    /// Matches in order:
    /// 1. Exact name match
    /// 2. Exact ID match
    /// 3. Unique ID prefix match (on full ID or short ID)
    pub fn resolve(&self, query: &str) -> Result<&ContainerRecord, LookupError> {
        if let Some(record) = self.find_by_name(query) {
            return Ok(record);
        }
        if let Some(record) = self.find_by_id(query) {
            return Ok(record);
        }

        let matches = if query.is_empty() {
            Vec::new()
        } else {
            self.find_by_id_prefix(query)
        };
        match matches.len() {
            0 => Err(LookupError::NotFound {
                kind: ObjectKind::Container,
                query: query.to_string(),
            }),
            1 => Ok(matches[0]),
            n => Err(LookupError::Ambiguous {
                kind: ObjectKind::Container,
                query: query.to_string(),
                count: n,
            }),
        }
    }

    /// The most recently created record.
    pub fn latest(&self) -> Option<&ContainerRecord> {
        self.records.iter().max_by_key(|r| r.created_at)
    }

    /// All records (for iteration).
    pub fn records(&self) -> &[ContainerRecord] {
        &self.records
    }

    /// Mark running records with a dead PID as dead (in memory only).
    fn reconcile(&mut self) {
        for record in &mut self.records {
            if record.status != "running" {
                continue;
            }
            let alive = record.pid.is_some_and(is_process_alive);
            if !alive {
                debug!(id = %record.id, pid = ?record.pid, "running container has no live process");
                record.status = "dead".to_string();
                record.pid = None;
            }
        }
    }
}

/// Check if a process is alive by sending signal 0.
fn is_process_alive(pid: u32) -> bool {
    // 0 and anything past i32::MAX would address a process group
    match i32::try_from(pid) {
        Ok(pid) if pid > 0 => unsafe { libc::kill(pid, 0) == 0 },
        _ => false,
    }
}
