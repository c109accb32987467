//! A3S Inspect Runtime - local storage backing the inspection pipeline.
//!
//! Reads container records, the OCI image store and per-container creation
//! artifacts from a data root, and exposes them through the collaborator
//! traits of `a3s-inspect-core`.

pub mod fs;
pub mod local;
pub mod oci;
pub mod state;

// Re-export common types
pub use fs::MountPoint;
pub use local::LocalRuntime;
pub use oci::{ImageReference, ImageStore, OciImage, OciImageConfig, StoredImage};
pub use state::{ContainerRecord, StateFile};

/// A3S Inspect Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
