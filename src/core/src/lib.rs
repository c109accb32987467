//! A3S Inspect Core - resolution, fetch and rendering pipeline.
//!
//! Turns a list of container/image identifiers into rendered metadata:
//! identifiers are resolved under a kind constraint, their inspection
//! records fetched (containers merged with their creation configuration),
//! failures aggregated by a [`BatchPolicy`], and the result rendered as a
//! JSON array or through a `--format` template.

pub mod alias;
pub mod batch;
pub mod config;
pub mod create_config;
pub mod error;
pub mod fetch;
pub mod inspector;
pub mod kind;
pub mod provider;
pub mod record;
pub mod render;
pub mod request;
pub mod resolve;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use batch::{BatchPolicy, BatchResult};
pub use config::InspectConfig;
pub use create_config::{CreateConfig, CREATE_CONFIG_KEY};
pub use error::{FetchStage, InspectError, LookupError, Result, StoreError};
pub use fetch::{ArtifactDecoder, CreationConfigSource};
pub use inspector::Inspector;
pub use kind::{KindConstraint, ObjectKind};
pub use provider::{
    ArtifactStore, ContainerHandle, ImageHandle, InspectionProvider, ObjectStore, ResolvedEntity,
};
pub use record::{InspectionOutcome, InspectionRecord};
pub use request::InspectionRequest;
pub use template::{FieldTemplate, TemplateEngine, TemplateError};

/// A3S Inspect version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
