use std::fmt;

use thiserror::Error;

use crate::kind::ObjectKind;

/// Inspection error types
#[derive(Error, Debug)]
pub enum InspectError {
    /// The request itself is malformed (missing names, `--latest` mixed with
    /// names, unknown kind token)
    #[error("{0}")]
    InvalidRequest(String),

    /// An identifier matched none of the requested kinds
    #[error("{} \"{identifier}\": {source}", .kind.lookup_phrase())]
    ResolutionFailed {
        kind: ObjectKind,
        identifier: String,
        #[source]
        source: LookupError,
    },

    /// An object resolved but its metadata could not be produced
    #[error("{stage} {id}: {message}")]
    FetchFailed {
        stage: FetchStage,
        id: String,
        message: String,
    },

    /// Template parse or execution failure
    #[error("error rendering output: {0}")]
    RenderFailed(String),

    /// Every failure of a batch reduced with `BatchPolicy::CollectAll`
    #[error("{}", join_errors(.0))]
    Multiple(Vec<InspectError>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[InspectError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_yaml::Error> for InspectError {
    fn from(err: serde_yaml::Error) -> Self {
        InspectError::Config(err.to_string())
    }
}

/// Which step of metadata retrieval failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    ContainerInspect,
    Artifact,
    Decode,
    Merge,
    ImageInspect,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            FetchStage::ContainerInspect => "error getting container inspect data",
            FetchStage::Artifact => "error reading creation artifact for container",
            FetchStage::Decode => "error decoding creation artifact for container",
            FetchStage::Merge => "error parsing container data",
            FetchStage::ImageInspect => "error parsing image data",
        };
        f.write_str(phrase)
    }
}

/// Object store lookup errors.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no such {kind}: {query}")]
    NotFound { kind: ObjectKind, query: String },

    #[error("ambiguous {kind} reference \"{query}\" matches {count} objects")]
    Ambiguous {
        kind: ObjectKind,
        query: String,
        count: usize,
    },

    #[error("no containers to get latest from")]
    NoneExists,

    #[error("store error: {0}")]
    Store(String),
}

/// Inspection provider and artifact store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid key {0:?}")]
    InvalidKey(String),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;
