//! Inspection records and per-identifier outcomes.

use serde::Serialize;
use serde_json::Value;

use crate::error::InspectError;

/// Structured metadata for one object.
///
/// Always a plain JSON tree so every renderer can consume it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InspectionRecord(Value);

impl InspectionRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for InspectionRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Result of resolving and fetching a single identifier.
#[derive(Debug)]
pub enum InspectionOutcome {
    Record(InspectionRecord),
    Failure {
        identifier: String,
        error: InspectError,
    },
}

impl InspectionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InspectionOutcome::Failure { .. })
    }
}
