//! Batch driving and error aggregation.
//!
//! Every identifier is resolved and fetched in input order, producing one
//! [`InspectionOutcome`] each. A [`BatchPolicy`] then reduces the outcomes
//! to the records to render and the error to report.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{InspectError, Result};
use crate::fetch::{fetch, CreationConfigSource};
use crate::provider::{InspectionProvider, ObjectStore};
use crate::record::{InspectionOutcome, InspectionRecord};
use crate::request::BatchPlan;
use crate::resolve::resolve;

/// How per-identifier outcomes are folded into a batch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// One shared "last error" slot. A failure overwrites the slot; a record
    /// is kept only while the slot has never been set. Records after the
    /// first failure are dropped and the last failure is returned.
    #[default]
    Legacy,
    /// Keep every record and report every failure.
    CollectAll,
}

/// Records to render plus the error that fails the batch, if any.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<InspectionRecord>,
    pub error: Option<InspectError>,
}

impl BatchResult {
    pub fn into_result(self) -> Result<Vec<InspectionRecord>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

impl BatchPolicy {
    /// Reduce ordered outcomes to a batch result.
    pub fn reduce(self, outcomes: Vec<InspectionOutcome>) -> BatchResult {
        match self {
            BatchPolicy::Legacy => reduce_last_error(outcomes),
            BatchPolicy::CollectAll => reduce_collect_all(outcomes),
        }
    }
}

fn reduce_last_error(outcomes: Vec<InspectionOutcome>) -> BatchResult {
    let mut result = BatchResult::default();

    for outcome in outcomes {
        match outcome {
            InspectionOutcome::Failure { identifier, error } => {
                debug!(%identifier, %error, "batch error slot set");
                result.error = Some(error);
            }
            InspectionOutcome::Record(record) => {
                if result.error.is_none() {
                    result.records.push(record);
                } else {
                    debug!("dropping record after earlier failure");
                }
            }
        }
    }

    result
}

fn reduce_collect_all(outcomes: Vec<InspectionOutcome>) -> BatchResult {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for outcome in outcomes {
        match outcome {
            InspectionOutcome::Record(record) => records.push(record),
            InspectionOutcome::Failure { error, .. } => errors.push(error),
        }
    }

    let error = match errors.len() {
        0 => None,
        1 => errors.pop(),
        _ => Some(InspectError::Multiple(errors)),
    };

    BatchResult { records, error }
}

/// Resolve and fetch every identifier of the plan, in order.
pub async fn inspect_all(
    plan: &BatchPlan,
    store: &dyn ObjectStore,
    provider: &dyn InspectionProvider,
    creation: &dyn CreationConfigSource,
) -> Vec<InspectionOutcome> {
    let mut outcomes = Vec::with_capacity(plan.identifiers.len());

    for identifier in &plan.identifiers {
        let outcome = match inspect_one(identifier, plan, store, provider, creation).await {
            Ok(record) => InspectionOutcome::Record(record),
            Err(error) => {
                warn!(%identifier, %error, "inspection failed");
                InspectionOutcome::Failure {
                    identifier: identifier.clone(),
                    error,
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

async fn inspect_one(
    identifier: &str,
    plan: &BatchPlan,
    store: &dyn ObjectStore,
    provider: &dyn InspectionProvider,
    creation: &dyn CreationConfigSource,
) -> Result<InspectionRecord> {
    let entity = resolve(store, identifier, plan.kind).await?;
    fetch(&entity, plan.include_size, provider, creation).await
}
