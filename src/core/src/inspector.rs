//! The inspection entry point used by the CLI.

use tracing::debug;

use crate::alias::normalize_format;
use crate::batch::{inspect_all, BatchPolicy};
use crate::error::Result;
use crate::fetch::CreationConfigSource;
use crate::provider::{InspectionProvider, ObjectStore};
use crate::render::{render, OutputFormat};
use crate::request::{BatchPlan, InspectionRequest};
use crate::resolve::latest_container;
use crate::template::TemplateEngine;

/// Resolves, fetches and renders a request against a set of collaborators.
pub struct Inspector<'a> {
    store: &'a dyn ObjectStore,
    provider: &'a dyn InspectionProvider,
    creation: &'a dyn CreationConfigSource,
    engine: &'a dyn TemplateEngine,
    policy: BatchPolicy,
}

impl<'a> Inspector<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        provider: &'a dyn InspectionProvider,
        creation: &'a dyn CreationConfigSource,
        engine: &'a dyn TemplateEngine,
    ) -> Self {
        Self {
            store,
            provider,
            creation,
            engine,
            policy: BatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Inspect everything the request names and render it with `format`.
    ///
    /// Fails with a single error if any identifier fails (see
    /// [`BatchPolicy`]); nothing is rendered in that case.
    pub async fn run(&self, request: &InspectionRequest, format: &str) -> Result<String> {
        let format = OutputFormat::parse(&normalize_format(format));

        let plan = if request.use_latest() {
            let id = latest_container(self.store).await?;
            debug!(%id, "inspecting latest container");
            BatchPlan::latest(request, id)
        } else {
            BatchPlan::explicit(request)
        };

        let outcomes = inspect_all(&plan, self.store, self.provider, self.creation).await;
        let records = self.policy.reduce(outcomes).into_result()?;

        render(&records, &format, self.engine)
    }
}
