//! Identifier resolution under a kind constraint.
//!
//! `ContainerOnly` and `ImageOnly` perform a single lookup. `Either` walks
//! [`EITHER_FALLBACK_ORDER`](crate::kind::EITHER_FALLBACK_ORDER): the first
//! kind that matches wins, and if none does the last lookup's error (the
//! image one) is reported.

use tracing::debug;

use crate::error::{InspectError, LookupError, Result};
use crate::kind::{KindConstraint, ObjectKind};
use crate::provider::{ObjectStore, ResolvedEntity};

/// Resolve one identifier to a concrete object.
pub async fn resolve(
    store: &dyn ObjectStore,
    identifier: &str,
    constraint: KindConstraint,
) -> Result<ResolvedEntity> {
    let mut last_error: Option<(ObjectKind, LookupError)> = None;

    for &kind in constraint.candidates() {
        match lookup(store, identifier, kind).await {
            Ok(entity) => return Ok(entity),
            Err(err) => {
                if let Some((prev_kind, prev_err)) = last_error.take() {
                    debug!(identifier, kind = %prev_kind, error = %prev_err, "discarding lookup failure");
                }
                debug!(identifier, kind = %kind, error = %err, "lookup failed");
                last_error = Some((kind, err));
            }
        }
    }

    // candidates() is never empty, so a failure was recorded.
    let (kind, source) = last_error.unwrap_or((
        ObjectKind::Image,
        LookupError::NotFound {
            kind: ObjectKind::Image,
            query: identifier.to_string(),
        },
    ));
    Err(InspectError::ResolutionFailed {
        kind,
        identifier: identifier.to_string(),
        source,
    })
}

async fn lookup(
    store: &dyn ObjectStore,
    identifier: &str,
    kind: ObjectKind,
) -> std::result::Result<ResolvedEntity, LookupError> {
    match kind {
        ObjectKind::Container => store
            .lookup_container(identifier)
            .await
            .map(ResolvedEntity::Container),
        ObjectKind::Image => store.lookup_image(identifier).await.map(ResolvedEntity::Image),
    }
}

/// ID of the newest container, as a resolution error when there is none.
pub async fn latest_container(store: &dyn ObjectStore) -> Result<String> {
    store
        .latest_container_id()
        .await
        .map_err(|source| InspectError::ResolutionFailed {
            kind: ObjectKind::Container,
            identifier: "latest".to_string(),
            source,
        })
}
