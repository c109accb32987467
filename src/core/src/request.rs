//! Validated inspection request.

use crate::error::{InspectError, Result};
use crate::kind::KindConstraint;

/// What the caller asked to inspect.
///
/// Built through [`InspectionRequest::new`], which rejects contradictory
/// input. Fields are read-only afterwards.
#[derive(Debug, Clone)]
pub struct InspectionRequest {
    identifiers: Vec<String>,
    kind: KindConstraint,
    include_size: bool,
    use_latest: bool,
}

impl InspectionRequest {
    /// Validate and build a request.
    ///
    /// Errors when neither identifiers nor `use_latest` are given, or when
    /// both are.
    pub fn new(
        identifiers: Vec<String>,
        kind: KindConstraint,
        include_size: bool,
        use_latest: bool,
    ) -> Result<Self> {
        Self::check_targets(&identifiers, use_latest)?;

        Ok(Self {
            identifiers,
            kind,
            include_size,
            use_latest,
        })
    }

    /// Check that exactly one of `identifiers` and `use_latest` is given.
    ///
    /// Callers parsing other options run this first so target errors are
    /// reported ahead of option errors.
    pub fn check_targets(identifiers: &[String], use_latest: bool) -> Result<()> {
        if identifiers.is_empty() && !use_latest {
            return Err(InspectError::InvalidRequest(
                "container or image name must be specified: a3s-inspect inspect [options [...]] name"
                    .to_string(),
            ));
        }
        if !identifiers.is_empty() && use_latest {
            return Err(InspectError::InvalidRequest(
                "you cannot provide additional arguments with --latest".to_string(),
            ));
        }
        Ok(())
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn kind(&self) -> KindConstraint {
        self.kind
    }

    /// Whether container size accounting was requested.
    pub fn include_size(&self) -> bool {
        self.include_size
    }

    pub fn use_latest(&self) -> bool {
        self.use_latest
    }
}

/// The concrete work list a request expands to once `--latest` is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub identifiers: Vec<String>,
    pub kind: KindConstraint,
    pub include_size: bool,
}

impl BatchPlan {
    /// Plan for a request with explicit identifiers.
    pub fn explicit(request: &InspectionRequest) -> Self {
        Self {
            identifiers: request.identifiers().to_vec(),
            kind: request.kind(),
            include_size: request.include_size(),
        }
    }

    /// Plan targeting only the latest container.
    pub fn latest(request: &InspectionRequest, container_id: String) -> Self {
        Self {
            identifiers: vec![container_id],
            kind: KindConstraint::ContainerOnly,
            include_size: request.include_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_without_latest() {
        let err = InspectionRequest::new(vec![], KindConstraint::Either, false, false).unwrap_err();
        assert!(matches!(err, InspectError::InvalidRequest(_)));
        assert!(err.to_string().contains("must be specified"));
    }

    #[test]
    fn test_rejects_names_with_latest() {
        let err = InspectionRequest::new(
            vec!["web".to_string()],
            KindConstraint::ContainerOnly,
            false,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, InspectError::InvalidRequest(_)));
        assert!(err.to_string().contains("--latest"));
    }

    #[test]
    fn test_check_targets() {
        let web = vec!["web".to_string()];
        assert!(InspectionRequest::check_targets(&web, false).is_ok());
        assert!(InspectionRequest::check_targets(&[], true).is_ok());
        assert!(InspectionRequest::check_targets(&[], false).is_err());
        assert!(InspectionRequest::check_targets(&web, true).is_err());
    }

    #[test]
    fn test_latest_alone_is_valid() {
        let req = InspectionRequest::new(vec![], KindConstraint::Either, true, true).unwrap();
        assert!(req.use_latest());
        assert!(req.identifiers().is_empty());
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let req = InspectionRequest::new(ids.clone(), KindConstraint::ImageOnly, false, false)
            .unwrap();
        assert_eq!(req.identifiers(), ids.as_slice());
        assert_eq!(req.kind(), KindConstraint::ImageOnly);
    }

    #[test]
    fn test_latest_plan_forces_container() {
        let req = InspectionRequest::new(vec![], KindConstraint::Either, true, true).unwrap();
        let plan = BatchPlan::latest(&req, "abc123".to_string());
        assert_eq!(plan.identifiers, vec!["abc123".to_string()]);
        assert_eq!(plan.kind, KindConstraint::ContainerOnly);
        assert!(plan.include_size);
    }
}
