//! Object kinds and the kind constraint attached to a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InspectError;

/// CLI token for [`KindConstraint::ContainerOnly`].
pub const KIND_CONTAINER: &str = "container";
/// CLI token for [`KindConstraint::ImageOnly`].
pub const KIND_IMAGE: &str = "image";
/// CLI token for [`KindConstraint::Either`].
pub const KIND_ALL: &str = "all";

/// A concrete object kind held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Container,
    Image,
}

/// Lookup order used for [`KindConstraint::Either`].
///
/// Containers are tried first. When every kind fails, the error of the
/// last kind tried (the image lookup) is the one reported.
pub const EITHER_FALLBACK_ORDER: [ObjectKind; 2] = [ObjectKind::Container, ObjectKind::Image];

impl ObjectKind {
    /// Leading phrase of a resolution error for this kind.
    pub fn lookup_phrase(&self) -> &'static str {
        match self {
            ObjectKind::Container => "error looking up container",
            ObjectKind::Image => "error getting image",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Container => f.write_str(KIND_CONTAINER),
            ObjectKind::Image => f.write_str(KIND_IMAGE),
        }
    }
}

/// Which object kinds an identifier may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindConstraint {
    ContainerOnly,
    ImageOnly,
    #[default]
    Either,
}

impl KindConstraint {
    /// Kinds to try, in order.
    pub fn candidates(&self) -> &'static [ObjectKind] {
        match self {
            KindConstraint::ContainerOnly => &[ObjectKind::Container],
            KindConstraint::ImageOnly => &[ObjectKind::Image],
            KindConstraint::Either => &EITHER_FALLBACK_ORDER,
        }
    }

    /// The CLI token for this constraint.
    pub fn as_token(&self) -> &'static str {
        match self {
            KindConstraint::ContainerOnly => KIND_CONTAINER,
            KindConstraint::ImageOnly => KIND_IMAGE,
            KindConstraint::Either => KIND_ALL,
        }
    }
}

impl FromStr for KindConstraint {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KIND_CONTAINER => Ok(KindConstraint::ContainerOnly),
            KIND_IMAGE => Ok(KindConstraint::ImageOnly),
            KIND_ALL => Ok(KindConstraint::Either),
            _ => Err(InspectError::InvalidRequest(format!(
                "the only recognized types are {KIND_CONTAINER:?}, {KIND_IMAGE:?}, and {KIND_ALL:?}"
            ))),
        }
    }
}

impl fmt::Display for KindConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}
