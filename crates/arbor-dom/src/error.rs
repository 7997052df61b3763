//! Structural-invariant violations.
//!
//! These are programmer errors: they are reported synchronously at the point
//! of violation, never retried, and the tree is left unmodified because every
//! check precedes the corresponding write.

use thiserror::Error;

use crate::node::NodeKind;
use crate::props::{SimpleProperty, StructuralProperty};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node belongs to a different owning tree")]
    WrongOwner,
    #[error("node handle does not name a live node")]
    UnknownNode,
    #[error("child is already parented; detach it first")]
    AlreadyParented,
    #[error("edit would make a node its own descendant")]
    Cycle,
    #[error("required child of {kind:?}.{property:?} cannot be absent")]
    RequiredChild {
        kind: NodeKind,
        property: StructuralProperty,
    },
    #[error("{kind:?} has no structural property {property:?}")]
    NoSuchProperty {
        kind: NodeKind,
        property: StructuralProperty,
    },
    #[error("{kind:?} has no simple property {property:?}, or the value type does not match")]
    NoSuchValue {
        kind: NodeKind,
        property: SimpleProperty,
    },
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("node is protected and cannot be modified")]
    Protected,
    #[error("{0:?} is not available at this api level")]
    UnsupportedVariant(NodeKind),
}
