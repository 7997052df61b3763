//! Public syntax tree: an owning, mutable, observable DOM over script
//! sources.
//!
//! The [`Ast`] is the owning tree; nodes are addressed by [`NodeId`] handles
//! and read or mutated through the tree's API. Structural invariants (single
//! ownership, acyclicity, required children) are enforced at every mutation,
//! which also drives the change-event protocol and the modification counter.
//! [`AstMatcher`] compares subtrees structurally.

pub mod error;
pub mod event;
pub mod matcher;
pub mod node;
pub mod props;
pub mod tree;

pub use error::TreeError;
pub use event::{AstEvent, EventSink, RecordingSink};
pub use matcher::{AstMatcher, DefaultMatcher, NodeRef, default_match};
pub use node::{
    AssignmentOperator, InfixOperator, NodeData, NodeFlags, NodeId, NodeKind, PostfixOperator,
    PrefixOperator, PropertyKind,
};
pub use props::{
    SimpleProperty, SimpleValue, Slot, SlotMut, StructuralProperty, simple_properties,
    structural_properties,
};
pub use tree::{ApiLevel, Ast, TreeOptions};
