//! The internal, resolution-oriented parse tree.
//!
//! This crate models the front-end compiler's output the way the converter
//! consumes it: arena-allocated nodes with inclusive `[source_start,
//! source_end]` offsets, a packed `bits` word carrying parenthesization depth
//! and infix operator ids, and semantic binding objects with problem markers.
//!
//! Arbor never mutates a [`SemArena`]; it is input. The `add_*` constructors
//! exist for the front end (and for tests standing in for it).

pub mod bindings;
pub mod node;

pub use bindings::{
    Problem, ProblemReason, ScopeInfo, SemBinding, SemBindingId, SemBindingKind,
};
pub use node::{
    ObjectFieldKind, SemArena, SemData, SemId, SemNode, op, sem_bits,
};
