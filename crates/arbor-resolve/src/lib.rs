//! Binding resolution for public trees.
//!
//! The converter records which internal node each public node came from;
//! [`BindingResolver`] turns those correspondences into [`Binding`] facades
//! over the analyzer's semantic objects, with identity caching, durable
//! binding keys, and recovery for unresolved references.

pub mod binding;
pub mod resolver;

pub use binding::{Binding, BindingKind};
pub use resolver::{BindingResolver, FixupTarget};
