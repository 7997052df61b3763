//! Public binding facades.
//!
//! A [`Binding`] is a cheap, identity-stable handle over one semantic object
//! (or over nothing, for recovered bindings synthesized from erroneous
//! source). The resolver hands out one facade per semantic object, so
//! equality inside one resolver is pointer equality; across resolvers the
//! binding key is the durable identity.

use std::sync::Arc;

use arbor_sem::{SemBindingId, SemId};

/// What a binding denotes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Package,
    Type,
    Function,
    Variable,
}

#[derive(Clone, Debug)]
pub(crate) enum BindingDetail {
    Package,
    Type {
        superclass: Option<SemBindingId>,
    },
    Function {
        parameter_types: Vec<String>,
        is_constructor: bool,
    },
    Variable {
        is_field: bool,
        var_type: Option<SemBindingId>,
    },
}

#[derive(Debug)]
pub(crate) struct BindingData {
    pub(crate) name: String,
    pub(crate) key: String,
    pub(crate) detail: BindingDetail,
    /// Declaring internal node, `SemId::NONE` when there is none.
    pub(crate) declaring: SemId,
    pub(crate) recovered: bool,
}

/// Identity-stable handle to one resolved program entity.
#[derive(Clone, Debug)]
pub struct Binding(pub(crate) Arc<BindingData>);

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self.0.detail {
            BindingDetail::Package => BindingKind::Package,
            BindingDetail::Type { .. } => BindingKind::Type,
            BindingDetail::Function { .. } => BindingKind::Function,
            BindingDetail::Variable { .. } => BindingKind::Variable,
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Unique key, stable across re-resolutions of structurally equal input.
    pub fn key(&self) -> &str {
        &self.0.key
    }

    /// True for bindings synthesized for unresolved references under
    /// bindings recovery.
    pub fn is_recovered(&self) -> bool {
        self.0.recovered
    }

    /// Same entity: pointer equality within one resolver, key equality
    /// across resolvers.
    pub fn is_equal_to(&self, other: &Binding) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.key == other.0.key
    }

    pub fn is_constructor(&self) -> bool {
        matches!(
            self.0.detail,
            BindingDetail::Function {
                is_constructor: true,
                ..
            }
        )
    }

    pub fn is_field(&self) -> bool {
        matches!(
            self.0.detail,
            BindingDetail::Variable { is_field: true, .. }
        )
    }

    /// Declared parameter type names, for function bindings.
    pub fn parameter_types(&self) -> &[String] {
        match &self.0.detail {
            BindingDetail::Function {
                parameter_types, ..
            } => parameter_types,
            _ => &[],
        }
    }
}
