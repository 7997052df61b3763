//! Semantic objects attached to internal nodes by the analyzer.
//!
//! A [`SemBindingId`] is an arena index, so identity-keyed caches downstream
//! can key on it directly; two structurally equal objects at different
//! positions never collide.

use rustc_hash::FxHashMap;

use crate::node::SemId;

/// Index of a semantic object in its arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemBindingId(pub u32);

/// Why a reference failed to resolve cleanly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProblemReason {
    NotFound,
    NotVisible,
    Ambiguous,
    NonStaticReference,
}

/// Problem marker carried by a binding produced for erroneous source.
#[derive(Clone, Debug)]
pub struct Problem {
    pub reason: ProblemReason,
    /// The analyzer's best-guess target, when it has one.
    pub closest_match: Option<SemBindingId>,
}

/// What a semantic object denotes.
#[derive(Clone, Debug)]
pub enum SemBindingKind {
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

/// One semantic object: a type, function, variable, or package.
#[derive(Clone, Debug)]
pub struct SemBinding {
    pub kind: SemBindingKind,
    pub name: String,
    /// Declaring internal node, `SemId::NONE` for objects without a
    /// declaration in this unit (imported, built-in).
    pub declaring: SemId,
    /// Declaring container (type or package), if any.
    pub container: Option<SemBindingId>,
    /// Present when this binding was produced for erroneous source.
    pub problem: Option<Problem>,
}

impl SemBinding {
    pub fn package(name: impl Into<String>) -> SemBinding {
        SemBinding {
            kind: SemBindingKind::Package,
            name: name.into(),
            declaring: SemId::NONE,
            container: None,
            problem: None,
        }
    }

    pub fn type_of(name: impl Into<String>, declaring: SemId) -> SemBinding {
        SemBinding {
            kind: SemBindingKind::Type { superclass: None },
            name: name.into(),
            declaring,
            container: None,
            problem: None,
        }
    }

    pub fn function(
        name: impl Into<String>,
        declaring: SemId,
        parameter_types: Vec<String>,
    ) -> SemBinding {
        SemBinding {
            kind: SemBindingKind::Function {
                parameter_types,
                is_constructor: false,
            },
            name: name.into(),
            declaring,
            container: None,
            problem: None,
        }
    }

    pub fn variable(name: impl Into<String>, declaring: SemId, is_field: bool) -> SemBinding {
        SemBinding {
            kind: SemBindingKind::Variable {
                is_field,
                var_type: None,
            },
            name: name.into(),
            declaring,
            container: None,
            problem: None,
        }
    }

    pub fn with_container(mut self, container: SemBindingId) -> SemBinding {
        self.container = Some(container);
        self
    }

    pub fn with_problem(mut self, reason: ProblemReason, closest: Option<SemBindingId>) -> SemBinding {
        self.problem = Some(Problem {
            reason,
            closest_match: closest,
        });
        self
    }

    pub fn is_problem(&self) -> bool {
        self.problem.is_some()
    }
}

/// Scope contents the analyzer records for a declaration, consulted by the
/// resolver's deferred fixups for `this` and unqualified names inside field
/// and initializer bodies.
#[derive(Clone, Debug, Default)]
pub struct ScopeInfo {
    /// What `this` denotes inside the declaration, if anything.
    pub this_binding: Option<SemBindingId>,
    /// Names visible in the declaration's scope.
    pub locals: FxHashMap<String, SemBindingId>,
}

impl ScopeInfo {
    pub fn new() -> ScopeInfo {
        ScopeInfo::default()
    }

    pub fn with_this(mut self, binding: SemBindingId) -> ScopeInfo {
        self.this_binding = Some(binding);
        self
    }

    pub fn with_local(mut self, name: impl Into<String>, binding: SemBindingId) -> ScopeInfo {
        self.locals.insert(name.into(), binding);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_marker() {
        let b = SemBinding::variable("x", SemId::NONE, false)
            .with_problem(ProblemReason::NotFound, None);
        assert!(b.is_problem());
        assert_eq!(b.problem.as_ref().unwrap().reason, ProblemReason::NotFound);
    }

    #[test]
    fn scope_lookup() {
        let scope = ScopeInfo::new()
            .with_this(SemBindingId(3))
            .with_local("count", SemBindingId(4));
        assert_eq!(scope.this_binding, Some(SemBindingId(3)));
        assert_eq!(scope.locals.get("count"), Some(&SemBindingId(4)));
    }
}
