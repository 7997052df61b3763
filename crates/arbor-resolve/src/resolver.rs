//! The binding resolver.
//!
//! Owns the correspondence map from public nodes to internal nodes (filled
//! by the converter), the identity-keyed facade cache, and the key table.
//! Resolution walks the ladder: a valid semantic object wins; a problem
//! object falls back to its closest match; an unresolved reference gets a
//! synthesized recovered binding when bindings recovery is on; otherwise
//! there is no binding.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use arbor_dom::NodeId;
use arbor_sem::{SemArena, SemBindingId, SemBindingKind, SemData, SemId};

use crate::binding::{Binding, BindingData, BindingDetail, BindingKind};

/// What a deferred scope fixup resolves once the converter has finished.
#[derive(Clone, Debug)]
pub enum FixupTarget {
    /// A `this` reference inside a field or initializer body.
    This,
    /// An unqualified name inside a field or initializer body.
    Name(String),
}

struct ScopeFixup {
    node: NodeId,
    declaration: SemId,
    target: FixupTarget,
}

pub struct BindingResolver<'a> {
    arena: &'a SemArena,
    bindings_recovery: bool,
    dom_to_sem: FxHashMap<NodeId, SemId>,
    sem_to_dom: FxHashMap<SemId, NodeId>,
    facades: FxHashMap<SemBindingId, Binding>,
    by_key: FxHashMap<String, Binding>,
    recovered: FxHashMap<(String, BindingKind), Binding>,
    recovered_count: u32,
    pending: Vec<ScopeFixup>,
    fixed: FxHashMap<NodeId, SemBindingId>,
}

impl<'a> BindingResolver<'a> {
    pub fn new(arena: &'a SemArena, bindings_recovery: bool) -> BindingResolver<'a> {
        BindingResolver {
            arena,
            bindings_recovery,
            dom_to_sem: FxHashMap::default(),
            sem_to_dom: FxHashMap::default(),
            facades: FxHashMap::default(),
            by_key: FxHashMap::default(),
            recovered: FxHashMap::default(),
            recovered_count: 0,
            pending: Vec::new(),
            fixed: FxHashMap::default(),
        }
    }

    // Correspondence map (converter side)

    /// Record that public `node` was converted from internal `sem`.
    pub fn record_node(&mut self, node: NodeId, sem: SemId) {
        self.dom_to_sem.insert(node, sem);
        self.sem_to_dom.entry(sem).or_insert(node);
    }

    pub fn corresponding_sem(&self, node: NodeId) -> Option<SemId> {
        self.dom_to_sem.get(&node).copied()
    }

    /// Queue a fixup to be resolved against `declaration`'s scope once the
    /// whole unit is converted.
    pub fn defer_scope_fixup(&mut self, node: NodeId, declaration: SemId, target: FixupTarget) {
        self.pending.push(ScopeFixup {
            node,
            declaration,
            target,
        });
    }

    /// Resolve every queued fixup against the analyzer's recorded scopes.
    /// Called by the converter after the unit is complete.
    pub fn flush_scope_fixups(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        trace!(count = pending.len(), "flushing scope fixups");
        for fixup in pending {
            let Some(scope) = self.arena.scope_for_declaration(fixup.declaration) else {
                continue;
            };
            let target = match &fixup.target {
                FixupTarget::This => scope.this_binding,
                FixupTarget::Name(name) => scope.locals.get(name).copied(),
            };
            if let Some(id) = target {
                self.fixed.insert(fixup.node, id);
            }
        }
    }

    // Resolution (client side)

    pub fn resolve_name(&mut self, node: NodeId) -> Option<Binding> {
        if let Some(id) = self.fixed.get(&node).copied() {
            return Some(self.facade(id));
        }
        let sem = self.corresponding_sem(node)?;
        self.reference_binding(sem)
    }

    pub fn resolve_expression(&mut self, node: NodeId) -> Option<Binding> {
        if let Some(id) = self.fixed.get(&node).copied() {
            return Some(self.facade(id));
        }
        let sem = self.corresponding_sem(node)?;
        self.reference_binding(sem)
    }

    pub fn resolve_type(&mut self, node: NodeId) -> Option<Binding> {
        let sem = self.corresponding_sem(node)?;
        self.typed_binding(sem, BindingKind::Type)
    }

    pub fn resolve_variable(&mut self, node: NodeId) -> Option<Binding> {
        let sem = self.corresponding_sem(node)?;
        self.typed_binding(sem, BindingKind::Variable)
    }

    pub fn resolve_function(&mut self, node: NodeId) -> Option<Binding> {
        let sem = self.corresponding_sem(node)?;
        self.typed_binding(sem, BindingKind::Function)
    }

    pub fn resolve_package(&mut self, node: NodeId) -> Option<Binding> {
        let sem = self.corresponding_sem(node)?;
        let name = match &self.arena.get(sem)?.data {
            SemData::ImportReference { tokens, .. } => tokens.join("."),
            _ => return None,
        };
        let index = self
            .arena
            .bindings()
            .iter()
            .position(|b| matches!(b.kind, SemBindingKind::Package) && b.name == name)?;
        Some(self.facade(SemBindingId(index as u32)))
    }

    /// Look up an already-materialized binding by its key.
    pub fn find_binding(&self, key: &str) -> Option<Binding> {
        self.by_key.get(key).cloned()
    }

    /// Public node declaring the keyed binding, when both the binding and
    /// its declaration were seen during conversion.
    pub fn find_declaring_node(&self, key: &str) -> Option<NodeId> {
        let binding = self.by_key.get(key)?;
        self.sem_to_dom.get(&binding.0.declaring).copied()
    }

    /// Superclass of a type binding.
    pub fn superclass_of(&mut self, binding: &Binding) -> Option<Binding> {
        let superclass = match &binding.0.detail {
            BindingDetail::Type { superclass } => *superclass,
            _ => None,
        }?;
        Some(self.facade(superclass))
    }

    /// Declared type of a variable binding.
    pub fn variable_type_of(&mut self, binding: &Binding) -> Option<Binding> {
        let var_type = match &binding.0.detail {
            BindingDetail::Variable { var_type, .. } => *var_type,
            _ => None,
        }?;
        Some(self.facade(var_type))
    }

    // Internals

    /// Ladder walk for a reference in expression position; unresolved names
    /// recover as variables.
    fn reference_binding(&mut self, sem: SemId) -> Option<Binding> {
        let (binding, name) = self.reference_binding_raw(sem)?;
        self.ladder(binding, name.as_deref(), BindingKind::Variable)
    }

    fn typed_binding(&mut self, sem: SemId, kind: BindingKind) -> Option<Binding> {
        let (binding, name) = self.reference_binding_raw(sem)?;
        self.ladder(binding, name.as_deref(), kind)
            .filter(|b| b.kind() == kind || b.is_recovered())
    }

    /// Semantic object and fallback name carried by a reference or
    /// declaration node.
    fn reference_binding_raw(&self, sem: SemId) -> Option<(Option<SemBindingId>, Option<String>)> {
        let node = self.arena.get(sem)?;
        let pair = match &node.data {
            SemData::SingleNameReference { name, binding } => (*binding, Some(name.clone())),
            SemData::QualifiedNameReference { tokens, binding } => {
                (*binding, tokens.last().cloned())
            }
            SemData::FieldReference { token, binding, .. } => (*binding, Some(token.clone())),
            SemData::MessageSend {
                selector, binding, ..
            } => (*binding, Some(selector.clone())),
            SemData::AllocationExpression { binding, .. } => (*binding, None),
            SemData::SingleTypeReference { name, binding } => (*binding, Some(name.clone())),
            SemData::QualifiedTypeReference { tokens, binding } => {
                (*binding, tokens.last().cloned())
            }
            SemData::ArrayTypeReference { name, binding, .. } => (*binding, Some(name.clone())),
            SemData::LocalDeclaration { name, binding, .. } => (*binding, Some(name.clone())),
            SemData::FieldDeclaration { name, binding, .. } => (*binding, Some(name.clone())),
            SemData::MethodDeclaration {
                selector, binding, ..
            } => (*binding, selector.clone()),
            SemData::Argument { name, binding, .. } => (*binding, Some(name.clone())),
            SemData::TypeDeclaration { name, binding, .. } => (*binding, Some(name.clone())),
            _ => return None,
        };
        Some(pair)
    }

    /// valid -> closest match -> recovered -> none.
    fn ladder(
        &mut self,
        binding: Option<SemBindingId>,
        name: Option<&str>,
        recovered_kind: BindingKind,
    ) -> Option<Binding> {
        match binding {
            Some(id) => {
                let problem = self.arena.binding(id).problem.clone();
                match problem {
                    None => Some(self.facade(id)),
                    Some(p) => match p.closest_match {
                        Some(closest) => Some(self.facade(closest)),
                        None => name.and_then(|n| self.recovered(n, recovered_kind)),
                    },
                }
            }
            None => name.and_then(|n| self.recovered(n, recovered_kind)),
        }
    }

    /// One facade per semantic object; cached so repeated resolutions are
    /// pointer-equal.
    fn facade(&mut self, id: SemBindingId) -> Binding {
        if let Some(b) = self.facades.get(&id) {
            return b.clone();
        }
        let sem = self.arena.binding(id);
        let key = self.compute_key(id);
        let detail = match &sem.kind {
            SemBindingKind::Package => BindingDetail::Package,
            SemBindingKind::Type { superclass } => BindingDetail::Type {
                superclass: *superclass,
            },
            SemBindingKind::Function {
                parameter_types,
                is_constructor,
            } => BindingDetail::Function {
                parameter_types: parameter_types.clone(),
                is_constructor: *is_constructor,
            },
            SemBindingKind::Variable { is_field, var_type } => BindingDetail::Variable {
                is_field: *is_field,
                var_type: *var_type,
            },
        };
        trace!(?id, key, "new binding facade");
        let binding = Binding(Arc::new(BindingData {
            name: sem.name.clone(),
            key: key.clone(),
            detail,
            declaring: sem.declaring,
            recovered: false,
        }));
        self.facades.insert(id, binding.clone());
        self.by_key.insert(key, binding.clone());
        binding
    }

    /// Key shapes: `pkg` / `pkg/Type` / `container#member(arity)` /
    /// `container#name`, built from the container chain.
    fn compute_key(&self, id: SemBindingId) -> String {
        let sem = self.arena.binding(id);
        let container = sem
            .container
            .map(|c| self.compute_key(c))
            .unwrap_or_default();
        match &sem.kind {
            SemBindingKind::Package => sem.name.clone(),
            SemBindingKind::Type { .. } => {
                if container.is_empty() {
                    sem.name.clone()
                } else {
                    format!("{container}/{}", sem.name)
                }
            }
            SemBindingKind::Function {
                parameter_types, ..
            } => format!("{container}#{}({})", sem.name, parameter_types.len()),
            SemBindingKind::Variable { .. } => format!("{container}#{}", sem.name),
        }
    }

    /// Synthesize (or reuse) a recovered binding for an unresolved name.
    fn recovered(&mut self, name: &str, kind: BindingKind) -> Option<Binding> {
        if !self.bindings_recovery {
            return None;
        }
        let cache_key = (name.to_string(), kind);
        if let Some(b) = self.recovered.get(&cache_key) {
            return Some(b.clone());
        }
        let n = self.recovered_count;
        self.recovered_count += 1;
        let key = format!("Recovered#{name}#{n}");
        let detail = match kind {
            BindingKind::Package => BindingDetail::Package,
            BindingKind::Type => BindingDetail::Type { superclass: None },
            BindingKind::Function => BindingDetail::Function {
                parameter_types: Vec::new(),
                is_constructor: false,
            },
            BindingKind::Variable => BindingDetail::Variable {
                is_field: false,
                var_type: None,
            },
        };
        trace!(name, ?kind, key, "synthesized recovered binding");
        let binding = Binding(Arc::new(BindingData {
            name: name.to_string(),
            key: key.clone(),
            detail,
            declaring: SemId::NONE,
            recovered: true,
        }));
        self.recovered.insert(cache_key, binding.clone());
        self.by_key.insert(key, binding.clone());
        Some(binding)
    }
}
