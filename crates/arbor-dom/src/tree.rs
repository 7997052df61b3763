//! The owning tree.
//!
//! One [`Ast`] owns every node of one forest: it is the sole factory and the
//! single mutation choke point. Every structural write runs, in order:
//! validation (owner, parent state, required-ness), cycle check, pre event,
//! the write itself, post event, modification-counter bump. Events and the
//! counter are suspended inside [`Ast::with_events_disabled`] scopes, which
//! is how lazy required-child materialization stays invisible to observers.
//!
//! All mutation paths and every read that can trigger lazy materialization
//! serialize on one coarse `Mutex`; plain value reads go through the same
//! lock for simplicity. The lock is never held across user code except event
//! sink callbacks (see [`crate::event::EventSink`]).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use arbor_common::SourceRange;
use tracing::trace;

use crate::error::TreeError;
use crate::event::{AstEvent, EventSink};
use crate::node::{NodeData, NodeFlags, NodeId, NodeKind};
use crate::props::{
    SimpleProperty, SimpleValue, Slot, SlotMut, StructuralProperty, default_child_kind,
    structural_properties,
};

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(1);

/// Which grammar level the tree accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ApiLevel {
    /// The original scripting grammar: no class-shaped declarations.
    Legacy,
    /// The extended grammar with type declarations and qualified types.
    #[default]
    Standard,
}

/// Explicit construction options; replaces the original's global option maps.
#[derive(Clone, Debug, Default)]
pub struct TreeOptions {
    pub api_level: ApiLevel,
    /// Flags stamped onto every node the factory creates.
    pub default_flags: NodeFlags,
    /// Converter substitutes placeholders for malformed statements.
    pub statements_recovery: bool,
    /// Resolver synthesizes recovered bindings for unresolved references.
    pub bindings_recovery: bool,
}

struct NodeSlot {
    range: SourceRange,
    flags: NodeFlags,
    parent: NodeId,
    parent_prop: Option<StructuralProperty>,
    data: NodeData,
}

struct TreeCore {
    tree_id: u32,
    nodes: Vec<NodeSlot>,
    modification_count: u64,
    disable_events: u32,
    sink: Option<Box<dyn EventSink>>,
    options: TreeOptions,
}

/// The owning tree: node factory, mutation choke point, event source.
pub struct Ast {
    tree_id: u32,
    core: Mutex<TreeCore>,
}

impl Ast {
    pub fn new(options: TreeOptions) -> Ast {
        let tree_id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        trace!(tree_id, ?options, "new owning tree");
        Ast {
            tree_id,
            core: Mutex::new(TreeCore {
                tree_id,
                nodes: Vec::new(),
                modification_count: 0,
                disable_events: 0,
                sink: None,
                options,
            }),
        }
    }

    /// Process-unique id of this tree; embedded in every [`NodeId`] it
    /// creates.
    pub fn tree_id(&self) -> u32 {
        self.tree_id
    }

    pub fn options(&self) -> TreeOptions {
        self.core().options.clone()
    }

    /// Install the event sink, replacing any previous one.
    pub fn set_event_sink(&self, sink: Box<dyn EventSink>) {
        self.core().sink = Some(sink);
    }

    pub fn clear_event_sink(&self) {
        self.core().sink = None;
    }

    /// Monotonically non-decreasing; equal reads bracket a mutation-free
    /// window, but differences carry no ordering information beyond "at
    /// least one mutation".
    pub fn modification_count(&self) -> u64 {
        self.core().modification_count
    }

    /// Run `f` with event emission and counter advancement suspended.
    /// Reentrant; the outermost scope re-enables on the way out, including
    /// on unwind.
    pub fn with_events_disabled<R>(&self, f: impl FnOnce() -> R) -> R {
        self.core().disable_events += 1;
        let _guard = ReenableGuard { ast: self };
        f()
    }

    // Factory

    /// Allocate a structurally empty, unparented node of `kind`.
    pub fn new_node(&self, kind: NodeKind) -> Result<NodeId, TreeError> {
        let mut core = self.core();
        core.new_node(kind)
    }

    // Reads

    pub fn kind(&self, node: NodeId) -> Result<NodeKind, TreeError> {
        let core = self.core();
        Ok(core.slot(node)?.data.kind())
    }

    pub fn source_range(&self, node: NodeId) -> Result<SourceRange, TreeError> {
        let core = self.core();
        Ok(core.slot(node)?.range)
    }

    pub fn flags(&self, node: NodeId) -> Result<NodeFlags, TreeError> {
        let core = self.core();
        Ok(core.slot(node)?.flags)
    }

    /// Parent and the structural slot this node occupies in it, or `None`
    /// for roots.
    pub fn parent(&self, node: NodeId) -> Result<Option<(NodeId, StructuralProperty)>, TreeError> {
        let core = self.core();
        let slot = core.slot(node)?;
        if slot.parent.is_none() {
            Ok(None)
        } else {
            Ok(Some((slot.parent, slot.parent_prop.expect("parented node has slot"))))
        }
    }

    /// Read a required child, materializing the per-kind default on first
    /// read (invisibly: no events, no counter advance).
    pub fn child(&self, node: NodeId, property: StructuralProperty) -> Result<NodeId, TreeError> {
        let mut core = self.core();
        let kind = core.slot(node)?.data.kind();
        match core.slot(node)?.data.child_slot(property) {
            Some(Slot::Required(id)) if !id.is_none() => Ok(id),
            Some(Slot::Required(_)) => core.materialize_default(node, property),
            Some(_) => Err(TreeError::NoSuchProperty { kind, property }),
            None => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    pub fn optional_child(
        &self,
        node: NodeId,
        property: StructuralProperty,
    ) -> Result<Option<NodeId>, TreeError> {
        let core = self.core();
        let kind = core.slot(node)?.data.kind();
        match core.slot(node)?.data.child_slot(property) {
            Some(Slot::Optional(id)) => Ok(id),
            Some(Slot::Required(id)) if !id.is_none() => Ok(Some(id)),
            Some(Slot::Required(_)) => Ok(None),
            _ => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    /// Snapshot of a list-valued property.
    pub fn children(
        &self,
        node: NodeId,
        property: StructuralProperty,
    ) -> Result<Vec<NodeId>, TreeError> {
        let core = self.core();
        let kind = core.slot(node)?.data.kind();
        match core.slot(node)?.data.child_slot(property) {
            Some(Slot::List(list)) => Ok(list.to_vec()),
            _ => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    pub fn value(&self, node: NodeId, property: SimpleProperty) -> Result<SimpleValue, TreeError> {
        let core = self.core();
        let slot = core.slot(node)?;
        slot.data.value(property).ok_or(TreeError::NoSuchValue {
            kind: slot.data.kind(),
            property,
        })
    }

    // Writes

    /// Set or clear a child slot. `None` clears an optional slot; clearing a
    /// required slot is an error. Returns the displaced child, if any.
    pub fn set_child(
        &self,
        parent: NodeId,
        property: StructuralProperty,
        new_child: Option<NodeId>,
    ) -> Result<Option<NodeId>, TreeError> {
        let mut core = self.core();
        core.set_child(parent, property, new_child)
    }

    pub fn list_insert(
        &self,
        parent: NodeId,
        property: StructuralProperty,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let mut core = self.core();
        core.list_insert(parent, property, index, child)
    }

    /// Append to a list-valued property.
    pub fn list_push(
        &self,
        parent: NodeId,
        property: StructuralProperty,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let mut core = self.core();
        let len = core.list_len(parent, property)?;
        core.list_insert(parent, property, len, child)
    }

    /// Remove a list element; the removed node becomes a root.
    pub fn list_remove(
        &self,
        parent: NodeId,
        property: StructuralProperty,
        index: usize,
    ) -> Result<NodeId, TreeError> {
        let mut core = self.core();
        core.list_remove(parent, property, index)
    }

    pub fn set_value(
        &self,
        node: NodeId,
        property: SimpleProperty,
        value: SimpleValue,
    ) -> Result<SimpleValue, TreeError> {
        let mut core = self.core();
        core.set_value(node, property, value)
    }

    /// Remove `node` from its parent; it becomes an unparented root. Fails
    /// on required slots (replace instead) and on roots.
    pub fn detach(&self, node: NodeId) -> Result<(), TreeError> {
        let mut core = self.core();
        core.detach(node)
    }

    /// Source ranges are not structural: updating one advances the counter
    /// but fires no event.
    pub fn set_source_range(&self, node: NodeId, range: SourceRange) -> Result<(), TreeError> {
        let mut core = self.core();
        core.check_protected(node)?;
        core.modifying();
        core.slot_mut(node)?.range = range;
        Ok(())
    }

    pub fn set_flags(&self, node: NodeId, flags: NodeFlags) -> Result<(), TreeError> {
        let mut core = self.core();
        core.check_protected(node)?;
        core.modifying();
        core.slot_mut(node)?.flags = flags;
        Ok(())
    }

    pub fn add_flags(&self, node: NodeId, flags: NodeFlags) -> Result<(), TreeError> {
        let mut core = self.core();
        core.check_protected(node)?;
        core.modifying();
        core.slot_mut(node)?.flags |= flags;
        Ok(())
    }

    // Unit comment table (not a structural property, mirrors the original's
    // comment list hanging off the compilation unit)

    pub fn set_unit_comments(&self, unit: NodeId, table: Vec<NodeId>) -> Result<(), TreeError> {
        let mut core = self.core();
        core.modifying();
        match &mut core.slot_mut(unit)?.data {
            NodeData::ScriptUnit { comments, .. } => {
                *comments = table;
                Ok(())
            }
            other => Err(TreeError::NoSuchProperty {
                kind: other.kind(),
                property: StructuralProperty::Statements,
            }),
        }
    }

    pub fn unit_comments(&self, unit: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let core = self.core();
        match &core.slot(unit)?.data {
            NodeData::ScriptUnit { comments, .. } => Ok(comments.clone()),
            other => Err(TreeError::NoSuchProperty {
                kind: other.kind(),
                property: StructuralProperty::Statements,
            }),
        }
    }

    /// Deep-copy `node`'s subtree into `target` (which may be `self`). The
    /// only legal way to move structure across trees. Emits pre/post clone
    /// events on the destination and advances its counter once.
    pub fn deep_clone(&self, node: NodeId, target: &Ast) -> Result<NodeId, TreeError> {
        trace!(source = ?node, target = target.tree_id, "deep clone");
        let snapshot = {
            let core = self.core();
            core.snapshot(node)?
        };
        let mut target_core = if std::ptr::eq(self, target) {
            self.core()
        } else {
            target.core()
        };
        target_core.rebuild(node, snapshot)
    }

    fn core(&self) -> MutexGuard<'_, TreeCore> {
        self.core.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct ReenableGuard<'a> {
    ast: &'a Ast,
}

impl Drop for ReenableGuard<'_> {
    fn drop(&mut self) {
        let mut core = self.ast.core();
        debug_assert!(core.disable_events > 0);
        core.disable_events = core.disable_events.saturating_sub(1);
    }
}

/// Flat copy of one subtree, in creation order (parents before children is
/// not guaranteed; ids are remapped during rebuild).
struct Snapshot {
    nodes: Vec<(NodeId, SourceRange, NodeFlags, NodeData)>,
}

impl TreeCore {
    fn slot(&self, id: NodeId) -> Result<&NodeSlot, TreeError> {
        if id.tree != self.tree_id {
            return Err(TreeError::WrongOwner);
        }
        self.nodes.get(id.index as usize).ok_or(TreeError::UnknownNode)
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, TreeError> {
        if id.tree != self.tree_id {
            return Err(TreeError::WrongOwner);
        }
        self.nodes
            .get_mut(id.index as usize)
            .ok_or(TreeError::UnknownNode)
    }

    fn new_node(&mut self, kind: NodeKind) -> Result<NodeId, TreeError> {
        if self.options.api_level == ApiLevel::Legacy
            && matches!(
                kind,
                NodeKind::TypeDeclaration
                    | NodeKind::TypeDeclarationStatement
                    | NodeKind::QualifiedType
                    | NodeKind::InferredType
            )
        {
            return Err(TreeError::UnsupportedVariant(kind));
        }
        let id = NodeId {
            tree: self.tree_id,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(NodeSlot {
            range: SourceRange::NO_SOURCE,
            flags: self.options.default_flags,
            parent: NodeId::NONE,
            parent_prop: None,
            data: NodeData::empty_for(kind),
        });
        Ok(id)
    }

    /// Counter bump for one mutation, unless events are suspended.
    fn modifying(&mut self) {
        if self.disable_events == 0 {
            self.modification_count += 1;
        }
    }

    fn emit(&mut self, event: &AstEvent) {
        if self.disable_events > 0 {
            return;
        }
        // The sink is taken out for the duration of the callback so a
        // panicking sink cannot be observed half-notified; the tree lock is
        // held throughout.
        if let Some(mut sink) = self.sink.take() {
            sink.on_event(event);
            self.sink = Some(sink);
        }
    }

    fn check_protected(&self, node: NodeId) -> Result<(), TreeError> {
        if self.slot(node)?.flags.contains(NodeFlags::PROTECTED) {
            Err(TreeError::Protected)
        } else {
            Ok(())
        }
    }

    /// Shared validation for attaching `child` under `parent`: same owner,
    /// currently unparented, and not an ancestor of `parent`.
    fn check_new_child(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let child_slot = self.slot(child)?;
        if !child_slot.parent.is_none() {
            return Err(TreeError::AlreadyParented);
        }
        // Cycle check: walk parent's ancestor chain looking for child.
        let mut cursor = parent;
        while !cursor.is_none() {
            if cursor == child {
                return Err(TreeError::Cycle);
            }
            cursor = self.slot(cursor)?.parent;
        }
        Ok(())
    }

    fn set_child(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        new_child: Option<NodeId>,
    ) -> Result<Option<NodeId>, TreeError> {
        self.check_protected(parent)?;
        let kind = self.slot(parent)?.data.kind();
        let old = match self.slot(parent)?.data.child_slot(property) {
            Some(Slot::Required(id)) => {
                if new_child.is_none() {
                    return Err(TreeError::RequiredChild { kind, property });
                }
                if id.is_none() { None } else { Some(id) }
            }
            Some(Slot::Optional(id)) => id,
            _ => return Err(TreeError::NoSuchProperty { kind, property }),
        };
        if let Some(child) = new_child {
            self.check_new_child(parent, child)?;
        }
        if old.is_none() && new_child.is_none() {
            return Ok(None);
        }

        let pre = match (old, new_child) {
            (Some(o), Some(n)) => AstEvent::PreReplaceChild {
                parent,
                old_child: o,
                new_child: n,
                property,
            },
            (None, Some(n)) => AstEvent::PreAddChild {
                parent,
                child: n,
                property,
            },
            (Some(o), None) => AstEvent::PreRemoveChild {
                parent,
                child: o,
                property,
            },
            (None, None) => unreachable!(),
        };
        self.emit(&pre);

        self.write_child(parent, property, new_child)?;
        if let Some(o) = old {
            let slot = self.slot_mut(o)?;
            slot.parent = NodeId::NONE;
            slot.parent_prop = None;
        }
        if let Some(n) = new_child {
            let slot = self.slot_mut(n)?;
            slot.parent = parent;
            slot.parent_prop = Some(property);
        }

        let post = match (old, new_child) {
            (Some(o), Some(n)) => AstEvent::PostReplaceChild {
                parent,
                old_child: o,
                new_child: n,
                property,
            },
            (None, Some(n)) => AstEvent::PostAddChild {
                parent,
                child: n,
                property,
            },
            (Some(o), None) => AstEvent::PostRemoveChild {
                parent,
                child: o,
                property,
            },
            (None, None) => unreachable!(),
        };
        self.emit(&post);
        self.modifying();
        Ok(old)
    }

    fn write_child(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        new_child: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let kind = self.slot(parent)?.data.kind();
        match self.slot_mut(parent)?.data.child_slot_mut(property) {
            Some(SlotMut::Required(slot)) => {
                *slot = new_child.expect("validated above");
                Ok(())
            }
            Some(SlotMut::Optional(slot)) => {
                *slot = new_child;
                Ok(())
            }
            _ => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    fn list_len(&self, parent: NodeId, property: StructuralProperty) -> Result<usize, TreeError> {
        let kind = self.slot(parent)?.data.kind();
        match self.slot(parent)?.data.child_slot(property) {
            Some(Slot::List(list)) => Ok(list.len()),
            _ => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    fn list_insert(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_protected(parent)?;
        let len = self.list_len(parent, property)?;
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_new_child(parent, child)?;

        self.emit(&AstEvent::PreAddChild {
            parent,
            child,
            property,
        });
        match self.slot_mut(parent)?.data.child_slot_mut(property) {
            Some(SlotMut::List(list)) => list.insert(index, child),
            _ => unreachable!("list_len validated the slot"),
        }
        {
            let slot = self.slot_mut(child)?;
            slot.parent = parent;
            slot.parent_prop = Some(property);
        }
        self.emit(&AstEvent::PostAddChild {
            parent,
            child,
            property,
        });
        self.modifying();
        Ok(())
    }

    fn list_remove(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        index: usize,
    ) -> Result<NodeId, TreeError> {
        self.check_protected(parent)?;
        let len = self.list_len(parent, property)?;
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let child = match self.slot(parent)?.data.child_slot(property) {
            Some(Slot::List(list)) => list[index],
            _ => unreachable!(),
        };

        self.emit(&AstEvent::PreRemoveChild {
            parent,
            child,
            property,
        });
        match self.slot_mut(parent)?.data.child_slot_mut(property) {
            Some(SlotMut::List(list)) => {
                list.remove(index);
            }
            _ => unreachable!(),
        }
        {
            let slot = self.slot_mut(child)?;
            slot.parent = NodeId::NONE;
            slot.parent_prop = None;
        }
        self.emit(&AstEvent::PostRemoveChild {
            parent,
            child,
            property,
        });
        self.modifying();
        Ok(child)
    }

    fn set_value(
        &mut self,
        node: NodeId,
        property: SimpleProperty,
        value: SimpleValue,
    ) -> Result<SimpleValue, TreeError> {
        self.check_protected(node)?;
        let kind = self.slot(node)?.data.kind();
        // Validate existence and value type before the pre event so a failed
        // write never emits.
        let current = self
            .slot(node)?
            .data
            .value(property)
            .ok_or(TreeError::NoSuchValue { kind, property })?;
        if std::mem::discriminant(&current) != std::mem::discriminant(&value) {
            return Err(TreeError::NoSuchValue { kind, property });
        }

        self.emit(&AstEvent::PreValueChange { node, property });
        let old = self
            .slot_mut(node)?
            .data
            .put_value(property, value.clone())
            .expect("validated above");
        self.emit(&AstEvent::PostValueChange {
            node,
            property,
            old: old.clone(),
            new: value,
        });
        self.modifying();
        Ok(old)
    }

    fn detach(&mut self, node: NodeId) -> Result<(), TreeError> {
        let (parent, property) = {
            let slot = self.slot(node)?;
            if slot.parent.is_none() {
                return Ok(()); // already a root
            }
            (slot.parent, slot.parent_prop.expect("parented node has slot"))
        };
        let kind = self.slot(parent)?.data.kind();
        match self.slot(parent)?.data.child_slot(property) {
            Some(Slot::Required(_)) => Err(TreeError::RequiredChild { kind, property }),
            Some(Slot::Optional(_)) => {
                self.set_child(parent, property, None)?;
                Ok(())
            }
            Some(Slot::List(list)) => {
                let index = list
                    .iter()
                    .position(|&c| c == node)
                    .expect("parented node is in its slot");
                self.list_remove(parent, property, index)?;
                Ok(())
            }
            None => Err(TreeError::NoSuchProperty { kind, property }),
        }
    }

    /// Lazily create the default child for an unset required slot; invisible
    /// to observers.
    fn materialize_default(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
    ) -> Result<NodeId, TreeError> {
        let parent_kind = self.slot(parent)?.data.kind();
        self.disable_events += 1;
        let result = (|| {
            let child = self.new_node(default_child_kind(parent_kind, property))?;
            self.set_child(parent, property, Some(child))?;
            Ok(child)
        })();
        self.disable_events -= 1;
        result
    }

    fn snapshot(&self, root: NodeId) -> Result<Snapshot, TreeError> {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let slot = self.slot(id)?;
            nodes.push((id, slot.range, slot.flags, slot.data.clone()));
            for prop in structural_properties(slot.data.kind()) {
                match slot.data.child_slot(*prop) {
                    Some(Slot::Required(c)) if !c.is_none() => stack.push(c),
                    Some(Slot::Optional(Some(c))) => stack.push(c),
                    Some(Slot::List(list)) => stack.extend(list.iter().copied()),
                    _ => {}
                }
            }
            if let NodeData::ScriptUnit { comments, .. } = &slot.data {
                stack.extend(comments.iter().copied());
            }
        }
        Ok(Snapshot { nodes })
    }

    /// Rebuild a snapshot in this tree, remapping all child ids. One clone
    /// event pair and one counter bump, no per-node events.
    fn rebuild(&mut self, source: NodeId, snapshot: Snapshot) -> Result<NodeId, TreeError> {
        self.emit(&AstEvent::PreClone { source });
        self.disable_events += 1;
        let result = (|| {
            let mut mapping = rustc_hash::FxHashMap::default();
            for (old_id, range, flags, data) in &snapshot.nodes {
                let new_id = self.new_node(data.kind())?;
                {
                    let slot = self.slot_mut(new_id)?;
                    slot.range = *range;
                    slot.flags = *flags & !NodeFlags::PROTECTED;
                    slot.data = data.clone();
                }
                mapping.insert(*old_id, new_id);
            }
            // Remap child ids and parent links.
            for (old_id, _, _, _) in &snapshot.nodes {
                let new_id = mapping[old_id];
                let kind = self.slot(new_id)?.data.kind();
                for prop in structural_properties(kind) {
                    let remapped: Option<SlotPatch> =
                        match self.slot(new_id)?.data.child_slot(*prop) {
                            Some(Slot::Required(c)) if !c.is_none() => {
                                Some(SlotPatch::One(mapping[&c]))
                            }
                            Some(Slot::Optional(Some(c))) => Some(SlotPatch::One(mapping[&c])),
                            Some(Slot::List(list)) => Some(SlotPatch::Many(
                                list.iter().map(|c| mapping[c]).collect(),
                            )),
                            _ => None,
                        };
                    match (remapped, self.slot_mut(new_id)?.data.child_slot_mut(*prop)) {
                        (Some(SlotPatch::One(c)), Some(SlotMut::Required(slot))) => *slot = c,
                        (Some(SlotPatch::One(c)), Some(SlotMut::Optional(slot))) => {
                            *slot = Some(c)
                        }
                        (Some(SlotPatch::Many(cs)), Some(SlotMut::List(slot))) => *slot = cs,
                        _ => {}
                    }
                    // Fix parent pointers for the remapped children.
                    let children: Vec<NodeId> =
                        match self.slot(new_id)?.data.child_slot(*prop) {
                            Some(Slot::Required(c)) if !c.is_none() => vec![c],
                            Some(Slot::Optional(Some(c))) => vec![c],
                            Some(Slot::List(list)) => list.to_vec(),
                            _ => Vec::new(),
                        };
                    for c in children {
                        let slot = self.slot_mut(c)?;
                        slot.parent = new_id;
                        slot.parent_prop = Some(*prop);
                    }
                }
                if let NodeData::ScriptUnit { .. } = self.slot(new_id)?.data {
                    let remapped: Vec<NodeId> = match &self.slot(new_id)?.data {
                        NodeData::ScriptUnit { comments, .. } => {
                            comments.iter().map(|c| mapping[c]).collect()
                        }
                        _ => unreachable!(),
                    };
                    if let NodeData::ScriptUnit { comments, .. } =
                        &mut self.slot_mut(new_id)?.data
                    {
                        *comments = remapped;
                    }
                }
            }
            // The clone root is unparented regardless of the source's state.
            let root = mapping[&source];
            let slot = self.slot_mut(root)?;
            slot.parent = NodeId::NONE;
            slot.parent_prop = None;
            Ok(root)
        })();
        self.disable_events -= 1;
        match result {
            Ok(root) => {
                self.emit(&AstEvent::PostClone {
                    source,
                    clone: root,
                });
                self.modifying();
                Ok(root)
            }
            Err(e) => Err(e),
        }
    }
}

enum SlotPatch {
    One(NodeId),
    Many(Vec<NodeId>),
}
