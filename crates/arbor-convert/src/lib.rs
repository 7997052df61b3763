//! Internal-to-public tree conversion.
//!
//! [`convert_unit`] walks the front end's internal tree and produces a fresh
//! owning tree with public nodes, re-deriving everything the internal tree
//! encodes positionally or in packed bits: operator chains are flattened,
//! parenthesization levels become explicit wrapper nodes, multi-declarator
//! statements are reassembled from their split internal form, comments are
//! tabulated and doc comments attached, and every converted node is recorded
//! with the resolver when binding resolution was requested.

mod decl;
mod doc;
mod expr;
mod stmt;
mod trim;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, instrument};

use arbor_common::{CancelToken, CommentRange, SourceRange, scan_comment_ranges};
use arbor_dom::{
    Ast, NodeFlags, NodeId, NodeKind, SimpleProperty, SimpleValue, StructuralProperty, TreeError,
    TreeOptions,
};
use arbor_resolve::BindingResolver;
use arbor_sem::{SemArena, SemId, sem_bits};

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The cancel token was triggered; the partial tree is discarded.
    #[error("conversion cancelled")]
    Cancelled,
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Convert one internal unit into a new owning tree.
///
/// Returns the tree and the `ScriptUnit` root. When `resolver` is given,
/// node correspondences are recorded into it and its deferred scope fixups
/// are flushed before returning.
#[instrument(skip_all, fields(nodes = arena.len()))]
pub fn convert_unit<'a>(
    arena: &'a SemArena,
    unit: SemId,
    source: &'a str,
    options: TreeOptions,
    cancel: Option<CancelToken>,
    mut resolver: Option<&mut BindingResolver<'a>>,
) -> Result<(Ast, NodeId), ConvertError> {
    let mut converter = Converter {
        arena,
        source,
        ast: Ast::new(options),
        comments: scan_comment_ranges(source),
        cancel,
        resolver: resolver.as_deref_mut(),
        current_declaration: None,
        doc_nodes: FxHashMap::default(),
    };
    let root = converter.convert_unit_node(unit)?;
    converter.build_comment_table(root)?;
    if let Some(r) = converter.resolver.as_deref_mut() {
        r.flush_scope_fixups();
    }
    debug!(comments = converter.comments.len(), "unit converted");
    Ok((converter.ast, root))
}

pub(crate) struct Converter<'a, 'r> {
    pub(crate) arena: &'a SemArena,
    pub(crate) source: &'a str,
    pub(crate) ast: Ast,
    pub(crate) comments: Vec<CommentRange>,
    cancel: Option<CancelToken>,
    pub(crate) resolver: Option<&'r mut BindingResolver<'a>>,
    /// Declaration whose scope governs deferred `this`/name fixups, when
    /// converting a field initializer or initializer block.
    pub(crate) current_declaration: Option<SemId>,
    /// Doc comment nodes by comment start offset; shared between the
    /// attachment site and the unit comment table.
    pub(crate) doc_nodes: FxHashMap<u32, NodeId>,
}

impl Converter<'_, '_> {
    /// Cancellation is polled once per node dispatch.
    pub(crate) fn checkpoint(&self) -> Result<(), ConvertError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(ConvertError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Stamp range, flags, and the resolver correspondence onto a converted
    /// node. The internal recovery bit carries over as `RECOVERED`.
    pub(crate) fn finish(&mut self, node: NodeId, sem: SemId) -> Result<NodeId, ConvertError> {
        let internal = self.arena.node(sem);
        self.finish_at(node, internal.source_start, internal.source_end, sem)
    }

    pub(crate) fn finish_at(
        &mut self,
        node: NodeId,
        start: u32,
        end: u32,
        sem: SemId,
    ) -> Result<NodeId, ConvertError> {
        self.ast
            .set_source_range(node, SourceRange::from_inclusive(start, end))?;
        let mut flags = NodeFlags::ORIGINAL;
        if self.arena.node(sem).bits & sem_bits::IS_RECOVERED != 0 {
            flags |= NodeFlags::RECOVERED;
        }
        self.ast.add_flags(node, flags)?;
        if let Some(r) = self.resolver.as_deref_mut() {
            r.record_node(node, sem);
        }
        Ok(node)
    }

    /// A `SimpleName` over `[start, end]` of the source.
    pub(crate) fn simple_name(
        &mut self,
        identifier: &str,
        start: u32,
        end: u32,
    ) -> Result<NodeId, ConvertError> {
        let node = self.ast.new_node(NodeKind::SimpleName)?;
        self.ast.set_value(
            node,
            SimpleProperty::Identifier,
            SimpleValue::Str(identifier.to_string()),
        )?;
        self.ast
            .set_source_range(node, SourceRange::from_inclusive(start, end))?;
        self.ast.add_flags(node, NodeFlags::ORIGINAL)?;
        Ok(node)
    }

    /// Placeholder for an expression that could not be converted.
    pub(crate) fn malformed_expression(&mut self) -> Result<NodeId, ConvertError> {
        let node = self.ast.new_node(NodeKind::EmptyExpression)?;
        self.ast.add_flags(node, NodeFlags::MALFORMED)?;
        Ok(node)
    }

    /// Placeholder for a statement that could not be converted.
    pub(crate) fn malformed_statement(&mut self) -> Result<NodeId, ConvertError> {
        let node = self.ast.new_node(NodeKind::EmptyStatement)?;
        let mut flags = NodeFlags::MALFORMED;
        if self.ast.options().statements_recovery {
            flags |= NodeFlags::RECOVERED;
        }
        self.ast.add_flags(node, flags)?;
        Ok(node)
    }

    pub(crate) fn set_child(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        child: NodeId,
    ) -> Result<(), ConvertError> {
        self.ast.set_child(parent, property, Some(child))?;
        Ok(())
    }

    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        property: StructuralProperty,
        child: NodeId,
    ) -> Result<(), ConvertError> {
        self.ast.list_push(parent, property, child)?;
        Ok(())
    }
}
