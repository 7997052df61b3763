//! Declaration-level conversion: the unit itself, imports, functions,
//! class shapes, fields, and type references.
//!
//! Field initializers and initializer blocks convert with
//! `current_declaration` pointing at their internal declaration, so that
//! unresolved names and `this` inside them are deferred to the resolver's
//! scope fixup pass.

use arbor_common::SourceRange;
use arbor_dom::{
    ApiLevel, NodeFlags, NodeId, NodeKind, SimpleProperty, SimpleValue, StructuralProperty,
};
use arbor_sem::{SemData, SemId};

use crate::{ConvertError, Converter};

impl Converter<'_, '_> {
    pub(crate) fn convert_unit_node(&mut self, unit: SemId) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        let arena = self.arena;
        let root = self.ast.new_node(NodeKind::ScriptUnit)?;
        let SemData::Unit {
            package,
            imports,
            statements,
        } = &arena.node(unit).data
        else {
            self.ast.add_flags(root, NodeFlags::MALFORMED)?;
            return Ok(root);
        };
        let (package, imports, statements) = (*package, imports.clone(), statements.clone());
        if let Some(p) = package {
            let decl = self.convert_package(p)?;
            self.set_child(root, StructuralProperty::Package, decl)?;
        }
        for import in imports {
            let decl = self.convert_import(import)?;
            self.push_child(root, StructuralProperty::Imports, decl)?;
        }
        self.convert_statements(&statements, root, StructuralProperty::Statements)?;
        self.finish(root, unit)
    }

    fn convert_package(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let internal = arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        let SemData::ImportReference { tokens, .. } = &internal.data else {
            let node = self.ast.new_node(NodeKind::PackageDeclaration)?;
            self.ast.add_flags(node, NodeFlags::MALFORMED)?;
            return Ok(node);
        };
        let tokens = tokens.clone();
        let node = self.ast.new_node(NodeKind::PackageDeclaration)?;
        let name = self.convert_dotted_name(&tokens, start, end, sem)?;
        self.set_child(node, StructuralProperty::Name, name)?;
        self.finish(node, sem)
    }

    fn convert_import(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let internal = arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        let SemData::ImportReference { tokens, on_demand } = &internal.data else {
            let node = self.ast.new_node(NodeKind::ImportDeclaration)?;
            self.ast.add_flags(node, NodeFlags::MALFORMED)?;
            return Ok(node);
        };
        let (tokens, on_demand) = (tokens.clone(), *on_demand);
        let node = self.ast.new_node(NodeKind::ImportDeclaration)?;
        let name = self.convert_dotted_name(&tokens, start, end, sem)?;
        self.set_child(node, StructuralProperty::Name, name)?;
        self.ast.set_value(
            node,
            SimpleProperty::OnDemand,
            SimpleValue::Bool(on_demand),
        )?;
        self.finish(node, sem)
    }

    pub(crate) fn convert_method_declaration(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        let arena = self.arena;
        let internal = arena.node(sem);
        let SemData::MethodDeclaration {
            selector,
            name_start,
            name_end,
            arguments,
            statements,
            is_constructor,
            doc_anchor,
            ..
        } = &internal.data
        else {
            let internal = arena.node(sem);
            let node = self.malformed_statement()?;
            self.ast.set_source_range(
                node,
                SourceRange::from_inclusive(internal.source_start, internal.source_end),
            )?;
            return Ok(node);
        };
        let (selector, name_start, name_end, arguments, statements, is_constructor, doc_anchor) = (
            selector.clone(),
            *name_start,
            *name_end,
            arguments.clone(),
            statements.clone(),
            *is_constructor,
            *doc_anchor,
        );
        let node = self.ast.new_node(NodeKind::FunctionDeclaration)?;
        self.attach_doc(node, doc_anchor)?;
        // An anonymous function keeps its name slot empty.
        if let Some(selector) = selector.filter(|s| !s.is_empty()) {
            let name = self.simple_name(&selector, name_start, name_end)?;
            self.set_child(node, StructuralProperty::Name, name)?;
        }
        for argument in arguments {
            let parameter = self.convert_argument(argument)?;
            self.push_child(node, StructuralProperty::Parameters, parameter)?;
        }
        let body = self.ast.new_node(NodeKind::Block)?;
        self.convert_statements(&statements, body, StructuralProperty::Statements)?;
        if let (Some(&first), Some(&last)) = (statements.first(), statements.last()) {
            self.ast.set_source_range(
                body,
                SourceRange::from_inclusive(
                    arena.node(first).source_start,
                    arena.node(last).source_end,
                ),
            )?;
        }
        self.ast.add_flags(body, NodeFlags::ORIGINAL)?;
        self.set_child(node, StructuralProperty::Body, body)?;
        self.ast.set_value(
            node,
            SimpleProperty::IsConstructor,
            SimpleValue::Bool(is_constructor),
        )?;
        self.finish(node, sem)
    }

    pub(crate) fn convert_argument(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let internal = arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        let SemData::Argument { name, type_ref, .. } = &internal.data else {
            let node = self.ast.new_node(NodeKind::SingleVariableDeclaration)?;
            self.ast.add_flags(node, NodeFlags::MALFORMED)?;
            return Ok(node);
        };
        let (name, type_ref) = (name.clone(), *type_ref);
        let node = self.ast.new_node(NodeKind::SingleVariableDeclaration)?;
        let (s, e) = self.selector_span(&name, start, end);
        let name_node = self.simple_name(&name, s, e)?;
        self.set_child(node, StructuralProperty::Name, name_node)?;
        if let Some(t) = type_ref {
            let ty = self.convert_type_reference(t)?;
            self.set_child(node, StructuralProperty::VarType, ty)?;
        }
        self.finish(node, sem)
    }

    pub(crate) fn convert_type_declaration(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        let arena = self.arena;
        let internal = arena.node(sem);
        let SemData::TypeDeclaration {
            name,
            name_start,
            name_end,
            superclass,
            fields,
            methods,
            doc_anchor,
            ..
        } = &internal.data
        else {
            let node = self.malformed_statement()?;
            return Ok(node);
        };
        let (name, name_start, name_end, superclass, doc_anchor) = (
            name.clone(),
            *name_start,
            *name_end,
            *superclass,
            *doc_anchor,
        );
        // Body members arrive in two internal lists; source order interleaves
        // them.
        let mut members: Vec<SemId> = fields.iter().chain(methods.iter()).copied().collect();
        members.sort_by_key(|&m| arena.node(m).source_start);

        let node = self.ast.new_node(NodeKind::TypeDeclaration)?;
        self.attach_doc(node, doc_anchor)?;
        let name_node = self.simple_name(&name, name_start, name_end)?;
        self.set_child(node, StructuralProperty::Name, name_node)?;
        if let Some(s) = superclass {
            let ty = self.convert_type_reference(s)?;
            self.set_child(node, StructuralProperty::Superclass, ty)?;
        }
        let mut i = 0;
        while i < members.len() {
            let run = self.field_run(&members, i);
            let (member, consumed) = if run == 0 {
                let m = members[i];
                let converted = match &arena.node(m).data {
                    SemData::MethodDeclaration { .. } => self.convert_method_declaration(m)?,
                    SemData::InitializerBlock { .. } => self.convert_initializer_block(m)?,
                    _ => self.malformed_statement()?,
                };
                (converted, 1)
            } else {
                (self.convert_field_run(&members[i..i + run])?, run)
            };
            self.push_child(node, StructuralProperty::BodyDeclarations, member)?;
            i += consumed;
        }
        self.finish(node, sem)
    }

    fn field_run(&self, items: &[SemId], at: usize) -> usize {
        let arena = self.arena;
        let SemData::FieldDeclaration {
            declaration_source_start: anchor,
            ..
        } = &arena.node(items[at]).data
        else {
            return 0;
        };
        let anchor = *anchor;
        items[at..]
            .iter()
            .take_while(|&&s| {
                matches!(
                    &arena.node(s).data,
                    SemData::FieldDeclaration { declaration_source_start, .. }
                        if *declaration_source_start == anchor
                )
            })
            .count()
    }

    fn convert_field_run(&mut self, decls: &[SemId]) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let node = self.ast.new_node(NodeKind::FieldDeclaration)?;
        let mut decl_start = arena.node(decls[0]).source_start;
        let mut doc_anchor = None;
        for (idx, &decl) in decls.iter().enumerate() {
            let internal = arena.node(decl);
            let SemData::FieldDeclaration {
                name,
                name_start,
                name_end,
                declaration_source_start,
                initializer,
                doc_anchor: anchor,
                ..
            } = &internal.data
            else {
                continue;
            };
            if idx == 0 {
                decl_start = *declaration_source_start;
                doc_anchor = *anchor;
            }
            let fragment = self.ast.new_node(NodeKind::VariableDeclarationFragment)?;
            let name_node = self.simple_name(name, *name_start, *name_end)?;
            self.set_child(fragment, StructuralProperty::Name, name_node)?;
            if let Some(init) = initializer {
                let previous = self.current_declaration.replace(decl);
                let value = self.convert_expression(*init);
                self.current_declaration = previous;
                let value = value?;
                self.set_child(fragment, StructuralProperty::Initializer, value)?;
            }
            self.finish_at(fragment, *name_start, internal.source_end, decl)?;
            self.push_child(node, StructuralProperty::Fragments, fragment)?;
        }
        self.attach_doc(node, doc_anchor)?;
        let end = arena
            .node(*decls.last().expect("field run is non-empty"))
            .source_end;
        self.finish_at(node, decl_start, end, decls[0])
    }

    fn convert_initializer_block(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let SemData::InitializerBlock { block, is_static } = &arena.node(sem).data else {
            return self.malformed_statement();
        };
        let (block, is_static) = (*block, *is_static);
        let node = self.ast.new_node(NodeKind::Initializer)?;
        self.ast
            .set_value(node, SimpleProperty::IsStatic, SimpleValue::Bool(is_static))?;
        let previous = self.current_declaration.replace(sem);
        let body = self.convert_statement(block);
        self.current_declaration = previous;
        let body = body?;
        self.set_child(node, StructuralProperty::Body, body)?;
        self.finish(node, sem)
    }

    pub(crate) fn convert_type_reference(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let internal = arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        match &internal.data {
            SemData::SingleTypeReference { name, .. } => {
                let name = name.clone();
                let node = self.ast.new_node(NodeKind::SimpleType)?;
                let name_node = self.simple_name(&name, start, end)?;
                self.set_child(node, StructuralProperty::Name, name_node)?;
                self.finish(node, sem)
            }
            SemData::QualifiedTypeReference { tokens, .. } => {
                let tokens = tokens.clone();
                self.convert_qualified_type(&tokens, start, end, sem)
            }
            SemData::ArrayTypeReference {
                name, dimensions, ..
            } => {
                let (name, dimensions) = (name.clone(), *dimensions);
                let base = self.ast.new_node(NodeKind::SimpleType)?;
                let (s, e) = self.selector_span(&name, start, end);
                let name_node = self.simple_name(&name, s, e)?;
                self.set_child(base, StructuralProperty::Name, name_node)?;
                self.ast
                    .set_source_range(base, SourceRange::from_inclusive(s, e))?;
                self.ast.add_flags(base, NodeFlags::ORIGINAL)?;
                let mut acc = base;
                for _ in 0..dimensions.max(1) {
                    let array = self.ast.new_node(NodeKind::ArrayType)?;
                    self.set_child(array, StructuralProperty::ComponentType, acc)?;
                    acc = array;
                }
                self.finish_at(acc, start, end, sem)
            }
            _ => {
                let node = self.ast.new_node(NodeKind::SimpleType)?;
                self.ast.add_flags(node, NodeFlags::MALFORMED)?;
                self.ast
                    .set_source_range(node, SourceRange::from_inclusive(start, end))?;
                Ok(node)
            }
        }
    }

    /// A dotted type. At the legacy api level `QualifiedType` does not exist,
    /// so the whole path becomes a simple type over a qualified name.
    fn convert_qualified_type(
        &mut self,
        tokens: &[String],
        start: u32,
        end: u32,
        sem: SemId,
    ) -> Result<NodeId, ConvertError> {
        if tokens.len() <= 1 || self.ast.options().api_level == ApiLevel::Legacy {
            let node = self.ast.new_node(NodeKind::SimpleType)?;
            let name = self.convert_dotted_name(tokens, start, end, sem)?;
            self.set_child(node, StructuralProperty::Name, name)?;
            return self.finish_at(node, start, end, sem);
        }
        let spans = crate::trim::token_spans(self.source, start, end, tokens);
        let first = self.ast.new_node(NodeKind::SimpleType)?;
        let first_name = self.simple_name(&tokens[0], spans[0].0, spans[0].1)?;
        self.set_child(first, StructuralProperty::Name, first_name)?;
        self.ast.set_source_range(
            first,
            SourceRange::from_inclusive(spans[0].0, spans[0].1),
        )?;
        self.ast.add_flags(first, NodeFlags::ORIGINAL)?;
        let mut acc = first;
        for (token, span) in tokens.iter().zip(&spans).skip(1) {
            let qualified = self.ast.new_node(NodeKind::QualifiedType)?;
            self.ast
                .set_child(qualified, StructuralProperty::Qualifier, Some(acc))?;
            let name = self.simple_name(token, span.0, span.1)?;
            self.ast
                .set_child(qualified, StructuralProperty::Name, Some(name))?;
            self.ast.set_source_range(
                qualified,
                SourceRange::from_inclusive(spans[0].0, span.1),
            )?;
            self.ast.add_flags(qualified, NodeFlags::ORIGINAL)?;
            acc = qualified;
        }
        self.finish_at(acc, start, end, sem)
    }
}
