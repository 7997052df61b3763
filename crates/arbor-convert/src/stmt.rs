//! Statement conversion rules.
//!
//! The front end splits `var a, b = 1;` into one internal declaration per
//! declarator; consecutive declarations that report the same declaration
//! start are reassembled into a single statement with one fragment per
//! declarator. Absent loop/branch bodies become empty statements so required
//! child slots are always populated.

use arbor_common::SourceRange;
use arbor_dom::{NodeFlags, NodeId, NodeKind, StructuralProperty, TreeError};
use arbor_sem::{SemData, SemId};

use crate::{ConvertError, Converter};

impl Converter<'_, '_> {
    pub(crate) fn convert_statement(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        let arena = self.arena;
        let internal = arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        match &internal.data {
            SemData::Block { statements } => {
                let statements = statements.clone();
                let block = self.ast.new_node(NodeKind::Block)?;
                self.convert_statements(&statements, block, StructuralProperty::Statements)?;
                self.finish(block, sem)
            }
            SemData::LocalDeclaration { .. } => self.convert_declaration_run(&[sem], false),
            SemData::IfStatement {
                condition,
                then_statement,
                else_statement,
            } => {
                let (condition, then_statement, else_statement) =
                    (*condition, *then_statement, *else_statement);
                let node = self.ast.new_node(NodeKind::IfStatement)?;
                let cond = self.convert_expression(condition)?;
                self.set_child(node, StructuralProperty::Expression, cond)?;
                let then_node = self.convert_action(then_statement)?;
                self.set_child(node, StructuralProperty::ThenStatement, then_node)?;
                if let Some(e) = else_statement {
                    let else_node = self.convert_statement(e)?;
                    self.set_child(node, StructuralProperty::ElseStatement, else_node)?;
                }
                self.finish(node, sem)
            }
            SemData::WhileStatement { condition, action } => {
                let (condition, action) = (*condition, *action);
                let node = self.ast.new_node(NodeKind::WhileStatement)?;
                let cond = self.convert_expression(condition)?;
                self.set_child(node, StructuralProperty::Expression, cond)?;
                let body = self.convert_action(action)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                self.finish(node, sem)
            }
            SemData::DoStatement { condition, action } => {
                let (condition, action) = (*condition, *action);
                let node = self.ast.new_node(NodeKind::DoStatement)?;
                let body = self.convert_action(action)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                let cond = self.convert_expression(condition)?;
                self.set_child(node, StructuralProperty::Expression, cond)?;
                self.finish(node, sem)
            }
            SemData::ForStatement {
                initializations,
                condition,
                increments,
                action,
            } => {
                let (initializations, condition, increments, action) = (
                    initializations.clone(),
                    *condition,
                    increments.clone(),
                    *action,
                );
                let node = self.ast.new_node(NodeKind::ForStatement)?;
                let mut i = 0;
                while i < initializations.len() {
                    let run = self.declaration_run(&initializations, i);
                    let (init, consumed) = if run == 0 {
                        (self.convert_expression(initializations[i])?, 1)
                    } else {
                        (
                            self.convert_declaration_run(&initializations[i..i + run], true)?,
                            run,
                        )
                    };
                    self.push_child(node, StructuralProperty::Initializers, init)?;
                    i += consumed;
                }
                if let Some(c) = condition {
                    let cond = self.convert_expression(c)?;
                    self.set_child(node, StructuralProperty::Expression, cond)?;
                }
                for u in increments {
                    let updater = self.convert_expression(u)?;
                    self.push_child(node, StructuralProperty::Updaters, updater)?;
                }
                let body = self.convert_action(action)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                self.finish(node, sem)
            }
            SemData::ForInStatement {
                iteration_variable,
                collection,
                action,
            } => {
                let (iteration_variable, collection, action) =
                    (*iteration_variable, *collection, *action);
                let node = self.ast.new_node(NodeKind::ForInStatement)?;
                let variable = if matches!(
                    arena.node(iteration_variable).data,
                    SemData::LocalDeclaration { .. }
                ) {
                    self.convert_declaration_run(&[iteration_variable], true)?
                } else {
                    self.convert_expression(iteration_variable)?
                };
                self.set_child(node, StructuralProperty::IterationVariable, variable)?;
                let coll = self.convert_expression(collection)?;
                self.set_child(node, StructuralProperty::Collection, coll)?;
                let body = self.convert_action(action)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                self.finish(node, sem)
            }
            SemData::BreakStatement { label } => {
                let label = label.clone();
                let node = self.ast.new_node(NodeKind::BreakStatement)?;
                if let Some(label) = label {
                    let (s, e) = self.selector_span(&label, start, end);
                    let name = self.simple_name(&label, s, e)?;
                    self.set_child(node, StructuralProperty::Label, name)?;
                }
                self.finish(node, sem)
            }
            SemData::ContinueStatement { label } => {
                let label = label.clone();
                let node = self.ast.new_node(NodeKind::ContinueStatement)?;
                if let Some(label) = label {
                    let (s, e) = self.selector_span(&label, start, end);
                    let name = self.simple_name(&label, s, e)?;
                    self.set_child(node, StructuralProperty::Label, name)?;
                }
                self.finish(node, sem)
            }
            SemData::ReturnStatement { expression } => {
                let expression = *expression;
                let node = self.ast.new_node(NodeKind::ReturnStatement)?;
                if let Some(e) = expression {
                    let expr = self.convert_expression(e)?;
                    self.set_child(node, StructuralProperty::Expression, expr)?;
                }
                self.finish(node, sem)
            }
            SemData::ThrowStatement { exception } => {
                let exception = *exception;
                let node = self.ast.new_node(NodeKind::ThrowStatement)?;
                let expr = self.convert_expression(exception)?;
                self.set_child(node, StructuralProperty::Expression, expr)?;
                self.finish(node, sem)
            }
            SemData::TryStatement {
                try_block,
                catch_arguments,
                catch_blocks,
                finally_block,
            } => {
                let (try_block, catch_arguments, catch_blocks, finally_block) = (
                    *try_block,
                    catch_arguments.clone(),
                    catch_blocks.clone(),
                    *finally_block,
                );
                let node = self.ast.new_node(NodeKind::TryStatement)?;
                let body = self.convert_statement(try_block)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                for (argument, block) in catch_arguments.iter().zip(&catch_blocks) {
                    let clause = self.convert_catch_clause(*argument, *block)?;
                    self.push_child(node, StructuralProperty::CatchClauses, clause)?;
                }
                if let Some(f) = finally_block {
                    let finally = self.convert_statement(f)?;
                    self.set_child(node, StructuralProperty::Finally, finally)?;
                }
                self.finish(node, sem)
            }
            SemData::SwitchStatement {
                expression,
                statements,
            } => {
                let (expression, statements) = (*expression, statements.clone());
                let node = self.ast.new_node(NodeKind::SwitchStatement)?;
                let expr = self.convert_expression(expression)?;
                self.set_child(node, StructuralProperty::Expression, expr)?;
                // Cases and their statements arrive interleaved and stay that
                // way in the flat statement list.
                self.convert_statements(&statements, node, StructuralProperty::Statements)?;
                self.finish(node, sem)
            }
            SemData::CaseStatement {
                constant_expression,
            } => {
                let constant_expression = *constant_expression;
                let node = self.ast.new_node(NodeKind::SwitchCase)?;
                if let Some(c) = constant_expression {
                    let expr = self.convert_expression(c)?;
                    self.set_child(node, StructuralProperty::Expression, expr)?;
                }
                self.finish(node, sem)
            }
            SemData::LabeledStatement { label, statement } => {
                let (label, statement) = (label.clone(), *statement);
                let node = self.ast.new_node(NodeKind::LabeledStatement)?;
                let (s, e) = self.selector_span(&label, start, end);
                let name = self.simple_name(&label, s, e)?;
                self.set_child(node, StructuralProperty::Label, name)?;
                let body = self.convert_statement(statement)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                self.finish(node, sem)
            }
            SemData::EmptyStatement => {
                let node = self.ast.new_node(NodeKind::EmptyStatement)?;
                self.finish(node, sem)
            }
            SemData::WithStatement { condition, action } => {
                let (condition, action) = (*condition, *action);
                let node = self.ast.new_node(NodeKind::WithStatement)?;
                let expr = self.convert_expression(condition)?;
                self.set_child(node, StructuralProperty::Expression, expr)?;
                let body = self.convert_action(action)?;
                self.set_child(node, StructuralProperty::Body, body)?;
                self.finish(node, sem)
            }
            SemData::MethodDeclaration { .. } => self.convert_method_declaration(sem),
            SemData::TypeDeclaration { .. } => self.convert_type_declaration_statement(sem),
            _ if internal.is_expression() => {
                let node = self.ast.new_node(NodeKind::ExpressionStatement)?;
                let expr = self.convert_expression(sem)?;
                self.set_child(node, StructuralProperty::Expression, expr)?;
                self.finish(node, sem)
            }
            _ => {
                let node = self.malformed_statement()?;
                self.ast.set_source_range(
                    node,
                    SourceRange::from_inclusive(start, end),
                )?;
                Ok(node)
            }
        }
    }

    /// Convert a statement list, merging split multi-declarator runs.
    pub(crate) fn convert_statements(
        &mut self,
        items: &[SemId],
        parent: NodeId,
        prop: StructuralProperty,
    ) -> Result<(), ConvertError> {
        let mut i = 0;
        while i < items.len() {
            let run = self.declaration_run(items, i);
            let (stmt, consumed) = if run == 0 {
                (self.convert_statement(items[i])?, 1)
            } else {
                (self.convert_declaration_run(&items[i..i + run], false)?, run)
            };
            self.push_child(parent, prop, stmt)?;
            i += consumed;
        }
        Ok(())
    }

    /// Length of the consecutive declaration run starting at `at` whose
    /// members all report the same declaration start, or 0 when `items[at]`
    /// is not a declaration.
    fn declaration_run(&self, items: &[SemId], at: usize) -> usize {
        let arena = self.arena;
        let SemData::LocalDeclaration {
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
                    SemData::LocalDeclaration { declaration_source_start, .. }
                        if *declaration_source_start == anchor
                )
            })
            .count()
    }

    /// One statement (or for-initializer expression) covering a run of
    /// same-start declarations, one fragment per declarator.
    pub(crate) fn convert_declaration_run(
        &mut self,
        decls: &[SemId],
        as_expression: bool,
    ) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        let arena = self.arena;
        let kind = if as_expression {
            NodeKind::VariableDeclarationExpression
        } else {
            NodeKind::VariableDeclarationStatement
        };
        let node = self.ast.new_node(kind)?;
        let mut decl_start = arena.node(decls[0]).source_start;
        let mut doc_anchor = None;
        for (idx, &decl) in decls.iter().enumerate() {
            let internal = arena.node(decl);
            let SemData::LocalDeclaration {
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
                let value = self.convert_expression(*init)?;
                self.set_child(fragment, StructuralProperty::Initializer, value)?;
            }
            self.finish_at(fragment, *name_start, internal.source_end, decl)?;
            self.push_child(node, StructuralProperty::Fragments, fragment)?;
        }
        if !as_expression {
            self.attach_doc(node, doc_anchor)?;
        }
        let end = arena
            .node(*decls.last().expect("declaration run is non-empty"))
            .source_end;
        self.finish_at(node, decl_start, end, decls[0])
    }

    fn convert_catch_clause(
        &mut self,
        argument: SemId,
        block: SemId,
    ) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let clause = self.ast.new_node(NodeKind::CatchClause)?;
        let exception = self.convert_argument(argument)?;
        self.set_child(clause, StructuralProperty::Exception, exception)?;
        let body = self.convert_statement(block)?;
        self.set_child(clause, StructuralProperty::Body, body)?;
        let start = arena.node(argument).source_start;
        let end = arena.node(block).source_end;
        self.ast.set_source_range(
            clause,
            SourceRange::from_inclusive(start, end),
        )?;
        self.ast.add_flags(clause, NodeFlags::ORIGINAL)?;
        Ok(clause)
    }

    /// An absent required body slot is filled with an empty statement.
    fn convert_action(&mut self, action: Option<SemId>) -> Result<NodeId, ConvertError> {
        match action {
            Some(s) => self.convert_statement(s),
            None => Ok(self.ast.new_node(NodeKind::EmptyStatement)?),
        }
    }

    /// A class shape in statement position. At the legacy api level the
    /// wrapper kind does not exist and the statement degrades to a
    /// recovery placeholder.
    fn convert_type_declaration_statement(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let internal = self.arena.node(sem);
        let (start, end) = (internal.source_start, internal.source_end);
        match self.ast.new_node(NodeKind::TypeDeclarationStatement) {
            Ok(node) => {
                let declaration = self.convert_type_declaration(sem)?;
                self.set_child(node, StructuralProperty::Declaration, declaration)?;
                self.finish(node, sem)
            }
            Err(TreeError::UnsupportedVariant(_)) => {
                let node = self.malformed_statement()?;
                self.ast.set_source_range(
                    node,
                    SourceRange::from_inclusive(start, end),
                )?;
                Ok(node)
            }
            Err(e) => Err(e.into()),
        }
    }
}
