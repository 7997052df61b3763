//! Expression conversion rules.
//!
//! Two internal encodings get undone here. Parenthesization is a depth
//! counter in the internal node's bits; each level becomes an explicit
//! `ParenthesizedExpression` whose child range is re-trimmed one paren pair
//! inward. Left-associative operator chains arrive as left-leaning spines of
//! same-operator binary nodes; the spine is walked down its left edge,
//! stopping at a different operator or an explicitly parenthesized operand,
//! and re-emitted as one `InfixExpression` with extended operands.

use smallvec::SmallVec;

use arbor_common::SourceRange;
use arbor_dom::{
    AssignmentOperator, InfixOperator, NodeFlags, NodeId, NodeKind, PostfixOperator,
    PrefixOperator, PropertyKind, SimpleProperty, SimpleValue, StructuralProperty,
};
use arbor_resolve::FixupTarget;
use arbor_sem::{ObjectFieldKind, SemData, SemId, op};

use crate::{ConvertError, Converter, trim};

pub(crate) fn map_infix_op(id: u32) -> Option<InfixOperator> {
    Some(match id {
        op::AND_AND => InfixOperator::ConditionalAnd,
        op::OR_OR => InfixOperator::ConditionalOr,
        op::AND => InfixOperator::And,
        op::OR => InfixOperator::Or,
        op::XOR => InfixOperator::Xor,
        op::PLUS => InfixOperator::Plus,
        op::MINUS => InfixOperator::Minus,
        op::TIMES => InfixOperator::Times,
        op::DIVIDE => InfixOperator::Divide,
        op::REMAINDER => InfixOperator::Remainder,
        op::LEFT_SHIFT => InfixOperator::LeftShift,
        op::RIGHT_SHIFT_SIGNED => InfixOperator::RightShiftSigned,
        op::RIGHT_SHIFT_UNSIGNED => InfixOperator::RightShiftUnsigned,
        op::LESS => InfixOperator::Less,
        op::LESS_EQUAL => InfixOperator::LessEquals,
        op::GREATER => InfixOperator::Greater,
        op::GREATER_EQUAL => InfixOperator::GreaterEquals,
        op::EQUAL_EQUAL => InfixOperator::Equals,
        op::NOT_EQUAL => InfixOperator::NotEquals,
        op::EQUAL_EQUAL_EQUAL => InfixOperator::EqualEqualEqual,
        op::NOT_EQUAL_EQUAL => InfixOperator::NotEqualEqual,
        op::INSTANCEOF => InfixOperator::InstanceOf,
        op::IN => InfixOperator::In,
        _ => return None,
    })
}

fn map_compound_assign_op(id: u32) -> Option<AssignmentOperator> {
    Some(match id {
        op::PLUS => AssignmentOperator::PlusAssign,
        op::MINUS => AssignmentOperator::MinusAssign,
        op::TIMES => AssignmentOperator::TimesAssign,
        op::DIVIDE => AssignmentOperator::DivideAssign,
        op::REMAINDER => AssignmentOperator::RemainderAssign,
        op::LEFT_SHIFT => AssignmentOperator::LeftShiftAssign,
        op::RIGHT_SHIFT_SIGNED => AssignmentOperator::RightShiftSignedAssign,
        op::RIGHT_SHIFT_UNSIGNED => AssignmentOperator::RightShiftUnsignedAssign,
        op::AND => AssignmentOperator::AndAssign,
        op::OR => AssignmentOperator::OrAssign,
        op::XOR => AssignmentOperator::XorAssign,
        _ => return None,
    })
}

fn map_prefix_op(id: u32) -> Option<PrefixOperator> {
    Some(match id {
        op::PLUS_PLUS => PrefixOperator::Increment,
        op::MINUS_MINUS => PrefixOperator::Decrement,
        op::UNARY_PLUS => PrefixOperator::Plus,
        op::UNARY_MINUS => PrefixOperator::Minus,
        op::TWIDDLE => PrefixOperator::Complement,
        op::NOT => PrefixOperator::Not,
        op::TYPEOF => PrefixOperator::TypeOf,
        op::DELETE => PrefixOperator::Delete,
        op::VOID => PrefixOperator::Void,
        _ => return None,
    })
}

fn map_postfix_op(id: u32) -> Option<PostfixOperator> {
    Some(match id {
        op::PLUS_PLUS => PostfixOperator::Increment,
        op::MINUS_MINUS => PostfixOperator::Decrement,
        _ => return None,
    })
}

impl Converter<'_, '_> {
    pub(crate) fn convert_expression(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let node = self.arena.node(sem);
        self.convert_expression_levels(sem, node.paren_depth(), node.source_start, node.source_end)
    }

    /// Unwrap one paren level per recursion; the inner range is re-trimmed
    /// from the bytes each time.
    fn convert_expression_levels(
        &mut self,
        sem: SemId,
        depth: u32,
        start: u32,
        end: u32,
    ) -> Result<NodeId, ConvertError> {
        self.checkpoint()?;
        if depth == 0 {
            return self.convert_expression_inner(sem, start, end);
        }
        let wrapper = self.ast.new_node(NodeKind::ParenthesizedExpression)?;
        let (inner_start, inner_end) = trim::trim_one_paren(self.source, start, end);
        let inner = self.convert_expression_levels(sem, depth - 1, inner_start, inner_end)?;
        self.set_child(wrapper, StructuralProperty::Expression, inner)?;
        self.finish_at(wrapper, start, end, sem)
    }

    fn convert_expression_inner(
        &mut self,
        sem: SemId,
        start: u32,
        end: u32,
    ) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        match &arena.node(sem).data {
            SemData::SingleNameReference { name, binding } => {
                let node = self.simple_name(name, start, end)?;
                if binding.is_none() {
                    self.defer_name_fixup(node, name);
                }
                self.finish_at(node, start, end, sem)
            }
            SemData::QualifiedNameReference { tokens, .. } => {
                self.convert_dotted_name(tokens, start, end, sem)
            }
            SemData::ThisReference => {
                let node = self.ast.new_node(NodeKind::ThisExpression)?;
                self.defer_this_fixup(node);
                self.finish_at(node, start, end, sem)
            }
            SemData::FieldReference {
                receiver, token, ..
            } => {
                let node = self.ast.new_node(NodeKind::FieldAccess)?;
                let receiver_node = self.convert_expression(*receiver)?;
                self.set_child(node, StructuralProperty::Expression, receiver_node)?;
                let token_len = token.len() as u32;
                let name_start = (end + 1).saturating_sub(token_len).max(start);
                let name = self.simple_name(token, name_start, end)?;
                self.set_child(node, StructuralProperty::Name, name)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::ArrayReference { receiver, position } => {
                let node = self.ast.new_node(NodeKind::ArrayAccess)?;
                let array = self.convert_expression(*receiver)?;
                self.set_child(node, StructuralProperty::Array, array)?;
                let index = self.convert_expression(*position)?;
                self.set_child(node, StructuralProperty::Index, index)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::MessageSend {
                receiver,
                selector,
                arguments,
                ..
            } => {
                let (receiver, selector, arguments) =
                    (*receiver, selector.clone(), arguments.clone());
                let node = self.ast.new_node(NodeKind::FunctionInvocation)?;
                if let Some(r) = receiver {
                    let expr = self.convert_expression(r)?;
                    self.set_child(node, StructuralProperty::Expression, expr)?;
                }
                if !selector.is_empty() {
                    let (sel_start, sel_end) = self.selector_span(&selector, start, end);
                    let name = self.simple_name(&selector, sel_start, sel_end)?;
                    self.set_child(node, StructuralProperty::Name, name)?;
                }
                for arg in arguments {
                    let converted = self.convert_expression(arg)?;
                    self.push_child(node, StructuralProperty::Arguments, converted)?;
                }
                let end = trim::trim_call_end(self.source, start, end);
                self.finish_at(node, start, end, sem)
            }
            SemData::AllocationExpression {
                member, arguments, ..
            } => {
                let (member, arguments) = (*member, arguments.clone());
                let node = self.ast.new_node(NodeKind::ClassInstanceCreation)?;
                let member_node = self.convert_expression(member)?;
                self.set_child(node, StructuralProperty::Member, member_node)?;
                for arg in arguments {
                    let converted = self.convert_expression(arg)?;
                    self.push_child(node, StructuralProperty::Arguments, converted)?;
                }
                let end = trim::trim_call_end(self.source, start, end);
                self.finish_at(node, start, end, sem)
            }
            SemData::AndAndExpression { .. }
            | SemData::OrOrExpression { .. }
            | SemData::BinaryExpression { .. }
            | SemData::StringLiteralConcatenation { .. } => self.convert_infix(sem, start, end),
            SemData::UnaryExpression { operand } | SemData::PrefixExpression { operand } => {
                let operand = *operand;
                match map_prefix_op(arena.node(sem).operator()) {
                    Some(operator) => {
                        let node = self.ast.new_node(NodeKind::PrefixExpression)?;
                        self.ast.set_value(
                            node,
                            SimpleProperty::Operator,
                            SimpleValue::PrefixOp(operator),
                        )?;
                        let operand_node = self.convert_expression(operand)?;
                        self.set_child(node, StructuralProperty::Operand, operand_node)?;
                        self.finish_at(node, start, end, sem)
                    }
                    None => self.malformed_expression_at(start, end),
                }
            }
            SemData::PostfixExpression { operand } => {
                let operand = *operand;
                match map_postfix_op(arena.node(sem).operator()) {
                    Some(operator) => {
                        let node = self.ast.new_node(NodeKind::PostfixExpression)?;
                        self.ast.set_value(
                            node,
                            SimpleProperty::Operator,
                            SimpleValue::PostfixOp(operator),
                        )?;
                        let operand_node = self.convert_expression(operand)?;
                        self.set_child(node, StructuralProperty::Operand, operand_node)?;
                        self.finish_at(node, start, end, sem)
                    }
                    None => self.malformed_expression_at(start, end),
                }
            }
            SemData::ConditionalExpression {
                condition,
                then_expr,
                else_expr,
            } => {
                let (condition, then_expr, else_expr) = (*condition, *then_expr, *else_expr);
                let node = self.ast.new_node(NodeKind::ConditionalExpression)?;
                let cond = self.convert_expression(condition)?;
                self.set_child(node, StructuralProperty::Expression, cond)?;
                let then_node = self.convert_expression(then_expr)?;
                self.set_child(node, StructuralProperty::ThenExpression, then_node)?;
                let else_node = self.convert_expression(else_expr)?;
                self.set_child(node, StructuralProperty::ElseExpression, else_node)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::Assignment { lhs, rhs } => {
                let (lhs, rhs) = (*lhs, *rhs);
                self.convert_assignment(sem, lhs, rhs, AssignmentOperator::Assign, start, end)
            }
            SemData::CompoundAssignment { lhs, rhs } => {
                let (lhs, rhs) = (*lhs, *rhs);
                match map_compound_assign_op(arena.node(sem).operator()) {
                    Some(operator) => {
                        self.convert_assignment(sem, lhs, rhs, operator, start, end)
                    }
                    None => self.malformed_expression_at(start, end),
                }
            }
            SemData::NumberLiteral { token } => {
                let node = self.ast.new_node(NodeKind::NumberLiteral)?;
                self.ast.set_value(
                    node,
                    SimpleProperty::Token,
                    SimpleValue::Str(token.clone()),
                )?;
                self.finish_at(node, start, end, sem)
            }
            SemData::StringLiteral { token } => {
                let node = self.ast.new_node(NodeKind::StringLiteral)?;
                self.ast.set_value(
                    node,
                    SimpleProperty::EscapedValue,
                    SimpleValue::Str(token.clone()),
                )?;
                self.finish_at(node, start, end, sem)
            }
            SemData::RegExLiteral { token } => {
                let node = self.ast.new_node(NodeKind::RegularExpressionLiteral)?;
                self.ast.set_value(
                    node,
                    SimpleProperty::Token,
                    SimpleValue::Str(token.clone()),
                )?;
                self.finish_at(node, start, end, sem)
            }
            SemData::TrueLiteral | SemData::FalseLiteral => {
                let value = matches!(arena.node(sem).data, SemData::TrueLiteral);
                let node = self.ast.new_node(NodeKind::BooleanLiteral)?;
                self.ast.set_value(
                    node,
                    SimpleProperty::BooleanValue,
                    SimpleValue::Bool(value),
                )?;
                self.finish_at(node, start, end, sem)
            }
            SemData::NullLiteral => {
                let node = self.ast.new_node(NodeKind::NullLiteral)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::UndefinedLiteral => {
                let node = self.ast.new_node(NodeKind::UndefinedLiteral)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::ArrayInitializer { expressions } => {
                let expressions = expressions.clone();
                let node = self.ast.new_node(NodeKind::ArrayInitializer)?;
                for e in expressions {
                    let converted = self.convert_expression(e)?;
                    self.push_child(node, StructuralProperty::Expressions, converted)?;
                }
                self.finish_at(node, start, end, sem)
            }
            SemData::ObjectLiteral { fields } => {
                let fields = fields.clone();
                let node = self.ast.new_node(NodeKind::ObjectLiteral)?;
                for f in fields {
                    let converted = self.convert_object_field(f)?;
                    self.push_child(node, StructuralProperty::Fields, converted)?;
                }
                self.finish_at(node, start, end, sem)
            }
            SemData::FunctionExpression { method } => {
                let method = *method;
                let node = self.ast.new_node(NodeKind::FunctionExpression)?;
                let declaration = self.convert_method_declaration(method)?;
                self.set_child(node, StructuralProperty::Method, declaration)?;
                self.finish_at(node, start, end, sem)
            }
            SemData::ListExpression { expressions } => {
                let expressions = expressions.clone();
                let node = self.ast.new_node(NodeKind::ListExpression)?;
                for e in expressions {
                    let converted = self.convert_expression(e)?;
                    self.push_child(node, StructuralProperty::Expressions, converted)?;
                }
                self.finish_at(node, start, end, sem)
            }
            _ => self.malformed_expression_at(start, end),
        }
    }

    fn convert_assignment(
        &mut self,
        sem: SemId,
        lhs: SemId,
        rhs: SemId,
        operator: AssignmentOperator,
        start: u32,
        end: u32,
    ) -> Result<NodeId, ConvertError> {
        let node = self.ast.new_node(NodeKind::Assignment)?;
        self.ast.set_value(
            node,
            SimpleProperty::Operator,
            SimpleValue::AssignOp(operator),
        )?;
        let left = self.convert_expression(lhs)?;
        self.set_child(node, StructuralProperty::LeftOperand, left)?;
        let right = self.convert_expression(rhs)?;
        self.set_child(node, StructuralProperty::RightOperand, right)?;
        self.finish_at(node, start, end, sem)
    }

    /// Flatten a same-operator left spine into one infix node with extended
    /// operands. The walk stops at a different operator or at a left operand
    /// that carries explicit parentheses.
    fn convert_infix(&mut self, sem: SemId, start: u32, end: u32) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        if let SemData::StringLiteralConcatenation { literals } = &arena.node(sem).data {
            let literals = literals.clone();
            if literals.len() < 2 {
                return self.malformed_expression_at(start, end);
            }
            let node = self.ast.new_node(NodeKind::InfixExpression)?;
            self.ast.set_value(
                node,
                SimpleProperty::Operator,
                SimpleValue::InfixOp(InfixOperator::Plus),
            )?;
            let left = self.convert_expression(literals[0])?;
            self.set_child(node, StructuralProperty::LeftOperand, left)?;
            let right = self.convert_expression(literals[1])?;
            self.set_child(node, StructuralProperty::RightOperand, right)?;
            for lit in &literals[2..] {
                let converted = self.convert_expression(*lit)?;
                self.push_child(node, StructuralProperty::ExtendedOperands, converted)?;
            }
            return self.finish_at(node, start, end, sem);
        }

        let Some(operator) = self.infix_operator_of(sem) else {
            return self.malformed_expression_at(start, end);
        };

        // Walk down the left edge collecting right operands outermost first.
        let mut rights: SmallVec<[SemId; 8]> = SmallVec::new();
        let mut cursor = sem;
        let leftmost = loop {
            let (left, right) = match &arena.node(cursor).data {
                SemData::AndAndExpression { left, right }
                | SemData::OrOrExpression { left, right }
                | SemData::BinaryExpression { left, right } => (*left, *right),
                _ => return self.malformed_expression_at(start, end),
            };
            rights.push(right);
            let descend = operator.is_flattenable()
                && self.infix_operator_of(left) == Some(operator)
                && arena.node(left).paren_depth() == 0;
            if descend {
                cursor = left;
            } else {
                break left;
            }
        };

        let node = self.ast.new_node(NodeKind::InfixExpression)?;
        self.ast.set_value(
            node,
            SimpleProperty::Operator,
            SimpleValue::InfixOp(operator),
        )?;
        let left = self.convert_expression(leftmost)?;
        self.set_child(node, StructuralProperty::LeftOperand, left)?;
        // Innermost right is the infix right operand, the rest are extended
        // operands in source order.
        let mut remaining = rights.into_iter().rev();
        let first = remaining.next().expect("spine has at least one level");
        let right = self.convert_expression(first)?;
        self.set_child(node, StructuralProperty::RightOperand, right)?;
        for r in remaining {
            let converted = self.convert_expression(r)?;
            self.push_child(node, StructuralProperty::ExtendedOperands, converted)?;
        }
        self.finish_at(node, start, end, sem)
    }

    fn infix_operator_of(&self, sem: SemId) -> Option<InfixOperator> {
        let node = self.arena.node(sem);
        match node.data {
            SemData::AndAndExpression { .. } => Some(InfixOperator::ConditionalAnd),
            SemData::OrOrExpression { .. } => Some(InfixOperator::ConditionalOr),
            SemData::BinaryExpression { .. } => map_infix_op(node.operator()),
            _ => None,
        }
    }

    fn convert_object_field(&mut self, sem: SemId) -> Result<NodeId, ConvertError> {
        let arena = self.arena;
        let (name, initializer, kind) = match &arena.node(sem).data {
            SemData::ObjectLiteralField {
                name,
                initializer,
                kind,
                ..
            } => (*name, *initializer, *kind),
            _ => {
                let n = arena.node(sem);
                return self.malformed_expression_at(n.source_start, n.source_end);
            }
        };
        let node = self.ast.new_node(NodeKind::ObjectLiteralField)?;
        let kind = match kind {
            ObjectFieldKind::Init => PropertyKind::Init,
            ObjectFieldKind::Getter => PropertyKind::Getter,
            ObjectFieldKind::Setter => PropertyKind::Setter,
        };
        self.ast
            .set_value(node, SimpleProperty::Kind, SimpleValue::PropertyKind(kind))?;
        let field_name = self.convert_expression(name)?;
        self.set_child(node, StructuralProperty::FieldName, field_name)?;
        let value = self.convert_expression(initializer)?;
        self.set_child(node, StructuralProperty::Initializer, value)?;
        self.finish(node, sem)
    }

    /// A dotted reference becomes a left-leaning `QualifiedName` chain with
    /// per-token ranges recovered from the bytes.
    pub(crate) fn convert_dotted_name(
        &mut self,
        tokens: &[String],
        start: u32,
        end: u32,
        sem: SemId,
    ) -> Result<NodeId, ConvertError> {
        let tokens = tokens.to_vec();
        if tokens.is_empty() {
            return self.malformed_expression_at(start, end);
        }
        let spans = trim::token_spans(self.source, start, end, &tokens);
        let name_start = spans[0].0;
        let name_end = spans.last().map(|s| s.1).unwrap_or(end);
        let mut acc = self.simple_name(&tokens[0], spans[0].0, spans[0].1)?;
        for (token, span) in tokens.iter().zip(&spans).skip(1) {
            let qualified = self.ast.new_node(NodeKind::QualifiedName)?;
            self.ast.set_child(qualified, StructuralProperty::Qualifier, Some(acc))?;
            let name = self.simple_name(token, span.0, span.1)?;
            self.ast.set_child(qualified, StructuralProperty::Name, Some(name))?;
            self.ast.set_source_range(
                qualified,
                SourceRange::from_inclusive(name_start, span.1),
            )?;
            self.ast.add_flags(qualified, NodeFlags::ORIGINAL)?;
            acc = qualified;
        }
        self.finish_at(acc, name_start, name_end, sem)
    }

    fn malformed_expression_at(&mut self, start: u32, end: u32) -> Result<NodeId, ConvertError> {
        let node = self.malformed_expression()?;
        self.ast
            .set_source_range(node, SourceRange::from_inclusive(start, end))?;
        Ok(node)
    }

    /// Best-effort span of an identifier token inside `[start, end]`.
    pub(crate) fn selector_span(&self, selector: &str, start: u32, end: u32) -> (u32, u32) {
        let hay = self
            .source
            .get(start as usize..(end as usize + 1).min(self.source.len()))
            .unwrap_or("");
        match hay.find(selector) {
            Some(pos) => {
                let s = start + pos as u32;
                (s, s + selector.len() as u32 - 1)
            }
            None => (start, end),
        }
    }

    fn defer_name_fixup(&mut self, node: NodeId, name: &str) {
        if let Some(declaration) = self.current_declaration {
            if let Some(r) = self.resolver.as_deref_mut() {
                r.defer_scope_fixup(node, declaration, FixupTarget::Name(name.to_string()));
            }
        }
    }

    fn defer_this_fixup(&mut self, node: NodeId) {
        if let Some(declaration) = self.current_declaration {
            if let Some(r) = self.resolver.as_deref_mut() {
                r.defer_scope_fixup(node, declaration, FixupTarget::This);
            }
        }
    }
}
