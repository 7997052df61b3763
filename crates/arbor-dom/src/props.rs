//! Structural and simple property descriptors.
//!
//! Each node kind exposes a fixed set of child slots ([`StructuralProperty`])
//! and plain-value slots ([`SimpleProperty`]). The tables here are the closed,
//! compile-time replacement for the original's reflective property lists:
//! every generic access the owning tree performs goes through
//! [`NodeData::child_slot`] / [`NodeData::child_slot_mut`] /
//! [`NodeData::value`] / [`NodeData::put_value`].

use serde::{Deserialize, Serialize};

use crate::node::{
    AssignmentOperator, InfixOperator, NodeData, NodeId, NodeKind, PostfixOperator,
    PrefixOperator, PropertyKind,
};

/// Child-valued slot names, shared across kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralProperty {
    Qualifier,
    Name,
    ComponentType,
    Package,
    Imports,
    Statements,
    Doc,
    Superclass,
    BodyDeclarations,
    Declaration,
    Fragments,
    Body,
    VarType,
    Initializer,
    Initializers,
    Expression,
    ThenStatement,
    ElseStatement,
    Updaters,
    IterationVariable,
    Collection,
    Label,
    CatchClauses,
    Finally,
    Exception,
    LeftOperand,
    RightOperand,
    ExtendedOperands,
    Operand,
    ThenExpression,
    ElseExpression,
    Array,
    Index,
    Arguments,
    Member,
    Expressions,
    Fields,
    FieldName,
    Method,
    Tags,
    Parameters,
    ParamType,
}

/// Plain-value slot names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimpleProperty {
    Identifier,
    TypeName,
    OnDemand,
    IsConstructor,
    IsStatic,
    Operator,
    Token,
    EscapedValue,
    BooleanValue,
    Kind,
    TagName,
    Text,
    CommentText,
}

/// A plain value read from or written to a simple property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimpleValue {
    Str(String),
    OptStr(Option<String>),
    Bool(bool),
    InfixOp(InfixOperator),
    PrefixOp(PrefixOperator),
    PostfixOp(PostfixOperator),
    AssignOp(AssignmentOperator),
    PropertyKind(PropertyKind),
}

/// Read-only view of one child slot.
#[derive(Copy, Clone, Debug)]
pub enum Slot<'a> {
    /// Required child; `NodeId::NONE` until set or lazily materialized.
    Required(NodeId),
    Optional(Option<NodeId>),
    List(&'a [NodeId]),
}

/// Mutable view of one child slot.
pub enum SlotMut<'a> {
    Required(&'a mut NodeId),
    Optional(&'a mut Option<NodeId>),
    List(&'a mut Vec<NodeId>),
}

impl NodeData {
    /// The child slot named `prop`, or `None` when this kind has no such
    /// slot.
    pub fn child_slot(&self, prop: StructuralProperty) -> Option<Slot<'_>> {
        use StructuralProperty as P;
        match (self, prop) {
            (NodeData::QualifiedName { qualifier, .. }, P::Qualifier) => {
                Some(Slot::Required(*qualifier))
            }
            (NodeData::QualifiedName { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::SimpleType { name }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::QualifiedType { qualifier, .. }, P::Qualifier) => {
                Some(Slot::Required(*qualifier))
            }
            (NodeData::QualifiedType { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::ArrayType { component_type }, P::ComponentType) => {
                Some(Slot::Required(*component_type))
            }
            (NodeData::ScriptUnit { package, .. }, P::Package) => Some(Slot::Optional(*package)),
            (NodeData::ScriptUnit { imports, .. }, P::Imports) => Some(Slot::List(imports)),
            (NodeData::ScriptUnit { statements, .. }, P::Statements) => {
                Some(Slot::List(statements))
            }
            (NodeData::PackageDeclaration { doc, .. }, P::Doc) => Some(Slot::Optional(*doc)),
            (NodeData::PackageDeclaration { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::ImportDeclaration { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::FunctionDeclaration { doc, .. }, P::Doc) => Some(Slot::Optional(*doc)),
            (NodeData::FunctionDeclaration { name, .. }, P::Name) => Some(Slot::Optional(*name)),
            (NodeData::FunctionDeclaration { parameters, .. }, P::Parameters) => {
                Some(Slot::List(parameters))
            }
            (NodeData::FunctionDeclaration { body, .. }, P::Body) => Some(Slot::Optional(*body)),
            (NodeData::TypeDeclaration { doc, .. }, P::Doc) => Some(Slot::Optional(*doc)),
            (NodeData::TypeDeclaration { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::TypeDeclaration { superclass, .. }, P::Superclass) => {
                Some(Slot::Optional(*superclass))
            }
            (NodeData::TypeDeclaration { body_declarations, .. }, P::BodyDeclarations) => {
                Some(Slot::List(body_declarations))
            }
            (NodeData::TypeDeclarationStatement { declaration }, P::Declaration) => {
                Some(Slot::Required(*declaration))
            }
            (NodeData::FieldDeclaration { doc, .. }, P::Doc) => Some(Slot::Optional(*doc)),
            (NodeData::FieldDeclaration { fragments, .. }, P::Fragments) => {
                Some(Slot::List(fragments))
            }
            (NodeData::Initializer { doc, .. }, P::Doc) => Some(Slot::Optional(*doc)),
            (NodeData::Initializer { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::SingleVariableDeclaration { name, .. }, P::Name) => {
                Some(Slot::Required(*name))
            }
            (NodeData::SingleVariableDeclaration { var_type, .. }, P::VarType) => {
                Some(Slot::Optional(*var_type))
            }
            (NodeData::SingleVariableDeclaration { initializer, .. }, P::Initializer) => {
                Some(Slot::Optional(*initializer))
            }
            (NodeData::VariableDeclarationFragment { name, .. }, P::Name) => {
                Some(Slot::Required(*name))
            }
            (NodeData::VariableDeclarationFragment { initializer, .. }, P::Initializer) => {
                Some(Slot::Optional(*initializer))
            }
            (NodeData::VariableDeclarationStatement { doc, .. }, P::Doc) => {
                Some(Slot::Optional(*doc))
            }
            (NodeData::VariableDeclarationStatement { fragments, .. }, P::Fragments) => {
                Some(Slot::List(fragments))
            }
            (NodeData::VariableDeclarationExpression { fragments }, P::Fragments) => {
                Some(Slot::List(fragments))
            }
            (NodeData::Block { statements }, P::Statements) => Some(Slot::List(statements)),
            (NodeData::IfStatement { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::IfStatement { then_statement, .. }, P::ThenStatement) => {
                Some(Slot::Required(*then_statement))
            }
            (NodeData::IfStatement { else_statement, .. }, P::ElseStatement) => {
                Some(Slot::Optional(*else_statement))
            }
            (NodeData::WhileStatement { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::WhileStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::DoStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::DoStatement { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::ForStatement { initializers, .. }, P::Initializers) => {
                Some(Slot::List(initializers))
            }
            (NodeData::ForStatement { expression, .. }, P::Expression) => {
                Some(Slot::Optional(*expression))
            }
            (NodeData::ForStatement { updaters, .. }, P::Updaters) => Some(Slot::List(updaters)),
            (NodeData::ForStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::ForInStatement { iteration_variable, .. }, P::IterationVariable) => {
                Some(Slot::Required(*iteration_variable))
            }
            (NodeData::ForInStatement { collection, .. }, P::Collection) => {
                Some(Slot::Required(*collection))
            }
            (NodeData::ForInStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::BreakStatement { label }, P::Label) => Some(Slot::Optional(*label)),
            (NodeData::ContinueStatement { label }, P::Label) => Some(Slot::Optional(*label)),
            (NodeData::ReturnStatement { expression }, P::Expression) => {
                Some(Slot::Optional(*expression))
            }
            (NodeData::ThrowStatement { expression }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::TryStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::TryStatement { catch_clauses, .. }, P::CatchClauses) => {
                Some(Slot::List(catch_clauses))
            }
            (NodeData::TryStatement { finally_block, .. }, P::Finally) => {
                Some(Slot::Optional(*finally_block))
            }
            (NodeData::CatchClause { exception, .. }, P::Exception) => {
                Some(Slot::Required(*exception))
            }
            (NodeData::CatchClause { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::SwitchStatement { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::SwitchStatement { statements, .. }, P::Statements) => {
                Some(Slot::List(statements))
            }
            (NodeData::SwitchCase { expression }, P::Expression) => {
                Some(Slot::Optional(*expression))
            }
            (NodeData::LabeledStatement { label, .. }, P::Label) => Some(Slot::Required(*label)),
            (NodeData::LabeledStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::ExpressionStatement { expression }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::WithStatement { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::WithStatement { body, .. }, P::Body) => Some(Slot::Required(*body)),
            (NodeData::Assignment { left, .. }, P::LeftOperand) => Some(Slot::Required(*left)),
            (NodeData::Assignment { right, .. }, P::RightOperand) => Some(Slot::Required(*right)),
            (NodeData::InfixExpression { left, .. }, P::LeftOperand) => {
                Some(Slot::Required(*left))
            }
            (NodeData::InfixExpression { right, .. }, P::RightOperand) => {
                Some(Slot::Required(*right))
            }
            (NodeData::InfixExpression { extended_operands, .. }, P::ExtendedOperands) => {
                Some(Slot::List(extended_operands))
            }
            (NodeData::PrefixExpression { operand, .. }, P::Operand) => {
                Some(Slot::Required(*operand))
            }
            (NodeData::PostfixExpression { operand, .. }, P::Operand) => {
                Some(Slot::Required(*operand))
            }
            (NodeData::ConditionalExpression { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::ConditionalExpression { then_expression, .. }, P::ThenExpression) => {
                Some(Slot::Required(*then_expression))
            }
            (NodeData::ConditionalExpression { else_expression, .. }, P::ElseExpression) => {
                Some(Slot::Required(*else_expression))
            }
            (NodeData::ParenthesizedExpression { expression }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::ArrayAccess { array, .. }, P::Array) => Some(Slot::Required(*array)),
            (NodeData::ArrayAccess { index, .. }, P::Index) => Some(Slot::Required(*index)),
            (NodeData::FieldAccess { expression, .. }, P::Expression) => {
                Some(Slot::Required(*expression))
            }
            (NodeData::FieldAccess { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::FunctionInvocation { expression, .. }, P::Expression) => {
                Some(Slot::Optional(*expression))
            }
            (NodeData::FunctionInvocation { name, .. }, P::Name) => Some(Slot::Optional(*name)),
            (NodeData::FunctionInvocation { arguments, .. }, P::Arguments) => {
                Some(Slot::List(arguments))
            }
            (NodeData::ClassInstanceCreation { member, .. }, P::Member) => {
                Some(Slot::Required(*member))
            }
            (NodeData::ClassInstanceCreation { arguments, .. }, P::Arguments) => {
                Some(Slot::List(arguments))
            }
            (NodeData::ArrayInitializer { expressions }, P::Expressions) => {
                Some(Slot::List(expressions))
            }
            (NodeData::ObjectLiteral { fields }, P::Fields) => Some(Slot::List(fields)),
            (NodeData::ObjectLiteralField { field_name, .. }, P::FieldName) => {
                Some(Slot::Required(*field_name))
            }
            (NodeData::ObjectLiteralField { initializer, .. }, P::Initializer) => {
                Some(Slot::Required(*initializer))
            }
            (NodeData::FunctionExpression { method }, P::Method) => Some(Slot::Required(*method)),
            (NodeData::ListExpression { expressions }, P::Expressions) => {
                Some(Slot::List(expressions))
            }
            (NodeData::DocComment { tags, .. }, P::Tags) => Some(Slot::List(tags)),
            (NodeData::TagElement { fragments, .. }, P::Fragments) => Some(Slot::List(fragments)),
            (NodeData::MemberRef { qualifier, .. }, P::Qualifier) => {
                Some(Slot::Optional(*qualifier))
            }
            (NodeData::MemberRef { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::FunctionRef { qualifier, .. }, P::Qualifier) => {
                Some(Slot::Optional(*qualifier))
            }
            (NodeData::FunctionRef { name, .. }, P::Name) => Some(Slot::Required(*name)),
            (NodeData::FunctionRef { parameters, .. }, P::Parameters) => {
                Some(Slot::List(parameters))
            }
            (NodeData::FunctionRefParameter { param_type, .. }, P::ParamType) => {
                Some(Slot::Optional(*param_type))
            }
            (NodeData::FunctionRefParameter { name, .. }, P::Name) => Some(Slot::Optional(*name)),
            _ => None,
        }
    }

    /// Mutable access to the child slot named `prop`.
    pub fn child_slot_mut(&mut self, prop: StructuralProperty) -> Option<SlotMut<'_>> {
        use StructuralProperty as P;
        match (self, prop) {
            (NodeData::QualifiedName { qualifier, .. }, P::Qualifier) => {
                Some(SlotMut::Required(qualifier))
            }
            (NodeData::QualifiedName { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::SimpleType { name }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::QualifiedType { qualifier, .. }, P::Qualifier) => {
                Some(SlotMut::Required(qualifier))
            }
            (NodeData::QualifiedType { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::ArrayType { component_type }, P::ComponentType) => {
                Some(SlotMut::Required(component_type))
            }
            (NodeData::ScriptUnit { package, .. }, P::Package) => Some(SlotMut::Optional(package)),
            (NodeData::ScriptUnit { imports, .. }, P::Imports) => Some(SlotMut::List(imports)),
            (NodeData::ScriptUnit { statements, .. }, P::Statements) => {
                Some(SlotMut::List(statements))
            }
            (NodeData::PackageDeclaration { doc, .. }, P::Doc) => Some(SlotMut::Optional(doc)),
            (NodeData::PackageDeclaration { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::ImportDeclaration { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::FunctionDeclaration { doc, .. }, P::Doc) => Some(SlotMut::Optional(doc)),
            (NodeData::FunctionDeclaration { name, .. }, P::Name) => Some(SlotMut::Optional(name)),
            (NodeData::FunctionDeclaration { parameters, .. }, P::Parameters) => {
                Some(SlotMut::List(parameters))
            }
            (NodeData::FunctionDeclaration { body, .. }, P::Body) => Some(SlotMut::Optional(body)),
            (NodeData::TypeDeclaration { doc, .. }, P::Doc) => Some(SlotMut::Optional(doc)),
            (NodeData::TypeDeclaration { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::TypeDeclaration { superclass, .. }, P::Superclass) => {
                Some(SlotMut::Optional(superclass))
            }
            (NodeData::TypeDeclaration { body_declarations, .. }, P::BodyDeclarations) => {
                Some(SlotMut::List(body_declarations))
            }
            (NodeData::TypeDeclarationStatement { declaration }, P::Declaration) => {
                Some(SlotMut::Required(declaration))
            }
            (NodeData::FieldDeclaration { doc, .. }, P::Doc) => Some(SlotMut::Optional(doc)),
            (NodeData::FieldDeclaration { fragments, .. }, P::Fragments) => {
                Some(SlotMut::List(fragments))
            }
            (NodeData::Initializer { doc, .. }, P::Doc) => Some(SlotMut::Optional(doc)),
            (NodeData::Initializer { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::SingleVariableDeclaration { name, .. }, P::Name) => {
                Some(SlotMut::Required(name))
            }
            (NodeData::SingleVariableDeclaration { var_type, .. }, P::VarType) => {
                Some(SlotMut::Optional(var_type))
            }
            (NodeData::SingleVariableDeclaration { initializer, .. }, P::Initializer) => {
                Some(SlotMut::Optional(initializer))
            }
            (NodeData::VariableDeclarationFragment { name, .. }, P::Name) => {
                Some(SlotMut::Required(name))
            }
            (NodeData::VariableDeclarationFragment { initializer, .. }, P::Initializer) => {
                Some(SlotMut::Optional(initializer))
            }
            (NodeData::VariableDeclarationStatement { doc, .. }, P::Doc) => {
                Some(SlotMut::Optional(doc))
            }
            (NodeData::VariableDeclarationStatement { fragments, .. }, P::Fragments) => {
                Some(SlotMut::List(fragments))
            }
            (NodeData::VariableDeclarationExpression { fragments }, P::Fragments) => {
                Some(SlotMut::List(fragments))
            }
            (NodeData::Block { statements }, P::Statements) => Some(SlotMut::List(statements)),
            (NodeData::IfStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::IfStatement { then_statement, .. }, P::ThenStatement) => {
                Some(SlotMut::Required(then_statement))
            }
            (NodeData::IfStatement { else_statement, .. }, P::ElseStatement) => {
                Some(SlotMut::Optional(else_statement))
            }
            (NodeData::WhileStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::WhileStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::DoStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::DoStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::ForStatement { initializers, .. }, P::Initializers) => {
                Some(SlotMut::List(initializers))
            }
            (NodeData::ForStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Optional(expression))
            }
            (NodeData::ForStatement { updaters, .. }, P::Updaters) => {
                Some(SlotMut::List(updaters))
            }
            (NodeData::ForStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::ForInStatement { iteration_variable, .. }, P::IterationVariable) => {
                Some(SlotMut::Required(iteration_variable))
            }
            (NodeData::ForInStatement { collection, .. }, P::Collection) => {
                Some(SlotMut::Required(collection))
            }
            (NodeData::ForInStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::BreakStatement { label }, P::Label) => Some(SlotMut::Optional(label)),
            (NodeData::ContinueStatement { label }, P::Label) => Some(SlotMut::Optional(label)),
            (NodeData::ReturnStatement { expression }, P::Expression) => {
                Some(SlotMut::Optional(expression))
            }
            (NodeData::ThrowStatement { expression }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::TryStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::TryStatement { catch_clauses, .. }, P::CatchClauses) => {
                Some(SlotMut::List(catch_clauses))
            }
            (NodeData::TryStatement { finally_block, .. }, P::Finally) => {
                Some(SlotMut::Optional(finally_block))
            }
            (NodeData::CatchClause { exception, .. }, P::Exception) => {
                Some(SlotMut::Required(exception))
            }
            (NodeData::CatchClause { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::SwitchStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::SwitchStatement { statements, .. }, P::Statements) => {
                Some(SlotMut::List(statements))
            }
            (NodeData::SwitchCase { expression }, P::Expression) => {
                Some(SlotMut::Optional(expression))
            }
            (NodeData::LabeledStatement { label, .. }, P::Label) => Some(SlotMut::Required(label)),
            (NodeData::LabeledStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::ExpressionStatement { expression }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::WithStatement { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::WithStatement { body, .. }, P::Body) => Some(SlotMut::Required(body)),
            (NodeData::Assignment { left, .. }, P::LeftOperand) => Some(SlotMut::Required(left)),
            (NodeData::Assignment { right, .. }, P::RightOperand) => {
                Some(SlotMut::Required(right))
            }
            (NodeData::InfixExpression { left, .. }, P::LeftOperand) => {
                Some(SlotMut::Required(left))
            }
            (NodeData::InfixExpression { right, .. }, P::RightOperand) => {
                Some(SlotMut::Required(right))
            }
            (NodeData::InfixExpression { extended_operands, .. }, P::ExtendedOperands) => {
                Some(SlotMut::List(extended_operands))
            }
            (NodeData::PrefixExpression { operand, .. }, P::Operand) => {
                Some(SlotMut::Required(operand))
            }
            (NodeData::PostfixExpression { operand, .. }, P::Operand) => {
                Some(SlotMut::Required(operand))
            }
            (NodeData::ConditionalExpression { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::ConditionalExpression { then_expression, .. }, P::ThenExpression) => {
                Some(SlotMut::Required(then_expression))
            }
            (NodeData::ConditionalExpression { else_expression, .. }, P::ElseExpression) => {
                Some(SlotMut::Required(else_expression))
            }
            (NodeData::ParenthesizedExpression { expression }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::ArrayAccess { array, .. }, P::Array) => Some(SlotMut::Required(array)),
            (NodeData::ArrayAccess { index, .. }, P::Index) => Some(SlotMut::Required(index)),
            (NodeData::FieldAccess { expression, .. }, P::Expression) => {
                Some(SlotMut::Required(expression))
            }
            (NodeData::FieldAccess { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::FunctionInvocation { expression, .. }, P::Expression) => {
                Some(SlotMut::Optional(expression))
            }
            (NodeData::FunctionInvocation { name, .. }, P::Name) => Some(SlotMut::Optional(name)),
            (NodeData::FunctionInvocation { arguments, .. }, P::Arguments) => {
                Some(SlotMut::List(arguments))
            }
            (NodeData::ClassInstanceCreation { member, .. }, P::Member) => {
                Some(SlotMut::Required(member))
            }
            (NodeData::ClassInstanceCreation { arguments, .. }, P::Arguments) => {
                Some(SlotMut::List(arguments))
            }
            (NodeData::ArrayInitializer { expressions }, P::Expressions) => {
                Some(SlotMut::List(expressions))
            }
            (NodeData::ObjectLiteral { fields }, P::Fields) => Some(SlotMut::List(fields)),
            (NodeData::ObjectLiteralField { field_name, .. }, P::FieldName) => {
                Some(SlotMut::Required(field_name))
            }
            (NodeData::ObjectLiteralField { initializer, .. }, P::Initializer) => {
                Some(SlotMut::Required(initializer))
            }
            (NodeData::FunctionExpression { method }, P::Method) => {
                Some(SlotMut::Required(method))
            }
            (NodeData::ListExpression { expressions }, P::Expressions) => {
                Some(SlotMut::List(expressions))
            }
            (NodeData::DocComment { tags, .. }, P::Tags) => Some(SlotMut::List(tags)),
            (NodeData::TagElement { fragments, .. }, P::Fragments) => {
                Some(SlotMut::List(fragments))
            }
            (NodeData::MemberRef { qualifier, .. }, P::Qualifier) => {
                Some(SlotMut::Optional(qualifier))
            }
            (NodeData::MemberRef { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::FunctionRef { qualifier, .. }, P::Qualifier) => {
                Some(SlotMut::Optional(qualifier))
            }
            (NodeData::FunctionRef { name, .. }, P::Name) => Some(SlotMut::Required(name)),
            (NodeData::FunctionRef { parameters, .. }, P::Parameters) => {
                Some(SlotMut::List(parameters))
            }
            (NodeData::FunctionRefParameter { param_type, .. }, P::ParamType) => {
                Some(SlotMut::Optional(param_type))
            }
            (NodeData::FunctionRefParameter { name, .. }, P::Name) => {
                Some(SlotMut::Optional(name))
            }
            _ => None,
        }
    }

    /// Read a simple property.
    pub fn value(&self, prop: SimpleProperty) -> Option<SimpleValue> {
        use SimpleProperty as S;
        match (self, prop) {
            (NodeData::SimpleName { identifier }, S::Identifier) => {
                Some(SimpleValue::Str(identifier.clone()))
            }
            (NodeData::InferredType { type_name }, S::TypeName) => {
                Some(SimpleValue::Str(type_name.clone()))
            }
            (NodeData::ImportDeclaration { on_demand, .. }, S::OnDemand) => {
                Some(SimpleValue::Bool(*on_demand))
            }
            (NodeData::FunctionDeclaration { is_constructor, .. }, S::IsConstructor) => {
                Some(SimpleValue::Bool(*is_constructor))
            }
            (NodeData::Initializer { is_static, .. }, S::IsStatic) => {
                Some(SimpleValue::Bool(*is_static))
            }
            (NodeData::Assignment { operator, .. }, S::Operator) => {
                Some(SimpleValue::AssignOp(*operator))
            }
            (NodeData::InfixExpression { operator, .. }, S::Operator) => {
                Some(SimpleValue::InfixOp(*operator))
            }
            (NodeData::PrefixExpression { operator, .. }, S::Operator) => {
                Some(SimpleValue::PrefixOp(*operator))
            }
            (NodeData::PostfixExpression { operator, .. }, S::Operator) => {
                Some(SimpleValue::PostfixOp(*operator))
            }
            (NodeData::ObjectLiteralField { kind, .. }, S::Kind) => {
                Some(SimpleValue::PropertyKind(*kind))
            }
            (NodeData::NumberLiteral { token }, S::Token) => Some(SimpleValue::Str(token.clone())),
            (NodeData::RegularExpressionLiteral { token }, S::Token) => {
                Some(SimpleValue::Str(token.clone()))
            }
            (NodeData::StringLiteral { escaped_value }, S::EscapedValue) => {
                Some(SimpleValue::Str(escaped_value.clone()))
            }
            (NodeData::BooleanLiteral { value }, S::BooleanValue) => {
                Some(SimpleValue::Bool(*value))
            }
            (NodeData::DocComment { comment_text, .. }, S::CommentText) => {
                Some(SimpleValue::Str(comment_text.clone()))
            }
            (NodeData::TagElement { tag_name, .. }, S::TagName) => {
                Some(SimpleValue::OptStr(tag_name.clone()))
            }
            (NodeData::TextElement { text }, S::Text) => Some(SimpleValue::Str(text.clone())),
            _ => None,
        }
    }

    /// Write a simple property; returns the previous value, or `None` when
    /// the property does not exist on this kind or the value type is wrong.
    pub fn put_value(&mut self, prop: SimpleProperty, value: SimpleValue) -> Option<SimpleValue> {
        use SimpleProperty as S;
        match (self, prop, value) {
            (NodeData::SimpleName { identifier }, S::Identifier, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(identifier, v)))
            }
            (NodeData::InferredType { type_name }, S::TypeName, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(type_name, v)))
            }
            (NodeData::ImportDeclaration { on_demand, .. }, S::OnDemand, SimpleValue::Bool(v)) => {
                Some(SimpleValue::Bool(std::mem::replace(on_demand, v)))
            }
            (
                NodeData::FunctionDeclaration { is_constructor, .. },
                S::IsConstructor,
                SimpleValue::Bool(v),
            ) => Some(SimpleValue::Bool(std::mem::replace(is_constructor, v))),
            (NodeData::Initializer { is_static, .. }, S::IsStatic, SimpleValue::Bool(v)) => {
                Some(SimpleValue::Bool(std::mem::replace(is_static, v)))
            }
            (NodeData::Assignment { operator, .. }, S::Operator, SimpleValue::AssignOp(v)) => {
                Some(SimpleValue::AssignOp(std::mem::replace(operator, v)))
            }
            (NodeData::InfixExpression { operator, .. }, S::Operator, SimpleValue::InfixOp(v)) => {
                Some(SimpleValue::InfixOp(std::mem::replace(operator, v)))
            }
            (
                NodeData::PrefixExpression { operator, .. },
                S::Operator,
                SimpleValue::PrefixOp(v),
            ) => Some(SimpleValue::PrefixOp(std::mem::replace(operator, v))),
            (
                NodeData::PostfixExpression { operator, .. },
                S::Operator,
                SimpleValue::PostfixOp(v),
            ) => Some(SimpleValue::PostfixOp(std::mem::replace(operator, v))),
            (
                NodeData::ObjectLiteralField { kind, .. },
                S::Kind,
                SimpleValue::PropertyKind(v),
            ) => Some(SimpleValue::PropertyKind(std::mem::replace(kind, v))),
            (NodeData::NumberLiteral { token }, S::Token, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(token, v)))
            }
            (NodeData::RegularExpressionLiteral { token }, S::Token, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(token, v)))
            }
            (NodeData::StringLiteral { escaped_value }, S::EscapedValue, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(escaped_value, v)))
            }
            (NodeData::BooleanLiteral { value }, S::BooleanValue, SimpleValue::Bool(v)) => {
                Some(SimpleValue::Bool(std::mem::replace(value, v)))
            }
            (NodeData::DocComment { comment_text, .. }, S::CommentText, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(comment_text, v)))
            }
            (NodeData::TagElement { tag_name, .. }, S::TagName, SimpleValue::OptStr(v)) => {
                Some(SimpleValue::OptStr(std::mem::replace(tag_name, v)))
            }
            (NodeData::TextElement { text }, S::Text, SimpleValue::Str(v)) => {
                Some(SimpleValue::Str(std::mem::replace(text, v)))
            }
            _ => None,
        }
    }
}

/// All structural properties of `kind`, in canonical order. Used by generic
/// traversal and deep clone.
pub fn structural_properties(kind: NodeKind) -> &'static [StructuralProperty] {
    use StructuralProperty as P;
    match kind {
        NodeKind::SimpleName
        | NodeKind::InferredType
        | NodeKind::EmptyStatement
        | NodeKind::NumberLiteral
        | NodeKind::StringLiteral
        | NodeKind::BooleanLiteral
        | NodeKind::NullLiteral
        | NodeKind::UndefinedLiteral
        | NodeKind::RegularExpressionLiteral
        | NodeKind::ThisExpression
        | NodeKind::EmptyExpression
        | NodeKind::LineComment
        | NodeKind::BlockComment
        | NodeKind::TextElement => &[],
        NodeKind::QualifiedName | NodeKind::QualifiedType => &[P::Qualifier, P::Name],
        NodeKind::SimpleType => &[P::Name],
        NodeKind::ArrayType => &[P::ComponentType],
        NodeKind::ScriptUnit => &[P::Package, P::Imports, P::Statements],
        NodeKind::PackageDeclaration => &[P::Doc, P::Name],
        NodeKind::ImportDeclaration => &[P::Name],
        NodeKind::FunctionDeclaration => &[P::Doc, P::Name, P::Parameters, P::Body],
        NodeKind::TypeDeclaration => &[P::Doc, P::Name, P::Superclass, P::BodyDeclarations],
        NodeKind::TypeDeclarationStatement => &[P::Declaration],
        NodeKind::FieldDeclaration => &[P::Doc, P::Fragments],
        NodeKind::Initializer => &[P::Doc, P::Body],
        NodeKind::SingleVariableDeclaration => &[P::Name, P::VarType, P::Initializer],
        NodeKind::VariableDeclarationFragment => &[P::Name, P::Initializer],
        NodeKind::VariableDeclarationStatement => &[P::Doc, P::Fragments],
        NodeKind::VariableDeclarationExpression => &[P::Fragments],
        NodeKind::Block => &[P::Statements],
        NodeKind::IfStatement => &[P::Expression, P::ThenStatement, P::ElseStatement],
        NodeKind::WhileStatement => &[P::Expression, P::Body],
        NodeKind::DoStatement => &[P::Body, P::Expression],
        NodeKind::ForStatement => &[P::Initializers, P::Expression, P::Updaters, P::Body],
        NodeKind::ForInStatement => &[P::IterationVariable, P::Collection, P::Body],
        NodeKind::BreakStatement | NodeKind::ContinueStatement => &[P::Label],
        NodeKind::ReturnStatement | NodeKind::ThrowStatement => &[P::Expression],
        NodeKind::TryStatement => &[P::Body, P::CatchClauses, P::Finally],
        NodeKind::CatchClause => &[P::Exception, P::Body],
        NodeKind::SwitchStatement => &[P::Expression, P::Statements],
        NodeKind::SwitchCase => &[P::Expression],
        NodeKind::LabeledStatement => &[P::Label, P::Body],
        NodeKind::ExpressionStatement => &[P::Expression],
        NodeKind::WithStatement => &[P::Expression, P::Body],
        NodeKind::Assignment => &[P::LeftOperand, P::RightOperand],
        NodeKind::InfixExpression => &[P::LeftOperand, P::RightOperand, P::ExtendedOperands],
        NodeKind::PrefixExpression | NodeKind::PostfixExpression => &[P::Operand],
        NodeKind::ConditionalExpression => {
            &[P::Expression, P::ThenExpression, P::ElseExpression]
        }
        NodeKind::ParenthesizedExpression => &[P::Expression],
        NodeKind::ArrayAccess => &[P::Array, P::Index],
        NodeKind::FieldAccess => &[P::Expression, P::Name],
        NodeKind::FunctionInvocation => &[P::Expression, P::Name, P::Arguments],
        NodeKind::ClassInstanceCreation => &[P::Member, P::Arguments],
        NodeKind::ArrayInitializer | NodeKind::ListExpression => &[P::Expressions],
        NodeKind::ObjectLiteral => &[P::Fields],
        NodeKind::ObjectLiteralField => &[P::FieldName, P::Initializer],
        NodeKind::FunctionExpression => &[P::Method],
        NodeKind::DocComment => &[P::Tags],
        NodeKind::TagElement => &[P::Fragments],
        NodeKind::MemberRef => &[P::Qualifier, P::Name],
        NodeKind::FunctionRef => &[P::Qualifier, P::Name, P::Parameters],
        NodeKind::FunctionRefParameter => &[P::ParamType, P::Name],
    }
}

/// All simple properties of `kind`. Drives generic value comparison in the
/// structural matcher.
pub fn simple_properties(kind: NodeKind) -> &'static [SimpleProperty] {
    use SimpleProperty as S;
    match kind {
        NodeKind::SimpleName => &[S::Identifier],
        NodeKind::InferredType => &[S::TypeName],
        NodeKind::ImportDeclaration => &[S::OnDemand],
        NodeKind::FunctionDeclaration => &[S::IsConstructor],
        NodeKind::Initializer => &[S::IsStatic],
        NodeKind::Assignment
        | NodeKind::InfixExpression
        | NodeKind::PrefixExpression
        | NodeKind::PostfixExpression => &[S::Operator],
        NodeKind::ObjectLiteralField => &[S::Kind],
        NodeKind::NumberLiteral | NodeKind::RegularExpressionLiteral => &[S::Token],
        NodeKind::StringLiteral => &[S::EscapedValue],
        NodeKind::BooleanLiteral => &[S::BooleanValue],
        NodeKind::DocComment => &[S::CommentText],
        NodeKind::TagElement => &[S::TagName],
        NodeKind::TextElement => &[S::Text],
        _ => &[],
    }
}

/// Kind of the node lazily materialized for an unset required child.
///
/// Mirrors the original's lazy defaults: name-shaped slots get a `MISSING`
/// simple name, statement-shaped slots an empty block, type-shaped slots a
/// simple type over a `MISSING` name.
pub(crate) fn default_child_kind(kind: NodeKind, prop: StructuralProperty) -> NodeKind {
    use StructuralProperty as P;
    match (kind, prop) {
        (NodeKind::QualifiedName, P::Qualifier) => NodeKind::SimpleName,
        (NodeKind::QualifiedType, P::Qualifier) => NodeKind::SimpleType,
        (_, P::Name | P::Label | P::FieldName) => NodeKind::SimpleName,
        (_, P::ComponentType | P::VarType) => NodeKind::SimpleType,
        (NodeKind::IfStatement, P::ThenStatement) => NodeKind::Block,
        (NodeKind::TypeDeclarationStatement, P::Declaration) => NodeKind::TypeDeclaration,
        (NodeKind::CatchClause, P::Exception) => NodeKind::SingleVariableDeclaration,
        (NodeKind::FunctionExpression, P::Method) => NodeKind::FunctionDeclaration,
        (_, P::Body) => NodeKind::Block,
        // Everything else expression-shaped
        _ => NodeKind::SimpleName,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_resolve_by_kind() {
        let data = NodeData::empty_for(NodeKind::IfStatement);
        assert!(matches!(
            data.child_slot(StructuralProperty::Expression),
            Some(Slot::Required(id)) if id.is_none()
        ));
        assert!(matches!(
            data.child_slot(StructuralProperty::ElseStatement),
            Some(Slot::Optional(None))
        ));
        assert!(data.child_slot(StructuralProperty::Fragments).is_none());
    }

    #[test]
    fn value_round_trip() {
        let mut data = NodeData::empty_for(NodeKind::SimpleName);
        let old = data
            .put_value(
                SimpleProperty::Identifier,
                SimpleValue::Str("count".to_string()),
            )
            .unwrap();
        assert_eq!(old, SimpleValue::Str("MISSING".to_string()));
        assert_eq!(
            data.value(SimpleProperty::Identifier),
            Some(SimpleValue::Str("count".to_string()))
        );
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut data = NodeData::empty_for(NodeKind::BooleanLiteral);
        assert!(
            data.put_value(SimpleProperty::BooleanValue, SimpleValue::Str("x".into()))
                .is_none()
        );
    }

    #[test]
    fn property_tables_cover_slots() {
        for prop in structural_properties(NodeKind::TryStatement) {
            let data = NodeData::empty_for(NodeKind::TryStatement);
            assert!(data.child_slot(*prop).is_some(), "{prop:?}");
        }
    }

    #[test]
    fn simple_values_survive_json() {
        let values = [
            SimpleValue::Str("count".to_string()),
            SimpleValue::OptStr(None),
            SimpleValue::Bool(true),
            SimpleValue::InfixOp(InfixOperator::Plus),
            SimpleValue::AssignOp(AssignmentOperator::PlusAssign),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: SimpleValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }
}
