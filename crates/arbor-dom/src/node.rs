//! Node kinds, per-kind payloads, and node flags.
//!
//! Every concrete syntactic form is one [`NodeKind`] variant with a matching
//! [`NodeData`] payload. Child slots hold [`NodeId`]s into the owning tree;
//! required children start out as `NodeId::NONE` until set (or lazily
//! materialized on first read), optional children are `Option`, list slots
//! are ordered `Vec`s that never contain `NONE`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Handle to a node: the owning tree's id plus the node's arena index.
///
/// Carrying the tree id lets every structural write verify that a child
/// belongs to the same owning tree before touching anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub(crate) tree: u32,
    pub(crate) index: u32,
}

impl NodeId {
    /// Sentinel for an unset required child.
    pub const NONE: NodeId = NodeId {
        tree: u32::MAX,
        index: u32::MAX,
    };

    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    /// The owning tree's id; see [`crate::Ast::tree_id`].
    #[inline]
    pub fn tree_id(self) -> u32 {
        self.tree
    }
}

bitflags! {
    /// Per-node marker flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Synthesized or degraded because of a parse/conversion error.
        const MALFORMED = 1 << 0;
        /// Produced while recovering from a syntax error.
        const RECOVERED = 1 << 1;
        /// Created by the converter from original source (not by hand).
        const ORIGINAL = 1 << 2;
        /// Structural mutation is rejected.
        const PROTECTED = 1 << 3;
    }
}

/// Infix operators, in source spelling order of the flattening rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOperator {
    ConditionalAnd,
    ConditionalOr,
    And,
    Or,
    Xor,
    Plus,
    Minus,
    Times,
    Divide,
    Remainder,
    LeftShift,
    RightShiftSigned,
    RightShiftUnsigned,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    EqualEqualEqual,
    NotEqualEqual,
    InstanceOf,
    In,
}

impl InfixOperator {
    /// True for the left-associative operators the converter may flatten
    /// into an extended-operand chain.
    pub fn is_flattenable(self) -> bool {
        // Relational/equality chains never parse as same-operator spines of
        // interest, but flattening is keyed on operator equality alone; the
        // internal tree only produces spines for these.
        !matches!(self, InfixOperator::InstanceOf | InfixOperator::In)
    }

    pub fn token(self) -> &'static str {
        match self {
            InfixOperator::ConditionalAnd => "&&",
            InfixOperator::ConditionalOr => "||",
            InfixOperator::And => "&",
            InfixOperator::Or => "|",
            InfixOperator::Xor => "^",
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Times => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Remainder => "%",
            InfixOperator::LeftShift => "<<",
            InfixOperator::RightShiftSigned => ">>",
            InfixOperator::RightShiftUnsigned => ">>>",
            InfixOperator::Less => "<",
            InfixOperator::LessEquals => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEquals => ">=",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::EqualEqualEqual => "===",
            InfixOperator::NotEqualEqual => "!==",
            InfixOperator::InstanceOf => "instanceof",
            InfixOperator::In => "in",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOperator {
    Increment,
    Decrement,
    Plus,
    Minus,
    Complement,
    Not,
    TypeOf,
    Delete,
    Void,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Assign,
    PlusAssign,
    MinusAssign,
    TimesAssign,
    DivideAssign,
    RemainderAssign,
    LeftShiftAssign,
    RightShiftSignedAssign,
    RightShiftUnsignedAssign,
    AndAssign,
    OrAssign,
    XorAssign,
}

/// How an object literal field binds its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Init,
    Getter,
    Setter,
}

/// The closed set of concrete node variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    // Names
    SimpleName,
    QualifiedName,
    // Types
    SimpleType,
    QualifiedType,
    ArrayType,
    InferredType,
    // Unit level
    ScriptUnit,
    PackageDeclaration,
    ImportDeclaration,
    // Declarations
    FunctionDeclaration,
    TypeDeclaration,
    TypeDeclarationStatement,
    FieldDeclaration,
    Initializer,
    SingleVariableDeclaration,
    VariableDeclarationFragment,
    VariableDeclarationStatement,
    VariableDeclarationExpression,
    // Statements
    Block,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForInStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    SwitchStatement,
    SwitchCase,
    LabeledStatement,
    EmptyStatement,
    ExpressionStatement,
    WithStatement,
    // Expressions
    Assignment,
    InfixExpression,
    PrefixExpression,
    PostfixExpression,
    ConditionalExpression,
    ParenthesizedExpression,
    ArrayAccess,
    FieldAccess,
    FunctionInvocation,
    ClassInstanceCreation,
    ArrayInitializer,
    ObjectLiteral,
    ObjectLiteralField,
    FunctionExpression,
    ListExpression,
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    UndefinedLiteral,
    RegularExpressionLiteral,
    ThisExpression,
    EmptyExpression,
    // Comments and doc
    LineComment,
    BlockComment,
    DocComment,
    TagElement,
    TextElement,
    MemberRef,
    FunctionRef,
    FunctionRefParameter,
}

impl NodeKind {
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::SimpleName
                | NodeKind::QualifiedName
                | NodeKind::Assignment
                | NodeKind::InfixExpression
                | NodeKind::PrefixExpression
                | NodeKind::PostfixExpression
                | NodeKind::ConditionalExpression
                | NodeKind::ParenthesizedExpression
                | NodeKind::ArrayAccess
                | NodeKind::FieldAccess
                | NodeKind::FunctionInvocation
                | NodeKind::ClassInstanceCreation
                | NodeKind::ArrayInitializer
                | NodeKind::ObjectLiteral
                | NodeKind::FunctionExpression
                | NodeKind::ListExpression
                | NodeKind::NumberLiteral
                | NodeKind::StringLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NullLiteral
                | NodeKind::UndefinedLiteral
                | NodeKind::RegularExpressionLiteral
                | NodeKind::ThisExpression
                | NodeKind::EmptyExpression
                | NodeKind::VariableDeclarationExpression
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::IfStatement
                | NodeKind::WhileStatement
                | NodeKind::DoStatement
                | NodeKind::ForStatement
                | NodeKind::ForInStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
                | NodeKind::ReturnStatement
                | NodeKind::ThrowStatement
                | NodeKind::TryStatement
                | NodeKind::SwitchStatement
                | NodeKind::SwitchCase
                | NodeKind::LabeledStatement
                | NodeKind::EmptyStatement
                | NodeKind::ExpressionStatement
                | NodeKind::WithStatement
                | NodeKind::VariableDeclarationStatement
                | NodeKind::TypeDeclarationStatement
                | NodeKind::FunctionDeclaration
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            NodeKind::LineComment | NodeKind::BlockComment | NodeKind::DocComment
        )
    }
}

/// Per-kind payload. One variant per [`NodeKind`], same order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeData {
    SimpleName {
        identifier: String,
    },
    QualifiedName {
        qualifier: NodeId,
        name: NodeId,
    },
    SimpleType {
        name: NodeId,
    },
    QualifiedType {
        qualifier: NodeId,
        name: NodeId,
    },
    ArrayType {
        component_type: NodeId,
    },
    InferredType {
        type_name: String,
    },
    ScriptUnit {
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        statements: Vec<NodeId>,
        /// The range-ordered comment table. Not a structural property:
        /// comments live outside the parent/child web, like the original's
        /// comment list.
        comments: Vec<NodeId>,
    },
    PackageDeclaration {
        doc: Option<NodeId>,
        name: NodeId,
    },
    ImportDeclaration {
        name: NodeId,
        on_demand: bool,
    },
    FunctionDeclaration {
        doc: Option<NodeId>,
        name: Option<NodeId>,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
        is_constructor: bool,
    },
    TypeDeclaration {
        doc: Option<NodeId>,
        name: NodeId,
        superclass: Option<NodeId>,
        body_declarations: Vec<NodeId>,
    },
    TypeDeclarationStatement {
        declaration: NodeId,
    },
    FieldDeclaration {
        doc: Option<NodeId>,
        fragments: Vec<NodeId>,
    },
    Initializer {
        doc: Option<NodeId>,
        body: NodeId,
        is_static: bool,
    },
    SingleVariableDeclaration {
        name: NodeId,
        var_type: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    VariableDeclarationFragment {
        name: NodeId,
        initializer: Option<NodeId>,
    },
    VariableDeclarationStatement {
        doc: Option<NodeId>,
        fragments: Vec<NodeId>,
    },
    VariableDeclarationExpression {
        fragments: Vec<NodeId>,
    },
    Block {
        statements: Vec<NodeId>,
    },
    IfStatement {
        expression: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    },
    WhileStatement {
        expression: NodeId,
        body: NodeId,
    },
    DoStatement {
        body: NodeId,
        expression: NodeId,
    },
    ForStatement {
        initializers: Vec<NodeId>,
        expression: Option<NodeId>,
        updaters: Vec<NodeId>,
        body: NodeId,
    },
    ForInStatement {
        iteration_variable: NodeId,
        collection: NodeId,
        body: NodeId,
    },
    BreakStatement {
        label: Option<NodeId>,
    },
    ContinueStatement {
        label: Option<NodeId>,
    },
    ReturnStatement {
        expression: Option<NodeId>,
    },
    ThrowStatement {
        expression: NodeId,
    },
    TryStatement {
        body: NodeId,
        catch_clauses: Vec<NodeId>,
        finally_block: Option<NodeId>,
    },
    CatchClause {
        exception: NodeId,
        body: NodeId,
    },
    SwitchStatement {
        expression: NodeId,
        statements: Vec<NodeId>,
    },
    SwitchCase {
        expression: Option<NodeId>,
    },
    LabeledStatement {
        label: NodeId,
        body: NodeId,
    },
    EmptyStatement,
    ExpressionStatement {
        expression: NodeId,
    },
    WithStatement {
        expression: NodeId,
        body: NodeId,
    },
    Assignment {
        left: NodeId,
        operator: AssignmentOperator,
        right: NodeId,
    },
    InfixExpression {
        left: NodeId,
        operator: InfixOperator,
        right: NodeId,
        extended_operands: Vec<NodeId>,
    },
    PrefixExpression {
        operator: PrefixOperator,
        operand: NodeId,
    },
    PostfixExpression {
        operand: NodeId,
        operator: PostfixOperator,
    },
    ConditionalExpression {
        expression: NodeId,
        then_expression: NodeId,
        else_expression: NodeId,
    },
    ParenthesizedExpression {
        expression: NodeId,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    FieldAccess {
        expression: NodeId,
        name: NodeId,
    },
    FunctionInvocation {
        expression: Option<NodeId>,
        name: Option<NodeId>,
        arguments: Vec<NodeId>,
    },
    ClassInstanceCreation {
        member: NodeId,
        arguments: Vec<NodeId>,
    },
    ArrayInitializer {
        expressions: Vec<NodeId>,
    },
    ObjectLiteral {
        fields: Vec<NodeId>,
    },
    ObjectLiteralField {
        field_name: NodeId,
        initializer: NodeId,
        kind: PropertyKind,
    },
    FunctionExpression {
        method: NodeId,
    },
    ListExpression {
        expressions: Vec<NodeId>,
    },
    NumberLiteral {
        token: String,
    },
    StringLiteral {
        escaped_value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    UndefinedLiteral,
    RegularExpressionLiteral {
        token: String,
    },
    ThisExpression,
    EmptyExpression,
    LineComment,
    BlockComment,
    DocComment {
        tags: Vec<NodeId>,
        /// Raw comment text, kept for the matcher's legacy comparison mode.
        comment_text: String,
    },
    TagElement {
        tag_name: Option<String>,
        fragments: Vec<NodeId>,
    },
    TextElement {
        text: String,
    },
    MemberRef {
        qualifier: Option<NodeId>,
        name: NodeId,
    },
    FunctionRef {
        qualifier: Option<NodeId>,
        name: NodeId,
        parameters: Vec<NodeId>,
    },
    FunctionRefParameter {
        param_type: Option<NodeId>,
        name: Option<NodeId>,
    },
}

impl NodeData {
    /// Structurally empty payload for a freshly created node of `kind`.
    pub(crate) fn empty_for(kind: NodeKind) -> NodeData {
        match kind {
            NodeKind::SimpleName => NodeData::SimpleName {
                identifier: "MISSING".to_string(),
            },
            NodeKind::QualifiedName => NodeData::QualifiedName {
                qualifier: NodeId::NONE,
                name: NodeId::NONE,
            },
            NodeKind::SimpleType => NodeData::SimpleType { name: NodeId::NONE },
            NodeKind::QualifiedType => NodeData::QualifiedType {
                qualifier: NodeId::NONE,
                name: NodeId::NONE,
            },
            NodeKind::ArrayType => NodeData::ArrayType {
                component_type: NodeId::NONE,
            },
            NodeKind::InferredType => NodeData::InferredType {
                type_name: String::new(),
            },
            NodeKind::ScriptUnit => NodeData::ScriptUnit {
                package: None,
                imports: Vec::new(),
                statements: Vec::new(),
                comments: Vec::new(),
            },
            NodeKind::PackageDeclaration => NodeData::PackageDeclaration {
                doc: None,
                name: NodeId::NONE,
            },
            NodeKind::ImportDeclaration => NodeData::ImportDeclaration {
                name: NodeId::NONE,
                on_demand: false,
            },
            NodeKind::FunctionDeclaration => NodeData::FunctionDeclaration {
                doc: None,
                name: None,
                parameters: Vec::new(),
                body: None,
                is_constructor: false,
            },
            NodeKind::TypeDeclaration => NodeData::TypeDeclaration {
                doc: None,
                name: NodeId::NONE,
                superclass: None,
                body_declarations: Vec::new(),
            },
            NodeKind::TypeDeclarationStatement => NodeData::TypeDeclarationStatement {
                declaration: NodeId::NONE,
            },
            NodeKind::FieldDeclaration => NodeData::FieldDeclaration {
                doc: None,
                fragments: Vec::new(),
            },
            NodeKind::Initializer => NodeData::Initializer {
                doc: None,
                body: NodeId::NONE,
                is_static: false,
            },
            NodeKind::SingleVariableDeclaration => NodeData::SingleVariableDeclaration {
                name: NodeId::NONE,
                var_type: None,
                initializer: None,
            },
            NodeKind::VariableDeclarationFragment => NodeData::VariableDeclarationFragment {
                name: NodeId::NONE,
                initializer: None,
            },
            NodeKind::VariableDeclarationStatement => NodeData::VariableDeclarationStatement {
                doc: None,
                fragments: Vec::new(),
            },
            NodeKind::VariableDeclarationExpression => NodeData::VariableDeclarationExpression {
                fragments: Vec::new(),
            },
            NodeKind::Block => NodeData::Block {
                statements: Vec::new(),
            },
            NodeKind::IfStatement => NodeData::IfStatement {
                expression: NodeId::NONE,
                then_statement: NodeId::NONE,
                else_statement: None,
            },
            NodeKind::WhileStatement => NodeData::WhileStatement {
                expression: NodeId::NONE,
                body: NodeId::NONE,
            },
            NodeKind::DoStatement => NodeData::DoStatement {
                body: NodeId::NONE,
                expression: NodeId::NONE,
            },
            NodeKind::ForStatement => NodeData::ForStatement {
                initializers: Vec::new(),
                expression: None,
                updaters: Vec::new(),
                body: NodeId::NONE,
            },
            NodeKind::ForInStatement => NodeData::ForInStatement {
                iteration_variable: NodeId::NONE,
                collection: NodeId::NONE,
                body: NodeId::NONE,
            },
            NodeKind::BreakStatement => NodeData::BreakStatement { label: None },
            NodeKind::ContinueStatement => NodeData::ContinueStatement { label: None },
            NodeKind::ReturnStatement => NodeData::ReturnStatement { expression: None },
            NodeKind::ThrowStatement => NodeData::ThrowStatement {
                expression: NodeId::NONE,
            },
            NodeKind::TryStatement => NodeData::TryStatement {
                body: NodeId::NONE,
                catch_clauses: Vec::new(),
                finally_block: None,
            },
            NodeKind::CatchClause => NodeData::CatchClause {
                exception: NodeId::NONE,
                body: NodeId::NONE,
            },
            NodeKind::SwitchStatement => NodeData::SwitchStatement {
                expression: NodeId::NONE,
                statements: Vec::new(),
            },
            NodeKind::SwitchCase => NodeData::SwitchCase { expression: None },
            NodeKind::LabeledStatement => NodeData::LabeledStatement {
                label: NodeId::NONE,
                body: NodeId::NONE,
            },
            NodeKind::EmptyStatement => NodeData::EmptyStatement,
            NodeKind::ExpressionStatement => NodeData::ExpressionStatement {
                expression: NodeId::NONE,
            },
            NodeKind::WithStatement => NodeData::WithStatement {
                expression: NodeId::NONE,
                body: NodeId::NONE,
            },
            NodeKind::Assignment => NodeData::Assignment {
                left: NodeId::NONE,
                operator: AssignmentOperator::Assign,
                right: NodeId::NONE,
            },
            NodeKind::InfixExpression => NodeData::InfixExpression {
                left: NodeId::NONE,
                operator: InfixOperator::Plus,
                right: NodeId::NONE,
                extended_operands: Vec::new(),
            },
            NodeKind::PrefixExpression => NodeData::PrefixExpression {
                operator: PrefixOperator::Plus,
                operand: NodeId::NONE,
            },
            NodeKind::PostfixExpression => NodeData::PostfixExpression {
                operand: NodeId::NONE,
                operator: PostfixOperator::Increment,
            },
            NodeKind::ConditionalExpression => NodeData::ConditionalExpression {
                expression: NodeId::NONE,
                then_expression: NodeId::NONE,
                else_expression: NodeId::NONE,
            },
            NodeKind::ParenthesizedExpression => NodeData::ParenthesizedExpression {
                expression: NodeId::NONE,
            },
            NodeKind::ArrayAccess => NodeData::ArrayAccess {
                array: NodeId::NONE,
                index: NodeId::NONE,
            },
            NodeKind::FieldAccess => NodeData::FieldAccess {
                expression: NodeId::NONE,
                name: NodeId::NONE,
            },
            NodeKind::FunctionInvocation => NodeData::FunctionInvocation {
                expression: None,
                name: None,
                arguments: Vec::new(),
            },
            NodeKind::ClassInstanceCreation => NodeData::ClassInstanceCreation {
                member: NodeId::NONE,
                arguments: Vec::new(),
            },
            NodeKind::ArrayInitializer => NodeData::ArrayInitializer {
                expressions: Vec::new(),
            },
            NodeKind::ObjectLiteral => NodeData::ObjectLiteral { fields: Vec::new() },
            NodeKind::ObjectLiteralField => NodeData::ObjectLiteralField {
                field_name: NodeId::NONE,
                initializer: NodeId::NONE,
                kind: PropertyKind::Init,
            },
            NodeKind::FunctionExpression => NodeData::FunctionExpression {
                method: NodeId::NONE,
            },
            NodeKind::ListExpression => NodeData::ListExpression {
                expressions: Vec::new(),
            },
            NodeKind::NumberLiteral => NodeData::NumberLiteral {
                token: "0".to_string(),
            },
            NodeKind::StringLiteral => NodeData::StringLiteral {
                escaped_value: "\"\"".to_string(),
            },
            NodeKind::BooleanLiteral => NodeData::BooleanLiteral { value: false },
            NodeKind::NullLiteral => NodeData::NullLiteral,
            NodeKind::UndefinedLiteral => NodeData::UndefinedLiteral,
            NodeKind::RegularExpressionLiteral => NodeData::RegularExpressionLiteral {
                token: "/ /".to_string(),
            },
            NodeKind::ThisExpression => NodeData::ThisExpression,
            NodeKind::EmptyExpression => NodeData::EmptyExpression,
            NodeKind::LineComment => NodeData::LineComment,
            NodeKind::BlockComment => NodeData::BlockComment,
            NodeKind::DocComment => NodeData::DocComment {
                tags: Vec::new(),
                comment_text: String::new(),
            },
            NodeKind::TagElement => NodeData::TagElement {
                tag_name: None,
                fragments: Vec::new(),
            },
            NodeKind::TextElement => NodeData::TextElement {
                text: String::new(),
            },
            NodeKind::MemberRef => NodeData::MemberRef {
                qualifier: None,
                name: NodeId::NONE,
            },
            NodeKind::FunctionRef => NodeData::FunctionRef {
                qualifier: None,
                name: NodeId::NONE,
                parameters: Vec::new(),
            },
            NodeKind::FunctionRefParameter => NodeData::FunctionRefParameter {
                param_type: None,
                name: None,
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::SimpleName { .. } => NodeKind::SimpleName,
            NodeData::QualifiedName { .. } => NodeKind::QualifiedName,
            NodeData::SimpleType { .. } => NodeKind::SimpleType,
            NodeData::QualifiedType { .. } => NodeKind::QualifiedType,
            NodeData::ArrayType { .. } => NodeKind::ArrayType,
            NodeData::InferredType { .. } => NodeKind::InferredType,
            NodeData::ScriptUnit { .. } => NodeKind::ScriptUnit,
            NodeData::PackageDeclaration { .. } => NodeKind::PackageDeclaration,
            NodeData::ImportDeclaration { .. } => NodeKind::ImportDeclaration,
            NodeData::FunctionDeclaration { .. } => NodeKind::FunctionDeclaration,
            NodeData::TypeDeclaration { .. } => NodeKind::TypeDeclaration,
            NodeData::TypeDeclarationStatement { .. } => NodeKind::TypeDeclarationStatement,
            NodeData::FieldDeclaration { .. } => NodeKind::FieldDeclaration,
            NodeData::Initializer { .. } => NodeKind::Initializer,
            NodeData::SingleVariableDeclaration { .. } => NodeKind::SingleVariableDeclaration,
            NodeData::VariableDeclarationFragment { .. } => NodeKind::VariableDeclarationFragment,
            NodeData::VariableDeclarationStatement { .. } => NodeKind::VariableDeclarationStatement,
            NodeData::VariableDeclarationExpression { .. } => {
                NodeKind::VariableDeclarationExpression
            }
            NodeData::Block { .. } => NodeKind::Block,
            NodeData::IfStatement { .. } => NodeKind::IfStatement,
            NodeData::WhileStatement { .. } => NodeKind::WhileStatement,
            NodeData::DoStatement { .. } => NodeKind::DoStatement,
            NodeData::ForStatement { .. } => NodeKind::ForStatement,
            NodeData::ForInStatement { .. } => NodeKind::ForInStatement,
            NodeData::BreakStatement { .. } => NodeKind::BreakStatement,
            NodeData::ContinueStatement { .. } => NodeKind::ContinueStatement,
            NodeData::ReturnStatement { .. } => NodeKind::ReturnStatement,
            NodeData::ThrowStatement { .. } => NodeKind::ThrowStatement,
            NodeData::TryStatement { .. } => NodeKind::TryStatement,
            NodeData::CatchClause { .. } => NodeKind::CatchClause,
            NodeData::SwitchStatement { .. } => NodeKind::SwitchStatement,
            NodeData::SwitchCase { .. } => NodeKind::SwitchCase,
            NodeData::LabeledStatement { .. } => NodeKind::LabeledStatement,
            NodeData::EmptyStatement => NodeKind::EmptyStatement,
            NodeData::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            NodeData::WithStatement { .. } => NodeKind::WithStatement,
            NodeData::Assignment { .. } => NodeKind::Assignment,
            NodeData::InfixExpression { .. } => NodeKind::InfixExpression,
            NodeData::PrefixExpression { .. } => NodeKind::PrefixExpression,
            NodeData::PostfixExpression { .. } => NodeKind::PostfixExpression,
            NodeData::ConditionalExpression { .. } => NodeKind::ConditionalExpression,
            NodeData::ParenthesizedExpression { .. } => NodeKind::ParenthesizedExpression,
            NodeData::ArrayAccess { .. } => NodeKind::ArrayAccess,
            NodeData::FieldAccess { .. } => NodeKind::FieldAccess,
            NodeData::FunctionInvocation { .. } => NodeKind::FunctionInvocation,
            NodeData::ClassInstanceCreation { .. } => NodeKind::ClassInstanceCreation,
            NodeData::ArrayInitializer { .. } => NodeKind::ArrayInitializer,
            NodeData::ObjectLiteral { .. } => NodeKind::ObjectLiteral,
            NodeData::ObjectLiteralField { .. } => NodeKind::ObjectLiteralField,
            NodeData::FunctionExpression { .. } => NodeKind::FunctionExpression,
            NodeData::ListExpression { .. } => NodeKind::ListExpression,
            NodeData::NumberLiteral { .. } => NodeKind::NumberLiteral,
            NodeData::StringLiteral { .. } => NodeKind::StringLiteral,
            NodeData::BooleanLiteral { .. } => NodeKind::BooleanLiteral,
            NodeData::NullLiteral => NodeKind::NullLiteral,
            NodeData::UndefinedLiteral => NodeKind::UndefinedLiteral,
            NodeData::RegularExpressionLiteral { .. } => NodeKind::RegularExpressionLiteral,
            NodeData::ThisExpression => NodeKind::ThisExpression,
            NodeData::EmptyExpression => NodeKind::EmptyExpression,
            NodeData::LineComment => NodeKind::LineComment,
            NodeData::BlockComment => NodeKind::BlockComment,
            NodeData::DocComment { .. } => NodeKind::DocComment,
            NodeData::TagElement { .. } => NodeKind::TagElement,
            NodeData::TextElement { .. } => NodeKind::TextElement,
            NodeData::MemberRef { .. } => NodeKind::MemberRef,
            NodeData::FunctionRef { .. } => NodeKind::FunctionRef,
            NodeData::FunctionRefParameter { .. } => NodeKind::FunctionRefParameter,
        }
    }
}
