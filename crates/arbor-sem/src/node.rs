//! Internal tree nodes and the arena that owns them.

use rustc_hash::FxHashMap;

use crate::bindings::{ScopeInfo, SemBinding, SemBindingId};

/// Index of a node in a [`SemArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemId(pub u32);

impl SemId {
    pub const NONE: SemId = SemId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == SemId::NONE
    }
}

/// Packed node bits, mirroring the front end's per-node bit field.
pub mod sem_bits {
    /// Infix/unary operator id, see [`super::op`].
    pub const OP_MASK: u32 = 0x0000_003F;
    pub const OP_SHIFT: u32 = 0;
    /// Number of explicit parenthesis pairs around the expression.
    pub const PAREN_MASK: u32 = 0x0000_3F00;
    pub const PAREN_SHIFT: u32 = 8;
    /// The front end recovered this node from erroneous source.
    pub const IS_RECOVERED: u32 = 1 << 16;

    #[inline]
    pub fn operator(bits: u32) -> u32 {
        (bits & OP_MASK) >> OP_SHIFT
    }

    #[inline]
    pub fn paren_depth(bits: u32) -> u32 {
        (bits & PAREN_MASK) >> PAREN_SHIFT
    }

    #[inline]
    pub fn with_operator(bits: u32, op: u32) -> u32 {
        (bits & !OP_MASK) | ((op << OP_SHIFT) & OP_MASK)
    }

    #[inline]
    pub fn with_paren_depth(bits: u32, depth: u32) -> u32 {
        (bits & !PAREN_MASK) | ((depth << PAREN_SHIFT) & PAREN_MASK)
    }
}

/// Operator ids stored in the `bits` word of expression nodes.
pub mod op {
    pub const AND_AND: u32 = 1;
    pub const OR_OR: u32 = 2;
    pub const AND: u32 = 3;
    pub const OR: u32 = 4;
    pub const XOR: u32 = 5;
    pub const PLUS: u32 = 6;
    pub const MINUS: u32 = 7;
    pub const TIMES: u32 = 8;
    pub const DIVIDE: u32 = 9;
    pub const REMAINDER: u32 = 10;
    pub const LEFT_SHIFT: u32 = 11;
    pub const RIGHT_SHIFT_SIGNED: u32 = 12;
    pub const RIGHT_SHIFT_UNSIGNED: u32 = 13;
    pub const LESS: u32 = 14;
    pub const LESS_EQUAL: u32 = 15;
    pub const GREATER: u32 = 16;
    pub const GREATER_EQUAL: u32 = 17;
    pub const EQUAL_EQUAL: u32 = 18;
    pub const NOT_EQUAL: u32 = 19;
    pub const EQUAL_EQUAL_EQUAL: u32 = 20;
    pub const NOT_EQUAL_EQUAL: u32 = 21;
    pub const INSTANCEOF: u32 = 22;
    pub const IN: u32 = 23;
    pub const NOT: u32 = 24;
    pub const TWIDDLE: u32 = 25;
    pub const UNARY_PLUS: u32 = 26;
    pub const UNARY_MINUS: u32 = 27;
    pub const PLUS_PLUS: u32 = 28;
    pub const MINUS_MINUS: u32 = 29;
    pub const TYPEOF: u32 = 30;
    pub const DELETE: u32 = 31;
    pub const VOID: u32 = 32;
}

/// How an object literal field binds its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectFieldKind {
    Init,
    Getter,
    Setter,
}

/// Per-variant payload of an internal node.
///
/// Child references are [`SemId`]s into the owning arena; `SemId::NONE` never
/// appears inside a `Vec`, absent children are `Option`.
#[derive(Clone, Debug)]
pub enum SemData {
    // Names and references
    SingleNameReference {
        name: String,
        binding: Option<SemBindingId>,
    },
    QualifiedNameReference {
        tokens: Vec<String>,
        binding: Option<SemBindingId>,
    },
    ThisReference,
    FieldReference {
        receiver: SemId,
        token: String,
        binding: Option<SemBindingId>,
    },
    ArrayReference {
        receiver: SemId,
        position: SemId,
    },

    // Type references
    SingleTypeReference {
        name: String,
        binding: Option<SemBindingId>,
    },
    QualifiedTypeReference {
        tokens: Vec<String>,
        binding: Option<SemBindingId>,
    },
    ArrayTypeReference {
        name: String,
        dimensions: u32,
        binding: Option<SemBindingId>,
    },

    // Calls and allocation
    MessageSend {
        receiver: Option<SemId>,
        selector: String,
        arguments: Vec<SemId>,
        binding: Option<SemBindingId>,
    },
    AllocationExpression {
        member: SemId,
        arguments: Vec<SemId>,
        binding: Option<SemBindingId>,
    },

    // Operators
    AndAndExpression {
        left: SemId,
        right: SemId,
    },
    OrOrExpression {
        left: SemId,
        right: SemId,
    },
    BinaryExpression {
        left: SemId,
        right: SemId,
    },
    StringLiteralConcatenation {
        literals: Vec<SemId>,
    },
    UnaryExpression {
        operand: SemId,
    },
    PrefixExpression {
        operand: SemId,
    },
    PostfixExpression {
        operand: SemId,
    },
    ConditionalExpression {
        condition: SemId,
        then_expr: SemId,
        else_expr: SemId,
    },
    Assignment {
        lhs: SemId,
        rhs: SemId,
    },
    CompoundAssignment {
        lhs: SemId,
        rhs: SemId,
    },

    // Literals
    NumberLiteral {
        token: String,
    },
    StringLiteral {
        token: String,
    },
    RegExLiteral {
        token: String,
    },
    TrueLiteral,
    FalseLiteral,
    NullLiteral,
    UndefinedLiteral,
    ArrayInitializer {
        expressions: Vec<SemId>,
    },
    ObjectLiteral {
        fields: Vec<SemId>,
    },
    ObjectLiteralField {
        name: SemId,
        initializer: SemId,
        kind: ObjectFieldKind,
        doc_anchor: Option<u32>,
    },
    FunctionExpression {
        method: SemId,
    },
    ListExpression {
        expressions: Vec<SemId>,
    },

    // Statements
    Block {
        statements: Vec<SemId>,
    },
    LocalDeclaration {
        name: String,
        name_start: u32,
        name_end: u32,
        declaration_source_start: u32,
        type_ref: Option<SemId>,
        initializer: Option<SemId>,
        binding: Option<SemBindingId>,
        doc_anchor: Option<u32>,
    },
    IfStatement {
        condition: SemId,
        then_statement: Option<SemId>,
        else_statement: Option<SemId>,
    },
    WhileStatement {
        condition: SemId,
        action: Option<SemId>,
    },
    DoStatement {
        condition: SemId,
        action: Option<SemId>,
    },
    ForStatement {
        initializations: Vec<SemId>,
        condition: Option<SemId>,
        increments: Vec<SemId>,
        action: Option<SemId>,
    },
    ForInStatement {
        iteration_variable: SemId,
        collection: SemId,
        action: Option<SemId>,
    },
    BreakStatement {
        label: Option<String>,
    },
    ContinueStatement {
        label: Option<String>,
    },
    ReturnStatement {
        expression: Option<SemId>,
    },
    ThrowStatement {
        exception: SemId,
    },
    TryStatement {
        try_block: SemId,
        catch_arguments: Vec<SemId>,
        catch_blocks: Vec<SemId>,
        finally_block: Option<SemId>,
    },
    SwitchStatement {
        expression: SemId,
        statements: Vec<SemId>,
    },
    CaseStatement {
        constant_expression: Option<SemId>,
    },
    LabeledStatement {
        label: String,
        statement: SemId,
    },
    EmptyStatement,
    WithStatement {
        condition: SemId,
        action: Option<SemId>,
    },

    // Declarations
    MethodDeclaration {
        selector: Option<String>,
        name_start: u32,
        name_end: u32,
        arguments: Vec<SemId>,
        statements: Vec<SemId>,
        is_constructor: bool,
        binding: Option<SemBindingId>,
        doc_anchor: Option<u32>,
    },
    Argument {
        name: String,
        type_ref: Option<SemId>,
        binding: Option<SemBindingId>,
    },
    TypeDeclaration {
        name: String,
        name_start: u32,
        name_end: u32,
        superclass: Option<SemId>,
        fields: Vec<SemId>,
        methods: Vec<SemId>,
        binding: Option<SemBindingId>,
        doc_anchor: Option<u32>,
    },
    FieldDeclaration {
        name: String,
        name_start: u32,
        name_end: u32,
        declaration_source_start: u32,
        initializer: Option<SemId>,
        binding: Option<SemBindingId>,
        doc_anchor: Option<u32>,
    },
    InitializerBlock {
        block: SemId,
        is_static: bool,
    },
    ImportReference {
        tokens: Vec<String>,
        on_demand: bool,
    },
    Unit {
        package: Option<SemId>,
        imports: Vec<SemId>,
        statements: Vec<SemId>,
    },
}

/// One internal node: inclusive source offsets, packed bits, payload.
#[derive(Clone, Debug)]
pub struct SemNode {
    pub source_start: u32,
    pub source_end: u32,
    pub bits: u32,
    pub data: SemData,
}

impl SemNode {
    #[inline]
    pub fn operator(&self) -> u32 {
        sem_bits::operator(self.bits)
    }

    #[inline]
    pub fn paren_depth(&self) -> u32 {
        sem_bits::paren_depth(self.bits)
    }

    /// True for the expression variants (everything that can appear in
    /// expression-statement position).
    pub fn is_expression(&self) -> bool {
        matches!(
            self.data,
            SemData::SingleNameReference { .. }
                | SemData::QualifiedNameReference { .. }
                | SemData::ThisReference
                | SemData::FieldReference { .. }
                | SemData::ArrayReference { .. }
                | SemData::MessageSend { .. }
                | SemData::AllocationExpression { .. }
                | SemData::AndAndExpression { .. }
                | SemData::OrOrExpression { .. }
                | SemData::BinaryExpression { .. }
                | SemData::StringLiteralConcatenation { .. }
                | SemData::UnaryExpression { .. }
                | SemData::PrefixExpression { .. }
                | SemData::PostfixExpression { .. }
                | SemData::ConditionalExpression { .. }
                | SemData::Assignment { .. }
                | SemData::CompoundAssignment { .. }
                | SemData::NumberLiteral { .. }
                | SemData::StringLiteral { .. }
                | SemData::RegExLiteral { .. }
                | SemData::TrueLiteral
                | SemData::FalseLiteral
                | SemData::NullLiteral
                | SemData::UndefinedLiteral
                | SemData::ArrayInitializer { .. }
                | SemData::ObjectLiteral { .. }
                | SemData::FunctionExpression { .. }
                | SemData::ListExpression { .. }
        )
    }
}

/// Arena owning one internal tree plus its semantic objects.
///
/// The converter and resolver treat the arena as read-only; only the front
/// end (or a test standing in for it) populates it.
#[derive(Default)]
pub struct SemArena {
    nodes: Vec<SemNode>,
    bindings: Vec<SemBinding>,
    /// Declaration node -> scope contents, filled in by the analyzer.
    scopes: FxHashMap<u32, ScopeInfo>,
}

impl SemArena {
    pub fn new() -> SemArena {
        SemArena::default()
    }

    /// Append a node; offsets are inclusive, as the front end reports them.
    pub fn add(&mut self, source_start: u32, source_end: u32, data: SemData) -> SemId {
        let id = SemId(self.nodes.len() as u32);
        self.nodes.push(SemNode {
            source_start,
            source_end,
            bits: 0,
            data,
        });
        id
    }

    /// Append a node with explicit bits (operator id, paren depth).
    pub fn add_with_bits(
        &mut self,
        source_start: u32,
        source_end: u32,
        bits: u32,
        data: SemData,
    ) -> SemId {
        let id = self.add(source_start, source_end, data);
        self.nodes[id.0 as usize].bits = bits;
        id
    }

    #[inline]
    pub fn get(&self, id: SemId) -> Option<&SemNode> {
        if id.is_none() {
            None
        } else {
            self.nodes.get(id.0 as usize)
        }
    }

    /// Panic-free lookup used in converter hot paths where the id is known
    /// to come from this arena.
    #[inline]
    pub fn node(&self, id: SemId) -> &SemNode {
        &self.nodes[id.0 as usize]
    }

    pub fn set_bits(&mut self, id: SemId, bits: u32) {
        self.nodes[id.0 as usize].bits = bits;
    }

    /// Mutable access for the front end while it is still building the
    /// tree, e.g. to patch a binding in after the referent is analyzed.
    pub fn node_mut(&mut self, id: SemId) -> &mut SemNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Wrap an expression in `depth` explicit parenthesis pairs and widen its
    /// reported range to `[start, end]` of the outermost `(`/`)`.
    pub fn parenthesize(&mut self, id: SemId, depth: u32) {
        let node = &mut self.nodes[id.0 as usize];
        node.bits = sem_bits::with_paren_depth(node.bits, depth);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Semantic objects

    pub fn add_binding(&mut self, binding: SemBinding) -> SemBindingId {
        let id = SemBindingId(self.bindings.len() as u32);
        self.bindings.push(binding);
        id
    }

    #[inline]
    pub fn binding(&self, id: SemBindingId) -> &SemBinding {
        &self.bindings[id.0 as usize]
    }

    pub fn bindings(&self) -> &[SemBinding] {
        &self.bindings
    }

    /// Record the analyzer's scope for a declaration node.
    pub fn set_scope(&mut self, declaration: SemId, scope: ScopeInfo) {
        self.scopes.insert(declaration.0, scope);
    }

    /// The analyzer's scope for a declaration, if it built one.
    pub fn scope_for_declaration(&self, declaration: SemId) -> Option<&ScopeInfo> {
        self.scopes.get(&declaration.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        let bits = sem_bits::with_paren_depth(sem_bits::with_operator(0, op::AND_AND), 2);
        assert_eq!(sem_bits::operator(bits), op::AND_AND);
        assert_eq!(sem_bits::paren_depth(bits), 2);
    }

    #[test]
    fn arena_add_and_get() {
        let mut arena = SemArena::new();
        let id = arena.add(0, 0, SemData::ThisReference);
        assert_eq!(arena.node(id).source_start, 0);
        assert!(arena.get(SemId::NONE).is_none());
        assert!(arena.node(id).is_expression());
    }
}
