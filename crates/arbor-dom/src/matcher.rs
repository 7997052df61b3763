//! Structural subtree matching.
//!
//! [`AstMatcher`] compares two subtrees, possibly from different owning
//! trees, for structural equality: same kinds, same simple-property values,
//! same children in the same slots. Source ranges, flags, bindings, and the
//! unit comment table never participate. Every node kind has its own hook
//! with a generic default, so a client can relax or tighten the comparison
//! for the kinds it cares about and inherit the rest.

use crate::node::{NodeId, NodeKind};
use crate::props::{
    SimpleProperty, SimpleValue, StructuralProperty, simple_properties, structural_properties,
};
use crate::tree::Ast;

/// One node of one owning tree, the unit the matcher walks.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    pub ast: &'a Ast,
    pub id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn new(ast: &'a Ast, id: NodeId) -> NodeRef<'a> {
        NodeRef { ast, id }
    }

    pub fn kind(self) -> Option<NodeKind> {
        self.ast.kind(self.id).ok()
    }

    /// Child in a single-valued slot; `None` for unset slots (required
    /// children are read without materializing).
    fn child(self, prop: StructuralProperty) -> Option<NodeRef<'a>> {
        self.ast
            .optional_child(self.id, prop)
            .ok()
            .flatten()
            .map(|id| NodeRef { ast: self.ast, id })
    }

    fn list(self, prop: StructuralProperty) -> Option<Vec<NodeRef<'a>>> {
        let ids = self.ast.children(self.id, prop).ok()?;
        Some(ids.into_iter().map(|id| NodeRef { ast: self.ast, id }).collect())
    }

    fn value(self, prop: SimpleProperty) -> Option<SimpleValue> {
        self.ast.value(self.id, prop).ok()
    }
}

/// Generic comparison shared by every default hook: equal kinds, equal
/// simple values, and recursively matching children slot by slot.
pub fn default_match<M: AstMatcher + ?Sized>(
    matcher: &M,
    left: NodeRef<'_>,
    right: NodeRef<'_>,
) -> bool {
    let (Some(kind), Some(right_kind)) = (left.kind(), right.kind()) else {
        return false;
    };
    if kind != right_kind {
        return false;
    }
    for prop in simple_properties(kind) {
        if left.value(*prop) != right.value(*prop) {
            return false;
        }
    }
    for prop in structural_properties(kind) {
        match (left.list(*prop), right.list(*prop)) {
            (Some(l), Some(r)) => {
                if l.len() != r.len() {
                    return false;
                }
                if !l
                    .into_iter()
                    .zip(r)
                    .all(|(lc, rc)| matcher.subtree_match(lc, rc))
                {
                    return false;
                }
            }
            (None, None) => match (left.child(*prop), right.child(*prop)) {
                (Some(lc), Some(rc)) => {
                    if !matcher.subtree_match(lc, rc) {
                        return false;
                    }
                }
                (None, None) => {}
                _ => return false,
            },
            _ => return false,
        }
    }
    true
}

macro_rules! declare_matcher {
    ($($kind:ident => $method:ident),* $(,)?) => {
        /// Per-kind matching hooks over a generic structural walk.
        ///
        /// [`AstMatcher::subtree_match`] dispatches on the left node's kind;
        /// a kind mismatch is never a match. Each hook defaults to
        /// [`default_match`].
        pub trait AstMatcher {
            fn subtree_match(&self, left: NodeRef<'_>, right: NodeRef<'_>) -> bool {
                let (Some(kind), Some(right_kind)) = (left.kind(), right.kind()) else {
                    return false;
                };
                if kind != right_kind {
                    return false;
                }
                match kind {
                    $(NodeKind::$kind => self.$method(left, right),)*
                }
            }

            $(
                fn $method(&self, left: NodeRef<'_>, right: NodeRef<'_>) -> bool {
                    default_match(self, left, right)
                }
            )*
        }
    };
}

declare_matcher! {
    SimpleName => match_simple_name,
    QualifiedName => match_qualified_name,
    SimpleType => match_simple_type,
    QualifiedType => match_qualified_type,
    ArrayType => match_array_type,
    InferredType => match_inferred_type,
    ScriptUnit => match_script_unit,
    PackageDeclaration => match_package_declaration,
    ImportDeclaration => match_import_declaration,
    FunctionDeclaration => match_function_declaration,
    TypeDeclaration => match_type_declaration,
    TypeDeclarationStatement => match_type_declaration_statement,
    FieldDeclaration => match_field_declaration,
    Initializer => match_initializer,
    SingleVariableDeclaration => match_single_variable_declaration,
    VariableDeclarationFragment => match_variable_declaration_fragment,
    VariableDeclarationStatement => match_variable_declaration_statement,
    VariableDeclarationExpression => match_variable_declaration_expression,
    Block => match_block,
    IfStatement => match_if_statement,
    WhileStatement => match_while_statement,
    DoStatement => match_do_statement,
    ForStatement => match_for_statement,
    ForInStatement => match_for_in_statement,
    BreakStatement => match_break_statement,
    ContinueStatement => match_continue_statement,
    ReturnStatement => match_return_statement,
    ThrowStatement => match_throw_statement,
    TryStatement => match_try_statement,
    CatchClause => match_catch_clause,
    SwitchStatement => match_switch_statement,
    SwitchCase => match_switch_case,
    LabeledStatement => match_labeled_statement,
    EmptyStatement => match_empty_statement,
    ExpressionStatement => match_expression_statement,
    WithStatement => match_with_statement,
    Assignment => match_assignment,
    InfixExpression => match_infix_expression,
    PrefixExpression => match_prefix_expression,
    PostfixExpression => match_postfix_expression,
    ConditionalExpression => match_conditional_expression,
    ParenthesizedExpression => match_parenthesized_expression,
    ArrayAccess => match_array_access,
    FieldAccess => match_field_access,
    FunctionInvocation => match_function_invocation,
    ClassInstanceCreation => match_class_instance_creation,
    ArrayInitializer => match_array_initializer,
    ObjectLiteral => match_object_literal,
    ObjectLiteralField => match_object_literal_field,
    FunctionExpression => match_function_expression,
    ListExpression => match_list_expression,
    NumberLiteral => match_number_literal,
    StringLiteral => match_string_literal,
    BooleanLiteral => match_boolean_literal,
    NullLiteral => match_null_literal,
    UndefinedLiteral => match_undefined_literal,
    RegularExpressionLiteral => match_regular_expression_literal,
    ThisExpression => match_this_expression,
    EmptyExpression => match_empty_expression,
    LineComment => match_line_comment,
    BlockComment => match_block_comment,
    DocComment => match_doc_comment,
    TagElement => match_tag_element,
    TextElement => match_text_element,
    MemberRef => match_member_ref,
    FunctionRef => match_function_ref,
    FunctionRefParameter => match_function_ref_parameter,
}

/// The stock matcher.
///
/// Doc comments compare by raw text unless `match_doc_tags` is set, in which
/// case the parsed tag structure is compared instead.
#[derive(Clone, Debug, Default)]
pub struct DefaultMatcher {
    pub match_doc_tags: bool,
}

impl DefaultMatcher {
    pub fn new() -> DefaultMatcher {
        DefaultMatcher::default()
    }

    pub fn with_doc_tags() -> DefaultMatcher {
        DefaultMatcher {
            match_doc_tags: true,
        }
    }
}

impl AstMatcher for DefaultMatcher {
    fn match_doc_comment(&self, left: NodeRef<'_>, right: NodeRef<'_>) -> bool {
        if self.match_doc_tags {
            match (
                left.list(StructuralProperty::Tags),
                right.list(StructuralProperty::Tags),
            ) {
                (Some(l), Some(r)) => {
                    l.len() == r.len()
                        && l.into_iter()
                            .zip(r)
                            .all(|(lc, rc)| self.subtree_match(lc, rc))
                }
                _ => false,
            }
        } else {
            let l = left.value(SimpleProperty::CommentText);
            l.is_some() && l == right.value(SimpleProperty::CommentText)
        }
    }
}
