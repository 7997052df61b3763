//! End-to-end conversion: hand-built internal arenas in, public trees out.

use arbor_common::{CancelToken, SourceRange};
use arbor_convert::{ConvertError, convert_unit};
use arbor_dom::{
    AssignmentOperator, Ast, AstMatcher, DefaultMatcher, InfixOperator, NodeFlags, NodeId,
    NodeKind, NodeRef, PostfixOperator, SimpleProperty, SimpleValue, StructuralProperty,
    TreeOptions,
};
use arbor_resolve::BindingResolver;
use arbor_sem::{ScopeInfo, SemArena, SemBinding, SemData, SemId, op, sem_bits};

fn convert(arena: &SemArena, unit: SemId, source: &str) -> (Ast, NodeId) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    convert_unit(arena, unit, source, TreeOptions::default(), None, None)
        .expect("conversion succeeds")
}

fn name_ref(arena: &mut SemArena, name: &str, start: u32, end: u32) -> SemId {
    arena.add(
        start,
        end,
        SemData::SingleNameReference {
            name: name.to_string(),
            binding: None,
        },
    )
}

fn unit_of(arena: &mut SemArena, statements: Vec<SemId>, end: u32) -> SemId {
    arena.add(
        0,
        end,
        SemData::Unit {
            package: None,
            imports: Vec::new(),
            statements,
        },
    )
}

fn statements(ast: &Ast, node: NodeId) -> Vec<NodeId> {
    ast.children(node, StructuralProperty::Statements).unwrap()
}

fn expression(ast: &Ast, stmt: NodeId) -> NodeId {
    ast.child(stmt, StructuralProperty::Expression).unwrap()
}

fn identifier(ast: &Ast, name: NodeId) -> String {
    match ast.value(name, SimpleProperty::Identifier).unwrap() {
        SimpleValue::Str(s) => s,
        other => panic!("expected identifier, got {other:?}"),
    }
}

#[test]
fn logical_chains_flatten_into_extended_operands() {
    let src = "x && y && z;";
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 0, 0);
    let y = name_ref(&mut arena, "y", 5, 5);
    let z = name_ref(&mut arena, "z", 10, 10);
    let inner = arena.add(0, 5, SemData::AndAndExpression { left: x, right: y });
    let outer = arena.add(
        0,
        10,
        SemData::AndAndExpression {
            left: inner,
            right: z,
        },
    );
    let unit = unit_of(&mut arena, vec![outer], 11);

    let (ast, root) = convert(&arena, unit, src);
    let stmt = statements(&ast, root)[0];
    let infix = expression(&ast, stmt);
    assert_eq!(ast.kind(infix).unwrap(), NodeKind::InfixExpression);
    assert_eq!(
        ast.value(infix, SimpleProperty::Operator).unwrap(),
        SimpleValue::InfixOp(InfixOperator::ConditionalAnd)
    );
    let left = ast.child(infix, StructuralProperty::LeftOperand).unwrap();
    let right = ast.child(infix, StructuralProperty::RightOperand).unwrap();
    let extended = ast
        .children(infix, StructuralProperty::ExtendedOperands)
        .unwrap();
    assert_eq!(identifier(&ast, left), "x");
    assert_eq!(identifier(&ast, right), "y");
    assert_eq!(extended.len(), 1);
    assert_eq!(identifier(&ast, extended[0]), "z");
}

#[test]
fn parenthesized_operands_block_flattening() {
    let src = "x && (y && z);";
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 0, 0);
    let y = name_ref(&mut arena, "y", 6, 6);
    let z = name_ref(&mut arena, "z", 11, 11);
    let inner = arena.add(5, 12, SemData::AndAndExpression { left: y, right: z });
    arena.parenthesize(inner, 1);
    let outer = arena.add(
        0,
        12,
        SemData::AndAndExpression {
            left: x,
            right: inner,
        },
    );
    let unit = unit_of(&mut arena, vec![outer], 13);

    let (ast, root) = convert(&arena, unit, src);
    let infix = expression(&ast, statements(&ast, root)[0]);
    assert!(
        ast.children(infix, StructuralProperty::ExtendedOperands)
            .unwrap()
            .is_empty()
    );
    let right = ast.child(infix, StructuralProperty::RightOperand).unwrap();
    assert_eq!(ast.kind(right).unwrap(), NodeKind::ParenthesizedExpression);
    let nested = ast.child(right, StructuralProperty::Expression).unwrap();
    assert_eq!(ast.kind(nested).unwrap(), NodeKind::InfixExpression);
    assert_eq!(
        ast.source_range(nested).unwrap(),
        SourceRange::from_inclusive(6, 11)
    );
}

#[test]
fn parenthesized_left_operand_stops_the_spine_walk() {
    let src = "(x && y) && z;";
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 1, 1);
    let y = name_ref(&mut arena, "y", 6, 6);
    let z = name_ref(&mut arena, "z", 12, 12);
    let inner = arena.add(0, 7, SemData::AndAndExpression { left: x, right: y });
    arena.parenthesize(inner, 1);
    let outer = arena.add(
        0,
        12,
        SemData::AndAndExpression {
            left: inner,
            right: z,
        },
    );
    let unit = unit_of(&mut arena, vec![outer], 13);

    let (ast, root) = convert(&arena, unit, src);
    let infix = expression(&ast, statements(&ast, root)[0]);
    let left = ast.child(infix, StructuralProperty::LeftOperand).unwrap();
    assert_eq!(ast.kind(left).unwrap(), NodeKind::ParenthesizedExpression);
    assert_eq!(identifier(&ast, ast.child(infix, StructuralProperty::RightOperand).unwrap()), "z");
    assert!(
        ast.children(infix, StructuralProperty::ExtendedOperands)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn long_chains_keep_extended_operands_in_source_order() {
    let src = "a + b + c + d;";
    let mut arena = SemArena::new();
    let a = name_ref(&mut arena, "a", 0, 0);
    let b = name_ref(&mut arena, "b", 4, 4);
    let c = name_ref(&mut arena, "c", 8, 8);
    let d = name_ref(&mut arena, "d", 12, 12);
    let ab = arena.add_with_bits(
        0,
        4,
        sem_bits::with_operator(0, op::PLUS),
        SemData::BinaryExpression { left: a, right: b },
    );
    let abc = arena.add_with_bits(
        0,
        8,
        sem_bits::with_operator(0, op::PLUS),
        SemData::BinaryExpression { left: ab, right: c },
    );
    let abcd = arena.add_with_bits(
        0,
        12,
        sem_bits::with_operator(0, op::PLUS),
        SemData::BinaryExpression {
            left: abc,
            right: d,
        },
    );
    let unit = unit_of(&mut arena, vec![abcd], 13);

    let (ast, root) = convert(&arena, unit, src);
    let infix = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(ast.kind(infix).unwrap(), NodeKind::InfixExpression);
    let left = ast.child(infix, StructuralProperty::LeftOperand).unwrap();
    let right = ast.child(infix, StructuralProperty::RightOperand).unwrap();
    assert_eq!(identifier(&ast, left), "a");
    assert_eq!(identifier(&ast, right), "b");
    let extended = ast
        .children(infix, StructuralProperty::ExtendedOperands)
        .unwrap();
    let names: Vec<String> = extended.iter().map(|&n| identifier(&ast, n)).collect();
    assert_eq!(names, ["c", "d"]);
}

#[test]
fn different_operators_do_not_flatten() {
    let src = "a - b + c;";
    let mut arena = SemArena::new();
    let a = name_ref(&mut arena, "a", 0, 0);
    let b = name_ref(&mut arena, "b", 4, 4);
    let c = name_ref(&mut arena, "c", 8, 8);
    let minus = arena.add_with_bits(
        0,
        4,
        sem_bits::with_operator(0, op::MINUS),
        SemData::BinaryExpression { left: a, right: b },
    );
    let plus = arena.add_with_bits(
        0,
        8,
        sem_bits::with_operator(0, op::PLUS),
        SemData::BinaryExpression {
            left: minus,
            right: c,
        },
    );
    let unit = unit_of(&mut arena, vec![plus], 9);

    let (ast, root) = convert(&arena, unit, src);
    let infix = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(
        ast.value(infix, SimpleProperty::Operator).unwrap(),
        SimpleValue::InfixOp(InfixOperator::Plus)
    );
    let left = ast.child(infix, StructuralProperty::LeftOperand).unwrap();
    assert_eq!(ast.kind(left).unwrap(), NodeKind::InfixExpression);
    assert_eq!(
        ast.value(left, SimpleProperty::Operator).unwrap(),
        SimpleValue::InfixOp(InfixOperator::Minus)
    );
    assert!(
        ast.children(infix, StructuralProperty::ExtendedOperands)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn split_declarations_merge_into_one_statement() {
    let src = "var a, b = 1;";
    let mut arena = SemArena::new();
    let decl_a = arena.add(
        4,
        4,
        SemData::LocalDeclaration {
            name: "a".to_string(),
            name_start: 4,
            name_end: 4,
            declaration_source_start: 0,
            type_ref: None,
            initializer: None,
            binding: None,
            doc_anchor: None,
        },
    );
    let one = arena.add(
        11,
        11,
        SemData::NumberLiteral {
            token: "1".to_string(),
        },
    );
    let decl_b = arena.add(
        7,
        11,
        SemData::LocalDeclaration {
            name: "b".to_string(),
            name_start: 7,
            name_end: 7,
            declaration_source_start: 0,
            type_ref: None,
            initializer: Some(one),
            binding: None,
            doc_anchor: None,
        },
    );
    let unit = unit_of(&mut arena, vec![decl_a, decl_b], 12);

    let (ast, root) = convert(&arena, unit, src);
    let stmts = statements(&ast, root);
    assert_eq!(stmts.len(), 1, "both declarators share one statement");
    let stmt = stmts[0];
    assert_eq!(
        ast.kind(stmt).unwrap(),
        NodeKind::VariableDeclarationStatement
    );
    assert_eq!(
        ast.source_range(stmt).unwrap(),
        SourceRange::from_inclusive(0, 11)
    );
    let fragments = ast.children(stmt, StructuralProperty::Fragments).unwrap();
    assert_eq!(fragments.len(), 2);
    let a_name = ast.child(fragments[0], StructuralProperty::Name).unwrap();
    assert_eq!(identifier(&ast, a_name), "a");
    assert!(
        ast.optional_child(fragments[0], StructuralProperty::Initializer)
            .unwrap()
            .is_none()
    );
    let b_init = ast
        .optional_child(fragments[1], StructuralProperty::Initializer)
        .unwrap()
        .expect("b has an initializer");
    assert_eq!(
        ast.value(b_init, SimpleProperty::Token).unwrap(),
        SimpleValue::Str("1".to_string())
    );
}

#[test]
fn separate_declarations_keep_their_own_statements() {
    let src = "var a; var b;";
    let mut arena = SemArena::new();
    let decl_a = arena.add(
        4,
        4,
        SemData::LocalDeclaration {
            name: "a".to_string(),
            name_start: 4,
            name_end: 4,
            declaration_source_start: 0,
            type_ref: None,
            initializer: None,
            binding: None,
            doc_anchor: None,
        },
    );
    let decl_b = arena.add(
        11,
        11,
        SemData::LocalDeclaration {
            name: "b".to_string(),
            name_start: 11,
            name_end: 11,
            declaration_source_start: 7,
            type_ref: None,
            initializer: None,
            binding: None,
            doc_anchor: None,
        },
    );
    let unit = unit_of(&mut arena, vec![decl_a, decl_b], 12);

    let (ast, root) = convert(&arena, unit, src);
    assert_eq!(statements(&ast, root).len(), 2);
}

#[test]
fn for_initializers_become_declaration_expressions() {
    let src = "for (var i = 0; i < n; i++) ;";
    let mut arena = SemArena::new();
    let zero = arena.add(
        13,
        13,
        SemData::NumberLiteral {
            token: "0".to_string(),
        },
    );
    let decl_i = arena.add(
        9,
        13,
        SemData::LocalDeclaration {
            name: "i".to_string(),
            name_start: 9,
            name_end: 9,
            declaration_source_start: 5,
            type_ref: None,
            initializer: Some(zero),
            binding: None,
            doc_anchor: None,
        },
    );
    let i1 = name_ref(&mut arena, "i", 16, 16);
    let n = name_ref(&mut arena, "n", 20, 20);
    let cond = arena.add_with_bits(
        16,
        20,
        sem_bits::with_operator(0, op::LESS),
        SemData::BinaryExpression { left: i1, right: n },
    );
    let i2 = name_ref(&mut arena, "i", 23, 23);
    let incr = arena.add_with_bits(
        23,
        25,
        sem_bits::with_operator(0, op::PLUS_PLUS),
        SemData::PostfixExpression { operand: i2 },
    );
    let for_stmt = arena.add(
        0,
        28,
        SemData::ForStatement {
            initializations: vec![decl_i],
            condition: Some(cond),
            increments: vec![incr],
            action: None,
        },
    );
    let unit = unit_of(&mut arena, vec![for_stmt], 28);

    let (ast, root) = convert(&arena, unit, src);
    let stmt = statements(&ast, root)[0];
    assert_eq!(ast.kind(stmt).unwrap(), NodeKind::ForStatement);
    let inits = ast
        .children(stmt, StructuralProperty::Initializers)
        .unwrap();
    assert_eq!(inits.len(), 1);
    assert_eq!(
        ast.kind(inits[0]).unwrap(),
        NodeKind::VariableDeclarationExpression
    );
    let updaters = ast.children(stmt, StructuralProperty::Updaters).unwrap();
    assert_eq!(
        ast.value(updaters[0], SimpleProperty::Operator).unwrap(),
        SimpleValue::PostfixOp(PostfixOperator::Increment)
    );
    // Absent loop action still fills the required body slot.
    let body = ast.child(stmt, StructuralProperty::Body).unwrap();
    assert_eq!(ast.kind(body).unwrap(), NodeKind::EmptyStatement);
}

#[test]
fn compound_assignment_maps_to_operator_assign() {
    let src = "i += 1;";
    let mut arena = SemArena::new();
    let i = name_ref(&mut arena, "i", 0, 0);
    let one = arena.add(
        5,
        5,
        SemData::NumberLiteral {
            token: "1".to_string(),
        },
    );
    let assign = arena.add_with_bits(
        0,
        5,
        sem_bits::with_operator(0, op::PLUS),
        SemData::CompoundAssignment { lhs: i, rhs: one },
    );
    let unit = unit_of(&mut arena, vec![assign], 6);

    let (ast, root) = convert(&arena, unit, src);
    let expr = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(ast.kind(expr).unwrap(), NodeKind::Assignment);
    assert_eq!(
        ast.value(expr, SimpleProperty::Operator).unwrap(),
        SimpleValue::AssignOp(AssignmentOperator::PlusAssign)
    );
}

#[test]
fn string_concatenation_becomes_a_plus_chain() {
    let src = "\"a\" + \"b\" + \"c\";";
    let mut arena = SemArena::new();
    let a = arena.add(
        0,
        2,
        SemData::StringLiteral {
            token: "\"a\"".to_string(),
        },
    );
    let b = arena.add(
        6,
        8,
        SemData::StringLiteral {
            token: "\"b\"".to_string(),
        },
    );
    let c = arena.add(
        12,
        14,
        SemData::StringLiteral {
            token: "\"c\"".to_string(),
        },
    );
    let concat = arena.add(
        0,
        14,
        SemData::StringLiteralConcatenation {
            literals: vec![a, b, c],
        },
    );
    let unit = unit_of(&mut arena, vec![concat], 15);

    let (ast, root) = convert(&arena, unit, src);
    let infix = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(
        ast.value(infix, SimpleProperty::Operator).unwrap(),
        SimpleValue::InfixOp(InfixOperator::Plus)
    );
    let left = ast.child(infix, StructuralProperty::LeftOperand).unwrap();
    assert_eq!(
        ast.value(left, SimpleProperty::EscapedValue).unwrap(),
        SimpleValue::Str("\"a\"".to_string())
    );
    assert_eq!(
        ast.children(infix, StructuralProperty::ExtendedOperands)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn call_ranges_drop_trailing_trivia() {
    let src = "f(a) /* t */;";
    let mut arena = SemArena::new();
    let a = name_ref(&mut arena, "a", 2, 2);
    let call = arena.add(
        0,
        11,
        SemData::MessageSend {
            receiver: None,
            selector: "f".to_string(),
            arguments: vec![a],
            binding: None,
        },
    );
    let unit = unit_of(&mut arena, vec![call], 12);

    let (ast, root) = convert(&arena, unit, src);
    let invocation = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(ast.kind(invocation).unwrap(), NodeKind::FunctionInvocation);
    assert_eq!(
        ast.source_range(invocation).unwrap(),
        SourceRange::from_inclusive(0, 3),
        "trailing comment is excluded from the call range"
    );
    let name = ast
        .optional_child(invocation, StructuralProperty::Name)
        .unwrap()
        .expect("named call");
    assert_eq!(identifier(&ast, name), "f");
}

#[test]
fn switch_cases_interleave_with_their_statements() {
    let src = "switch (k) { case 1: break; default: }";
    let mut arena = SemArena::new();
    let k = name_ref(&mut arena, "k", 8, 8);
    let one = arena.add(
        18,
        18,
        SemData::NumberLiteral {
            token: "1".to_string(),
        },
    );
    let case_one = arena.add(
        13,
        19,
        SemData::CaseStatement {
            constant_expression: Some(one),
        },
    );
    let brk = arena.add(21, 26, SemData::BreakStatement { label: None });
    let default_case = arena.add(
        28,
        35,
        SemData::CaseStatement {
            constant_expression: None,
        },
    );
    let switch = arena.add(
        0,
        37,
        SemData::SwitchStatement {
            expression: k,
            statements: vec![case_one, brk, default_case],
        },
    );
    let unit = unit_of(&mut arena, vec![switch], 37);

    let (ast, root) = convert(&arena, unit, src);
    let stmt = statements(&ast, root)[0];
    let body = statements(&ast, stmt);
    assert_eq!(body.len(), 3);
    assert_eq!(ast.kind(body[0]).unwrap(), NodeKind::SwitchCase);
    assert_eq!(ast.kind(body[1]).unwrap(), NodeKind::BreakStatement);
    assert_eq!(ast.kind(body[2]).unwrap(), NodeKind::SwitchCase);
    assert!(
        ast.optional_child(body[2], StructuralProperty::Expression)
            .unwrap()
            .is_none(),
        "default case has no constant"
    );
}

#[test]
fn catch_arguments_zip_with_their_blocks() {
    let src = "try { } catch (e) { }";
    let mut arena = SemArena::new();
    let try_block = arena.add(
        4,
        6,
        SemData::Block {
            statements: Vec::new(),
        },
    );
    let e_arg = arena.add(
        15,
        15,
        SemData::Argument {
            name: "e".to_string(),
            type_ref: None,
            binding: None,
        },
    );
    let catch_block = arena.add(
        18,
        20,
        SemData::Block {
            statements: Vec::new(),
        },
    );
    let try_stmt = arena.add(
        0,
        20,
        SemData::TryStatement {
            try_block,
            catch_arguments: vec![e_arg],
            catch_blocks: vec![catch_block],
            finally_block: None,
        },
    );
    let unit = unit_of(&mut arena, vec![try_stmt], 20);

    let (ast, root) = convert(&arena, unit, src);
    let stmt = statements(&ast, root)[0];
    let clauses = ast
        .children(stmt, StructuralProperty::CatchClauses)
        .unwrap();
    assert_eq!(clauses.len(), 1);
    let exception = ast
        .child(clauses[0], StructuralProperty::Exception)
        .unwrap();
    assert_eq!(
        ast.kind(exception).unwrap(),
        NodeKind::SingleVariableDeclaration
    );
    let name = ast.child(exception, StructuralProperty::Name).unwrap();
    assert_eq!(identifier(&ast, name), "e");
}

#[test]
fn doc_comments_attach_and_share_the_table_entry() {
    let src = "/** Greets everyone. */\nfunction hi() {}";
    let mut arena = SemArena::new();
    let method = arena.add(
        24,
        39,
        SemData::MethodDeclaration {
            selector: Some("hi".to_string()),
            name_start: 33,
            name_end: 34,
            arguments: Vec::new(),
            statements: Vec::new(),
            is_constructor: false,
            binding: None,
            doc_anchor: Some(0),
        },
    );
    let unit = unit_of(&mut arena, vec![method], 39);

    let (ast, root) = convert(&arena, unit, src);
    let function = statements(&ast, root)[0];
    let doc = ast
        .optional_child(function, StructuralProperty::Doc)
        .unwrap()
        .expect("doc comment attached");
    assert_eq!(ast.kind(doc).unwrap(), NodeKind::DocComment);
    assert_eq!(
        ast.value(doc, SimpleProperty::CommentText).unwrap(),
        SimpleValue::Str("/** Greets everyone. */".to_string())
    );
    let tags = ast.children(doc, StructuralProperty::Tags).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(
        ast.value(tags[0], SimpleProperty::TagName).unwrap(),
        SimpleValue::OptStr(None),
        "leading description carries no tag name"
    );
    let table = ast.unit_comments(root).unwrap();
    assert_eq!(table, vec![doc], "table entry is the attached node");
}

#[test]
fn tagged_doc_comments_split_into_tag_elements() {
    let src = "/** Sum.\n * @param x addend\n * @returns total\n */\nfunction add(x) {}";
    let mut arena = SemArena::new();
    let x_arg = arena.add(
        63,
        63,
        SemData::Argument {
            name: "x".to_string(),
            type_ref: None,
            binding: None,
        },
    );
    let method = arena.add(
        50,
        67,
        SemData::MethodDeclaration {
            selector: Some("add".to_string()),
            name_start: 59,
            name_end: 61,
            arguments: vec![x_arg],
            statements: Vec::new(),
            is_constructor: false,
            binding: None,
            doc_anchor: Some(0),
        },
    );
    let unit = unit_of(&mut arena, vec![method], 67);

    let (ast, root) = convert(&arena, unit, src);
    let function = statements(&ast, root)[0];
    let doc = ast
        .optional_child(function, StructuralProperty::Doc)
        .unwrap()
        .expect("doc comment attached");
    let tags = ast.children(doc, StructuralProperty::Tags).unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(
        ast.value(tags[1], SimpleProperty::TagName).unwrap(),
        SimpleValue::OptStr(Some("@param".to_string()))
    );
    assert_eq!(
        ast.value(tags[2], SimpleProperty::TagName).unwrap(),
        SimpleValue::OptStr(Some("@returns".to_string()))
    );
    let fragments = ast
        .children(tags[1], StructuralProperty::Fragments)
        .unwrap();
    assert_eq!(
        ast.value(fragments[0], SimpleProperty::Text).unwrap(),
        SimpleValue::Str("x addend".to_string())
    );
}

#[test]
fn see_tags_parse_member_and_function_references() {
    let src = "/** @see Widget#size\n * @see ui.Widget#resize(Number width, Number h)\n */\n";
    let mut arena = SemArena::new();
    let unit = unit_of(&mut arena, Vec::new(), src.len() as u32 - 1);

    let (ast, root) = convert(&arena, unit, src);
    let table = ast.unit_comments(root).unwrap();
    assert_eq!(table.len(), 1);
    let tags = ast.children(table[0], StructuralProperty::Tags).unwrap();
    assert_eq!(tags.len(), 2);

    let fragments = ast
        .children(tags[0], StructuralProperty::Fragments)
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(ast.kind(fragments[0]).unwrap(), NodeKind::MemberRef);
    let qualifier = ast
        .optional_child(fragments[0], StructuralProperty::Qualifier)
        .unwrap()
        .expect("qualified member reference");
    assert_eq!(identifier(&ast, qualifier), "Widget");
    let member = ast.child(fragments[0], StructuralProperty::Name).unwrap();
    assert_eq!(identifier(&ast, member), "size");

    let fragments = ast
        .children(tags[1], StructuralProperty::Fragments)
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(ast.kind(fragments[0]).unwrap(), NodeKind::FunctionRef);
    let qualifier = ast
        .optional_child(fragments[0], StructuralProperty::Qualifier)
        .unwrap()
        .expect("qualified function reference");
    assert_eq!(ast.kind(qualifier).unwrap(), NodeKind::QualifiedName);
    let selector = ast.child(fragments[0], StructuralProperty::Name).unwrap();
    assert_eq!(identifier(&ast, selector), "resize");
    let parameters = ast
        .children(fragments[0], StructuralProperty::Parameters)
        .unwrap();
    assert_eq!(parameters.len(), 2);
    let first_type = ast
        .optional_child(parameters[0], StructuralProperty::ParamType)
        .unwrap()
        .expect("typed parameter");
    assert_eq!(ast.kind(first_type).unwrap(), NodeKind::SimpleType);
    let first_name = ast
        .optional_child(parameters[0], StructuralProperty::Name)
        .unwrap()
        .expect("named parameter");
    assert_eq!(identifier(&ast, first_name), "width");
    let second_name = ast
        .optional_child(parameters[1], StructuralProperty::Name)
        .unwrap()
        .expect("named parameter");
    assert_eq!(identifier(&ast, second_name), "h");
}

#[test]
fn line_and_block_comments_fill_the_table() {
    let src = "x; // note\n/* b */";
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 0, 0);
    let unit = unit_of(&mut arena, vec![x], 17);

    let (ast, root) = convert(&arena, unit, src);
    let table = ast.unit_comments(root).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(ast.kind(table[0]).unwrap(), NodeKind::LineComment);
    assert_eq!(ast.kind(table[1]).unwrap(), NodeKind::BlockComment);
    assert_eq!(
        ast.source_range(table[0]).unwrap(),
        SourceRange::from_inclusive(3, 9)
    );
}

#[test]
fn cancellation_stops_the_walk() {
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 0, 0);
    let unit = unit_of(&mut arena, vec![x], 1);
    let token = CancelToken::new();
    token.cancel();

    let result = convert_unit(
        &arena,
        unit,
        "x;",
        TreeOptions::default(),
        Some(token),
        None,
    );
    assert!(matches!(result, Err(ConvertError::Cancelled)));
}

#[test]
fn statement_recovery_substitutes_placeholders() {
    let src = "@#$;";
    let mut arena = SemArena::new();
    // An argument node is neither statement nor expression; statement
    // position degrades it.
    let stray = arena.add(
        0,
        2,
        SemData::Argument {
            name: "x".to_string(),
            type_ref: None,
            binding: None,
        },
    );
    let unit = unit_of(&mut arena, vec![stray], 3);

    let options = TreeOptions {
        statements_recovery: true,
        ..TreeOptions::default()
    };
    let (ast, root) = convert_unit(&arena, unit, src, options, None, None).unwrap();
    let stmt = statements(&ast, root)[0];
    assert_eq!(ast.kind(stmt).unwrap(), NodeKind::EmptyStatement);
    let flags = ast.flags(stmt).unwrap();
    assert!(flags.contains(NodeFlags::MALFORMED));
    assert!(flags.contains(NodeFlags::RECOVERED));
}

#[test]
fn internal_recovery_bits_carry_over() {
    let src = "x;";
    let mut arena = SemArena::new();
    let x = arena.add_with_bits(
        0,
        0,
        sem_bits::IS_RECOVERED,
        SemData::SingleNameReference {
            name: "x".to_string(),
            binding: None,
        },
    );
    let unit = unit_of(&mut arena, vec![x], 1);

    let (ast, root) = convert(&arena, unit, src);
    let expr = expression(&ast, statements(&ast, root)[0]);
    let flags = ast.flags(expr).unwrap();
    assert!(flags.contains(NodeFlags::RECOVERED));
    assert!(flags.contains(NodeFlags::ORIGINAL));
}

#[test]
fn imports_convert_to_qualified_names() {
    let src = "import util.List;";
    let mut arena = SemArena::new();
    let import = arena.add(
        0,
        16,
        SemData::ImportReference {
            tokens: vec!["util".to_string(), "List".to_string()],
            on_demand: false,
        },
    );
    let unit = arena.add(
        0,
        16,
        SemData::Unit {
            package: None,
            imports: vec![import],
            statements: Vec::new(),
        },
    );

    let (ast, root) = convert(&arena, unit, src);
    let imports = ast.children(root, StructuralProperty::Imports).unwrap();
    assert_eq!(imports.len(), 1);
    assert_eq!(
        ast.value(imports[0], SimpleProperty::OnDemand).unwrap(),
        SimpleValue::Bool(false)
    );
    let name = ast.child(imports[0], StructuralProperty::Name).unwrap();
    assert_eq!(ast.kind(name).unwrap(), NodeKind::QualifiedName);
    assert_eq!(
        ast.source_range(name).unwrap(),
        SourceRange::from_inclusive(7, 15)
    );
    let simple = ast.child(name, StructuralProperty::Name).unwrap();
    assert_eq!(identifier(&ast, simple), "List");
}

#[test]
fn converted_references_resolve_through_the_resolver() {
    let src = "total;";
    let mut arena = SemArena::new();
    let total = arena.add(
        0,
        4,
        SemData::SingleNameReference {
            name: "total".to_string(),
            binding: None,
        },
    );
    let binding = arena.add_binding(SemBinding::variable("total", total, false));
    match &mut arena.node_mut(total).data {
        SemData::SingleNameReference { binding: slot, .. } => *slot = Some(binding),
        _ => unreachable!(),
    }
    let unit = unit_of(&mut arena, vec![total], 5);

    let mut resolver = BindingResolver::new(&arena, false);
    let (ast, root) = convert_unit(
        &arena,
        unit,
        src,
        TreeOptions::default(),
        None,
        Some(&mut resolver),
    )
    .unwrap();
    let name = expression(&ast, statements(&ast, root)[0]);
    assert_eq!(resolver.corresponding_sem(name), Some(total));
    let resolved = resolver.resolve_name(name).expect("name resolves");
    assert_eq!(resolved.name(), "total");
}

#[test]
fn this_fixups_resolve_after_the_flush() {
    let src = "class C { f = this; }";
    let mut arena = SemArena::new();
    let this_ref = arena.add(14, 17, SemData::ThisReference);
    let field = arena.add(
        10,
        17,
        SemData::FieldDeclaration {
            name: "f".to_string(),
            name_start: 10,
            name_end: 10,
            declaration_source_start: 10,
            initializer: Some(this_ref),
            binding: None,
            doc_anchor: None,
        },
    );
    let class = arena.add(
        0,
        20,
        SemData::TypeDeclaration {
            name: "C".to_string(),
            name_start: 6,
            name_end: 6,
            superclass: None,
            fields: vec![field],
            methods: Vec::new(),
            binding: None,
            doc_anchor: None,
        },
    );
    let class_binding = arena.add_binding(SemBinding::type_of("C", class));
    arena.set_scope(field, ScopeInfo::new().with_this(class_binding));
    let unit = unit_of(&mut arena, vec![class], 20);

    let mut resolver = BindingResolver::new(&arena, false);
    let (ast, root) = convert_unit(
        &arena,
        unit,
        src,
        TreeOptions::default(),
        None,
        Some(&mut resolver),
    )
    .unwrap();

    let wrapper = statements(&ast, root)[0];
    assert_eq!(
        ast.kind(wrapper).unwrap(),
        NodeKind::TypeDeclarationStatement
    );
    let declaration = ast.child(wrapper, StructuralProperty::Declaration).unwrap();
    let members = ast
        .children(declaration, StructuralProperty::BodyDeclarations)
        .unwrap();
    let fragments = ast
        .children(members[0], StructuralProperty::Fragments)
        .unwrap();
    let this_node = ast
        .optional_child(fragments[0], StructuralProperty::Initializer)
        .unwrap()
        .expect("field initializer");
    assert_eq!(ast.kind(this_node).unwrap(), NodeKind::ThisExpression);
    let resolved = resolver
        .resolve_expression(this_node)
        .expect("this resolves through the scope fixup");
    assert_eq!(resolved.name(), "C");
}

#[test]
fn converted_trees_clone_and_match() {
    let src = "x && y && z;";
    let mut arena = SemArena::new();
    let x = name_ref(&mut arena, "x", 0, 0);
    let y = name_ref(&mut arena, "y", 5, 5);
    let z = name_ref(&mut arena, "z", 10, 10);
    let inner = arena.add(0, 5, SemData::AndAndExpression { left: x, right: y });
    let outer = arena.add(
        0,
        10,
        SemData::AndAndExpression {
            left: inner,
            right: z,
        },
    );
    let unit = unit_of(&mut arena, vec![outer], 11);

    let (ast, root) = convert(&arena, unit, src);
    let target = Ast::new(TreeOptions::default());
    let clone = ast.deep_clone(root, &target).unwrap();
    let matcher = DefaultMatcher::new();
    assert!(matcher.subtree_match(NodeRef::new(&ast, root), NodeRef::new(&target, clone)));
}
