//! Owning-tree invariants: ownership, acyclicity, required children, the
//! modification counter, and the event protocol.

use arbor_common::SourceRange;
use arbor_dom::{
    ApiLevel, Ast, AstEvent, NodeFlags, NodeKind, RecordingSink, SimpleProperty, SimpleValue,
    StructuralProperty, TreeError, TreeOptions,
};

fn name(ast: &Ast, identifier: &str) -> arbor_dom::NodeId {
    let id = ast.new_node(NodeKind::SimpleName).unwrap();
    ast.set_value(
        id,
        SimpleProperty::Identifier,
        SimpleValue::Str(identifier.to_string()),
    )
    .unwrap();
    id
}

#[test]
fn nodes_are_owned_by_their_tree() {
    let a = Ast::new(TreeOptions::default());
    let b = Ast::new(TreeOptions::default());
    let stmt = a.new_node(NodeKind::ExpressionStatement).unwrap();
    let foreign = name(&b, "x");
    assert_eq!(
        a.set_child(stmt, StructuralProperty::Expression, Some(foreign)),
        Err(TreeError::WrongOwner)
    );
}

#[test]
fn parented_child_cannot_be_attached_twice() {
    let ast = Ast::new(TreeOptions::default());
    let x = name(&ast, "x");
    let s1 = ast.new_node(NodeKind::ExpressionStatement).unwrap();
    let s2 = ast.new_node(NodeKind::ExpressionStatement).unwrap();
    ast.set_child(s1, StructuralProperty::Expression, Some(x))
        .unwrap();
    assert_eq!(
        ast.set_child(s2, StructuralProperty::Expression, Some(x)),
        Err(TreeError::AlreadyParented)
    );
    assert_eq!(ast.parent(x).unwrap(), Some((s1, StructuralProperty::Expression)));
}

#[test]
fn cycles_are_rejected() {
    let ast = Ast::new(TreeOptions::default());
    let outer = ast.new_node(NodeKind::Block).unwrap();
    let inner = ast.new_node(NodeKind::Block).unwrap();
    ast.list_push(outer, StructuralProperty::Statements, inner)
        .unwrap();
    assert_eq!(
        ast.list_push(inner, StructuralProperty::Statements, outer),
        Err(TreeError::Cycle)
    );
    let block = ast.new_node(NodeKind::Block).unwrap();
    assert_eq!(
        ast.list_push(block, StructuralProperty::Statements, block),
        Err(TreeError::Cycle)
    );
}

#[test]
fn required_child_materializes_invisibly() {
    let ast = Ast::new(TreeOptions::default());
    let sink = RecordingSink::new();
    ast.set_event_sink(Box::new(sink.clone()));
    let stmt = ast.new_node(NodeKind::IfStatement).unwrap();
    let before = ast.modification_count();

    let cond = ast.child(stmt, StructuralProperty::Expression).unwrap();
    assert_eq!(ast.kind(cond).unwrap(), NodeKind::SimpleName);
    assert_eq!(
        ast.value(cond, SimpleProperty::Identifier).unwrap(),
        SimpleValue::Str("MISSING".to_string())
    );
    // Stable on re-read.
    assert_eq!(ast.child(stmt, StructuralProperty::Expression).unwrap(), cond);
    assert_eq!(ast.modification_count(), before);
    assert!(sink.is_empty());
}

#[test]
fn then_branch_materializes_as_block() {
    let ast = Ast::new(TreeOptions::default());
    let stmt = ast.new_node(NodeKind::IfStatement).unwrap();
    let then = ast.child(stmt, StructuralProperty::ThenStatement).unwrap();
    assert_eq!(ast.kind(then).unwrap(), NodeKind::Block);
}

#[test]
fn counter_advances_once_per_mutation() {
    let ast = Ast::new(TreeOptions::default());
    let c0 = ast.modification_count();
    let x = ast.new_node(NodeKind::SimpleName).unwrap();
    // Creation alone is not a mutation of tree structure.
    assert_eq!(ast.modification_count(), c0);
    ast.set_value(
        x,
        SimpleProperty::Identifier,
        SimpleValue::Str("x".to_string()),
    )
    .unwrap();
    let c1 = ast.modification_count();
    assert!(c1 > c0);
    let stmt = ast.new_node(NodeKind::ExpressionStatement).unwrap();
    ast.set_child(stmt, StructuralProperty::Expression, Some(x))
        .unwrap();
    assert!(ast.modification_count() > c1);
}

#[test]
fn failed_mutations_leave_counter_and_tree_alone() {
    let ast = Ast::new(TreeOptions::default());
    let stmt = ast.new_node(NodeKind::ThrowStatement).unwrap();
    let x = name(&ast, "x");
    ast.set_child(stmt, StructuralProperty::Expression, Some(x))
        .unwrap();
    let before = ast.modification_count();
    // Clearing a required slot fails.
    assert!(matches!(
        ast.set_child(stmt, StructuralProperty::Expression, None),
        Err(TreeError::RequiredChild { .. })
    ));
    assert_eq!(ast.modification_count(), before);
    assert_eq!(ast.child(stmt, StructuralProperty::Expression).unwrap(), x);
}

#[test]
fn events_fire_in_pre_post_pairs() {
    let ast = Ast::new(TreeOptions::default());
    let sink = RecordingSink::new();
    ast.set_event_sink(Box::new(sink.clone()));

    let stmt = ast.new_node(NodeKind::ExpressionStatement).unwrap();
    let x = name(&ast, "x");
    let y = name(&ast, "y");
    ast.set_child(stmt, StructuralProperty::Expression, Some(x))
        .unwrap();
    let displaced = ast
        .set_child(stmt, StructuralProperty::Expression, Some(y))
        .unwrap();
    assert_eq!(displaced, Some(x));

    let events = sink.events();
    // set_value on x, then add, then replace.
    assert!(matches!(events[0], AstEvent::PreValueChange { node, .. } if node == x));
    assert!(matches!(events[1], AstEvent::PostValueChange { node, .. } if node == x));
    assert!(matches!(
        events[4],
        AstEvent::PreAddChild { parent, child, .. } if parent == stmt && child == x
    ));
    assert!(matches!(
        events[5],
        AstEvent::PostAddChild { parent, child, .. } if parent == stmt && child == x
    ));
    assert!(matches!(
        events[6],
        AstEvent::PreReplaceChild { old_child, new_child, .. }
            if old_child == x && new_child == y
    ));
    assert!(matches!(
        events[7],
        AstEvent::PostReplaceChild { old_child, new_child, .. }
            if old_child == x && new_child == y
    ));
}

#[test]
fn disabled_scope_hides_events_and_counter() {
    let ast = Ast::new(TreeOptions::default());
    let sink = RecordingSink::new();
    ast.set_event_sink(Box::new(sink.clone()));
    let before = ast.modification_count();

    ast.with_events_disabled(|| {
        let stmt = ast.new_node(NodeKind::ExpressionStatement).unwrap();
        let x = name(&ast, "hidden");
        ast.set_child(stmt, StructuralProperty::Expression, Some(x))
            .unwrap();
        // Nested scopes are allowed.
        ast.with_events_disabled(|| {
            ast.set_value(
                x,
                SimpleProperty::Identifier,
                SimpleValue::Str("still_hidden".to_string()),
            )
            .unwrap();
        });
    });

    assert_eq!(ast.modification_count(), before);
    assert!(sink.is_empty());

    // Re-enabled after the scope.
    let x = name(&ast, "visible");
    let _ = x;
    assert!(ast.modification_count() > before);
    assert!(!sink.is_empty());
}

#[test]
fn set_value_returns_old_and_checks_type() {
    let ast = Ast::new(TreeOptions::default());
    let lit = ast.new_node(NodeKind::BooleanLiteral).unwrap();
    let old = ast
        .set_value(lit, SimpleProperty::BooleanValue, SimpleValue::Bool(true))
        .unwrap();
    assert_eq!(old, SimpleValue::Bool(false));
    assert!(matches!(
        ast.set_value(
            lit,
            SimpleProperty::BooleanValue,
            SimpleValue::Str("true".to_string())
        ),
        Err(TreeError::NoSuchValue { .. })
    ));
    assert!(matches!(
        ast.value(lit, SimpleProperty::Identifier),
        Err(TreeError::NoSuchValue { .. })
    ));
}

#[test]
fn detach_makes_node_a_root() {
    let ast = Ast::new(TreeOptions::default());
    let block = ast.new_node(NodeKind::Block).unwrap();
    let empty = ast.new_node(NodeKind::EmptyStatement).unwrap();
    ast.list_push(block, StructuralProperty::Statements, empty)
        .unwrap();
    ast.detach(empty).unwrap();
    assert_eq!(ast.parent(empty).unwrap(), None);
    assert!(
        ast.children(block, StructuralProperty::Statements)
            .unwrap()
            .is_empty()
    );
    // Detaching a root is a no-op.
    ast.detach(empty).unwrap();

    // Required children cannot be detached, only replaced.
    let stmt = ast.new_node(NodeKind::ThrowStatement).unwrap();
    let x = name(&ast, "x");
    ast.set_child(stmt, StructuralProperty::Expression, Some(x))
        .unwrap();
    assert!(matches!(ast.detach(x), Err(TreeError::RequiredChild { .. })));
}

#[test]
fn list_edits_validate_bounds() {
    let ast = Ast::new(TreeOptions::default());
    let block = ast.new_node(NodeKind::Block).unwrap();
    let s = ast.new_node(NodeKind::EmptyStatement).unwrap();
    assert_eq!(
        ast.list_insert(block, StructuralProperty::Statements, 1, s),
        Err(TreeError::IndexOutOfBounds { index: 1, len: 0 })
    );
    ast.list_insert(block, StructuralProperty::Statements, 0, s)
        .unwrap();
    assert_eq!(
        ast.list_remove(block, StructuralProperty::Statements, 1),
        Err(TreeError::IndexOutOfBounds { index: 1, len: 1 })
    );
    assert_eq!(
        ast.list_remove(block, StructuralProperty::Statements, 0),
        Ok(s)
    );
}

#[test]
fn legacy_level_rejects_class_shapes() {
    let ast = Ast::new(TreeOptions {
        api_level: ApiLevel::Legacy,
        ..TreeOptions::default()
    });
    assert_eq!(
        ast.new_node(NodeKind::TypeDeclaration),
        Err(TreeError::UnsupportedVariant(NodeKind::TypeDeclaration))
    );
    assert!(ast.new_node(NodeKind::FunctionDeclaration).is_ok());
}

#[test]
fn protected_nodes_reject_mutation() {
    let ast = Ast::new(TreeOptions::default());
    let x = name(&ast, "x");
    ast.add_flags(x, NodeFlags::PROTECTED).unwrap();
    assert_eq!(
        ast.set_value(
            x,
            SimpleProperty::Identifier,
            SimpleValue::Str("y".to_string())
        ),
        Err(TreeError::Protected)
    );
    assert_eq!(
        ast.set_source_range(x, SourceRange::from_inclusive(0, 0)),
        Err(TreeError::Protected)
    );
    assert_eq!(
        ast.add_flags(x, NodeFlags::MALFORMED),
        Err(TreeError::Protected)
    );
    assert_eq!(ast.set_flags(x, NodeFlags::empty()), Err(TreeError::Protected));
}

#[test]
fn deep_clone_crosses_trees() {
    let src = Ast::new(TreeOptions::default());
    let stmt = src.new_node(NodeKind::ExpressionStatement).unwrap();
    let x = name(&src, "x");
    src.set_child(stmt, StructuralProperty::Expression, Some(x))
        .unwrap();
    src.add_flags(stmt, NodeFlags::ORIGINAL).unwrap();

    let dst = Ast::new(TreeOptions::default());
    let sink = RecordingSink::new();
    dst.set_event_sink(Box::new(sink.clone()));
    let src_count = src.modification_count();

    let clone = src.deep_clone(stmt, &dst).unwrap();
    assert_eq!(clone.tree_id(), dst.tree_id());
    assert_eq!(dst.kind(clone).unwrap(), NodeKind::ExpressionStatement);
    assert!(dst.flags(clone).unwrap().contains(NodeFlags::ORIGINAL));
    let cloned_x = dst.child(clone, StructuralProperty::Expression).unwrap();
    assert_eq!(
        dst.value(cloned_x, SimpleProperty::Identifier).unwrap(),
        SimpleValue::Str("x".to_string())
    );
    assert_eq!(dst.parent(cloned_x).unwrap(), Some((clone, StructuralProperty::Expression)));

    // Source untouched; destination saw one clone event pair.
    assert_eq!(src.modification_count(), src_count);
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], AstEvent::PreClone { source } if source == stmt));
    assert!(matches!(events[1], AstEvent::PostClone { clone: c, .. } if c == clone));
}

#[test]
fn deep_clone_within_one_tree() {
    let ast = Ast::new(TreeOptions::default());
    let x = name(&ast, "x");
    let clone = ast.deep_clone(x, &ast).unwrap();
    assert_ne!(clone, x);
    assert_eq!(
        ast.value(clone, SimpleProperty::Identifier).unwrap(),
        SimpleValue::Str("x".to_string())
    );
    assert_eq!(ast.parent(clone).unwrap(), None);
}

#[test]
fn unit_comment_table_is_not_structural() {
    let ast = Ast::new(TreeOptions::default());
    let unit = ast.new_node(NodeKind::ScriptUnit).unwrap();
    let c = ast.new_node(NodeKind::LineComment).unwrap();
    ast.set_unit_comments(unit, vec![c]).unwrap();
    assert_eq!(ast.unit_comments(unit).unwrap(), vec![c]);
    // Comments do not get a structural parent.
    assert_eq!(ast.parent(c).unwrap(), None);
}
