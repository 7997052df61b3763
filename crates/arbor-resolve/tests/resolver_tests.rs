//! Facade identity, binding keys, the recovery ladder, and scope fixups.

use arbor_dom::{Ast, NodeKind, TreeOptions};
use arbor_resolve::{BindingKind, BindingResolver, FixupTarget};
use arbor_sem::{
    ProblemReason, ScopeInfo, SemArena, SemBinding, SemData, SemId,
};

fn dom_name(ast: &Ast) -> arbor_dom::NodeId {
    ast.new_node(NodeKind::SimpleName).unwrap()
}

#[test]
fn two_references_share_one_facade() {
    let mut arena = SemArena::new();
    let var = arena.add_binding(SemBinding::variable("count", SemId::NONE, false));
    let ref1 = arena.add(
        0,
        4,
        SemData::SingleNameReference {
            name: "count".to_string(),
            binding: Some(var),
        },
    );
    let ref2 = arena.add(
        10,
        14,
        SemData::SingleNameReference {
            name: "count".to_string(),
            binding: Some(var),
        },
    );

    let ast = Ast::new(TreeOptions::default());
    let (n1, n2) = (dom_name(&ast), dom_name(&ast));
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(n1, ref1);
    resolver.record_node(n2, ref2);

    let b1 = resolver.resolve_name(n1).unwrap();
    let b2 = resolver.resolve_name(n2).unwrap();
    assert!(b1.is_equal_to(&b2));
    assert_eq!(b1.key(), b2.key());
    assert_eq!(b1.kind(), BindingKind::Variable);
    assert!(!b1.is_recovered());
}

#[test]
fn keys_reflect_the_container_chain() {
    let mut arena = SemArena::new();
    let pkg = arena.add_binding(SemBinding::package("util"));
    let ty = arena.add_binding(SemBinding::type_of("List", SemId::NONE).with_container(pkg));
    let method = arena.add_binding(
        SemBinding::function("push", SemId::NONE, vec!["Object".to_string()]).with_container(ty),
    );
    let field =
        arena.add_binding(SemBinding::variable("length", SemId::NONE, true).with_container(ty));
    let reference = arena.add(
        0,
        3,
        SemData::SingleNameReference {
            name: "push".to_string(),
            binding: Some(method),
        },
    );
    let field_ref = arena.add(
        5,
        10,
        SemData::SingleNameReference {
            name: "length".to_string(),
            binding: Some(field),
        },
    );

    let ast = Ast::new(TreeOptions::default());
    let (n1, n2) = (dom_name(&ast), dom_name(&ast));
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(n1, reference);
    resolver.record_node(n2, field_ref);

    assert_eq!(resolver.resolve_name(n1).unwrap().key(), "util/List#push(1)");
    assert_eq!(resolver.resolve_name(n2).unwrap().key(), "util/List#length");
}

#[test]
fn problem_binding_falls_back_to_closest_match() {
    let mut arena = SemArena::new();
    let actual = arena.add_binding(SemBinding::variable("counter", SemId::NONE, false));
    let misspelled = arena.add_binding(
        SemBinding::variable("countr", SemId::NONE, false)
            .with_problem(ProblemReason::NotFound, Some(actual)),
    );
    let reference = arena.add(
        0,
        5,
        SemData::SingleNameReference {
            name: "countr".to_string(),
            binding: Some(misspelled),
        },
    );

    let ast = Ast::new(TreeOptions::default());
    let n = dom_name(&ast);
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(n, reference);

    let b = resolver.resolve_name(n).unwrap();
    assert_eq!(b.name(), "counter");
    assert!(!b.is_recovered());
}

#[test]
fn recovery_ladder_switches_on_the_option() {
    let mut arena = SemArena::new();
    let reference = arena.add(
        0,
        6,
        SemData::SingleNameReference {
            name: "mystery".to_string(),
            binding: None,
        },
    );
    let ast = Ast::new(TreeOptions::default());
    let n = dom_name(&ast);

    let mut strict = BindingResolver::new(&arena, false);
    strict.record_node(n, reference);
    assert!(strict.resolve_name(n).is_none());

    let mut recovering = BindingResolver::new(&arena, true);
    recovering.record_node(n, reference);
    let b = recovering.resolve_name(n).unwrap();
    assert!(b.is_recovered());
    assert_eq!(b.name(), "mystery");
    assert!(b.key().starts_with("Recovered#mystery#"));

    // Same name, same recovered facade.
    let b2 = recovering.resolve_name(n).unwrap();
    assert!(b.is_equal_to(&b2));
}

#[test]
fn find_binding_and_declaring_node_by_key() {
    let mut arena = SemArena::new();
    let decl = arena.add(
        0,
        20,
        SemData::LocalDeclaration {
            name: "total".to_string(),
            name_start: 4,
            name_end: 8,
            declaration_source_start: 0,
            type_ref: None,
            initializer: None,
            binding: None,
            doc_anchor: None,
        },
    );
    let var = arena.add_binding(SemBinding::variable("total", decl, false));
    // Re-point the declaration at its binding.
    let reference = arena.add(
        30,
        34,
        SemData::SingleNameReference {
            name: "total".to_string(),
            binding: Some(var),
        },
    );

    let ast = Ast::new(TreeOptions::default());
    let fragment = ast.new_node(NodeKind::VariableDeclarationFragment).unwrap();
    let use_site = dom_name(&ast);
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(fragment, decl);
    resolver.record_node(use_site, reference);

    let b = resolver.resolve_name(use_site).unwrap();
    let key = b.key().to_string();
    assert_eq!(key, "#total");
    let found = resolver.find_binding(&key).unwrap();
    assert!(found.is_equal_to(&b));
    assert_eq!(resolver.find_declaring_node(&key), Some(fragment));
}

#[test]
fn typed_resolution_filters_by_kind() {
    let mut arena = SemArena::new();
    let var = arena.add_binding(SemBinding::variable("x", SemId::NONE, false));
    let reference = arena.add(
        0,
        0,
        SemData::SingleNameReference {
            name: "x".to_string(),
            binding: Some(var),
        },
    );
    let ast = Ast::new(TreeOptions::default());
    let n = dom_name(&ast);
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(n, reference);

    assert!(resolver.resolve_variable(n).is_some());
    assert!(resolver.resolve_type(n).is_none());
    assert!(resolver.resolve_function(n).is_none());
}

#[test]
fn superclass_walks_through_the_resolver() {
    let mut arena = SemArena::new();
    let base = arena.add_binding(SemBinding::type_of("Base", SemId::NONE));
    let derived = arena.add_binding(SemBinding {
        kind: arbor_sem::SemBindingKind::Type {
            superclass: Some(base),
        },
        name: "Derived".to_string(),
        declaring: SemId::NONE,
        container: None,
        problem: None,
    });
    let reference = arena.add(
        0,
        6,
        SemData::SingleTypeReference {
            name: "Derived".to_string(),
            binding: Some(derived),
        },
    );

    let ast = Ast::new(TreeOptions::default());
    let n = ast.new_node(NodeKind::SimpleType).unwrap();
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.record_node(n, reference);

    let b = resolver.resolve_type(n).unwrap();
    let superclass = resolver.superclass_of(&b).unwrap();
    assert_eq!(superclass.name(), "Base");
    assert_eq!(superclass.kind(), BindingKind::Type);
}

#[test]
fn scope_fixups_resolve_this_and_locals_after_flush() {
    let mut arena = SemArena::new();
    let owner = arena.add_binding(SemBinding::type_of("Widget", SemId::NONE));
    let field = arena.add_binding(SemBinding::variable("size", SemId::NONE, true));
    let decl = arena.add(
        0,
        40,
        SemData::FieldDeclaration {
            name: "size".to_string(),
            name_start: 0,
            name_end: 4,
            declaration_source_start: 0,
            initializer: None,
            binding: Some(field),
            doc_anchor: None,
        },
    );
    arena.set_scope(
        decl,
        ScopeInfo::new().with_this(owner).with_local("size", field),
    );

    let ast = Ast::new(TreeOptions::default());
    let this_node = ast.new_node(NodeKind::ThisExpression).unwrap();
    let name_node = dom_name(&ast);
    let mut resolver = BindingResolver::new(&arena, false);
    resolver.defer_scope_fixup(this_node, decl, FixupTarget::This);
    resolver.defer_scope_fixup(name_node, decl, FixupTarget::Name("size".to_string()));

    // Nothing resolves before the flush.
    assert!(resolver.resolve_expression(this_node).is_none());
    resolver.flush_scope_fixups();

    let this_binding = resolver.resolve_expression(this_node).unwrap();
    assert_eq!(this_binding.name(), "Widget");
    assert_eq!(this_binding.kind(), BindingKind::Type);
    let size = resolver.resolve_name(name_node).unwrap();
    assert_eq!(size.name(), "size");
    assert!(size.is_field());
}
