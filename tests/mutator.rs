//! Tests for field edits on the shared operator tree.
mod common;
use common::*;
use flockflow::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

#[test]
fn test_edit_sets_param_on_matching_node() {
    let tree = create_chain_tree();
    let edited = apply_field_edit(&tree, 1, "model_name", json!("gpt-4o"), ValueKind::Raw);

    let node = edited.find(1).unwrap();
    assert_eq!(node.params["model_name"], json!("gpt-4o"));
    assert_eq!(node.params["prompt"], json!("p"));
    // The input snapshot is untouched.
    assert!(tree.find(1).unwrap().params.get("model_name").is_none());
}

#[test]
fn test_edit_rebuilds_only_the_path() {
    let tree = create_wide_tree();
    let edited = apply_field_edit(&tree, 12, "prompt", json!("Shorter"), ValueKind::Raw);

    assert!(!Arc::ptr_eq(&tree, &edited));
    // Siblings off the path are shared.
    assert!(Arc::ptr_eq(&tree.children[0], &edited.children[0]));
    assert!(Arc::ptr_eq(&tree.children[2], &edited.children[2]));
    // The edited node is new, but its own subtree is shared.
    assert!(!Arc::ptr_eq(&tree.children[1], &edited.children[1]));
    assert!(Arc::ptr_eq(
        &tree.children[1].children[0],
        &edited.children[1].children[0]
    ));
}

#[test]
fn test_edit_deep_leaf_copies_ancestors() {
    let tree = create_wide_tree();
    let edited = apply_field_edit(&tree, 14, "note", json!("x"), ValueKind::Raw);

    assert!(!Arc::ptr_eq(&tree.children[1], &edited.children[1]));
    assert!(Arc::ptr_eq(&tree.children[0], &edited.children[0]));
    assert_eq!(edited.find(14).unwrap().params["note"], json!("x"));
    assert!(edited.find(12).unwrap().params.get("note").is_none());
}

#[test]
fn test_edit_unknown_id_returns_same_tree() {
    let tree = create_wide_tree();
    let edited = apply_field_edit(&tree, 999, "prompt", json!("x"), ValueKind::Raw);
    assert!(Arc::ptr_eq(&tree, &edited));
    assert_eq!(*tree, *edited);
}

#[test]
fn test_edit_first_preorder_duplicate_wins() {
    let tree = Operator::from_json(
        r#"{"id":0,"name":"Root","children":[
            {"id":1,"name":"A","children":[{"id":7,"name":"Deep","children":[]}]},
            {"id":7,"name":"Shallow","children":[]}
        ]}"#,
    )
    .unwrap();
    let edited = apply_field_edit(&tree, 7, "k", json!(1), ValueKind::Raw);
    assert_eq!(edited.children[0].children[0].params["k"], json!(1));
    assert!(edited.children[1].params.get("k").is_none());
    assert!(Arc::ptr_eq(&tree.children[1], &edited.children[1]));
}

#[test]
fn test_edit_then_layout_keeps_positions() {
    let tree = create_chain_tree();
    let engine = LayoutEngine::builder(LayoutConfig::default()).build();
    let before = engine.layout(&tree);

    let edited = apply_field_edit(&tree, 1, "model_name", json!("gpt-4o"), ValueKind::Raw);
    let after = engine.layout(&edited);

    for id in ["0", "2"] {
        assert_eq!(before.node(id), after.node(id));
    }
    assert_eq!(
        before.node("1").unwrap().position,
        after.node("1").unwrap().position
    );
    match &after.node("1").unwrap().data {
        NodePresentation::FunctionEditor(editor) => assert_eq!(editor.model_name, "gpt-4o"),
        other => panic!("unexpected presentation {other:?}"),
    }
    match &before.node("1").unwrap().data {
        NodePresentation::FunctionEditor(editor) => assert_eq!(editor.model_name, ""),
        other => panic!("unexpected presentation {other:?}"),
    }
}

#[test]
fn test_number_coercion() {
    let cases = [
        (json!("16"), json!(16)),
        (json!(" 2.5 "), json!(2.5)),
        (json!(8), json!(8)),
        (json!(true), json!(1)),
        (json!(""), Value::Null),
        (json!("lots"), Value::Null),
        (Value::Null, Value::Null),
        (json!([1]), Value::Null),
    ];
    for (raw, expected) in cases {
        assert_eq!(ValueKind::Number.coerce(raw.clone()), expected, "{raw}");
    }
}

#[test]
fn test_number_edit_unset_batch_size_shows_auto() {
    let tree = create_wide_tree();
    let edited = apply_field_edit(&tree, 12, "batch_size", json!(""), ValueKind::Number);
    let op = edited.find(12).unwrap();
    assert_eq!(op.params["batch_size"], Value::Null);
    assert_eq!(op.function_params().batch_size, None);
}

#[test]
fn test_raw_edit_keeps_strings() {
    let tree = create_wide_tree();
    let edited = apply_field_edit(&tree, 12, "tuple_format", json!("Markdown"), ValueKind::Raw);
    assert_eq!(
        edited.find(12).unwrap().function_params().tuple_format,
        TupleFormat::Markdown
    );
}
