//! Tests for the block entity editor
//!
//! These tests verify:
//! - Entity list lookup across historical key names
//! - Position matching across integer widths and floats
//! - Create/update semantics of upsert
//! - Order-preserving delete
//! - Atomic override merging

use anvil_edit::editor::{self, CANONICAL_LIST_KEY};
use anvil_edit::nbt::{Compound, Value};
use anvil_edit::RegionError;

// =============================================================================
// Helper Functions
// =============================================================================

fn entity(x: Value, y: Value, z: Value, id: &str) -> Value {
    let mut c = Compound::new();
    c.insert("x".to_string(), x);
    c.insert("y".to_string(), y);
    c.insert("z".to_string(), z);
    c.insert("id".to_string(), Value::from(id));
    Value::Compound(c)
}

fn chunk_with(key: &str, entities: Vec<Value>) -> Compound {
    let mut chunk = Compound::new();
    chunk.insert(key.to_string(), Value::List(entities));
    chunk
}

fn list_len(chunk: &Compound, key: &str) -> usize {
    chunk[key].as_list().map(Vec::len).unwrap_or(0)
}

fn overrides(pairs: &[(&str, Value)]) -> Compound {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// =============================================================================
// Find Tests
// =============================================================================

#[test]
fn test_find_matches_int_fields() {
    let chunk = chunk_with(
        "block_entities",
        vec![entity(Value::Int(1), Value::Int(64), Value::Int(-3), "minecraft:chest")],
    );

    let found = editor::find(&chunk, 1, 64, -3).unwrap();
    assert_eq!(found["id"].as_str(), Some("minecraft:chest"));
}

#[test]
fn test_find_normalizes_widths_and_floats() {
    let chunk = chunk_with(
        "block_entities",
        vec![entity(Value::Byte(1), Value::Long(64), Value::Double(-3.0), "minecraft:barrel")],
    );

    assert!(editor::find(&chunk, 1, 64, -3).is_some());
}

#[test]
fn test_find_rejects_fractional_float() {
    let chunk = chunk_with(
        "block_entities",
        vec![entity(Value::Double(1.5), Value::Int(64), Value::Int(-3), "minecraft:chest")],
    );

    assert!(editor::find(&chunk, 1, 64, -3).is_none());
}

#[test]
fn test_find_requires_all_fields() {
    let mut partial = Compound::new();
    partial.insert("x".to_string(), Value::Int(1));
    partial.insert("y".to_string(), Value::Int(64));
    let chunk = chunk_with("block_entities", vec![Value::Compound(partial)]);

    assert!(editor::find(&chunk, 1, 64, 0).is_none());
}

#[test]
fn test_find_uses_legacy_keys() {
    let chunk = chunk_with(
        "TileEntities",
        vec![entity(Value::Int(5), Value::Int(70), Value::Int(9), "Sign")],
    );

    assert!(editor::find(&chunk, 5, 70, 9).is_some());
}

#[test]
fn test_find_key_priority() {
    let mut chunk = chunk_with(
        "BlockEntities",
        vec![entity(Value::Int(0), Value::Int(0), Value::Int(0), "old")],
    );
    chunk.insert(
        "block_entities".to_string(),
        Value::List(vec![entity(Value::Int(0), Value::Int(0), Value::Int(0), "new")]),
    );

    let found = editor::find(&chunk, 0, 0, 0).unwrap();
    assert_eq!(found["id"].as_str(), Some("new"));
}

#[test]
fn test_find_without_list() {
    let chunk = Compound::new();
    assert!(editor::find(&chunk, 0, 0, 0).is_none());
}

#[test]
fn test_find_skips_non_compound_items() {
    let chunk = chunk_with(
        "block_entities",
        vec![
            Value::Int(7),
            entity(Value::Int(2), Value::Int(3), Value::Int(4), "minecraft:hopper"),
        ],
    );

    assert!(editor::find(&chunk, 2, 3, 4).is_some());
}

// =============================================================================
// Upsert Tests
// =============================================================================

#[test]
fn test_upsert_creates_list_and_entry() {
    let mut chunk = Compound::new();

    editor::upsert(
        &mut chunk,
        3,
        60,
        -2,
        "minecraft:lectern",
        &overrides(&[("Book", Value::from("foo"))]),
    );

    assert_eq!(list_len(&chunk, CANONICAL_LIST_KEY), 1);
    let ent = editor::find(&chunk, 3, 60, -2).unwrap();
    assert_eq!(ent["x"], Value::Int(3));
    assert_eq!(ent["y"], Value::Int(60));
    assert_eq!(ent["z"], Value::Int(-2));
    assert_eq!(ent["id"].as_str(), Some("minecraft:lectern"));
    assert_eq!(ent["Book"].as_str(), Some("foo"));
}

#[test]
fn test_upsert_without_id_omits_field() {
    let mut chunk = Compound::new();

    editor::upsert(&mut chunk, 0, 0, 0, "", &Compound::new());

    let ent = editor::find(&chunk, 0, 0, 0).unwrap();
    assert!(!ent.contains_key("id"));
    assert_eq!(ent.len(), 3);
}

#[test]
fn test_upsert_updates_in_place() {
    let mut chunk = Compound::new();
    editor::upsert(
        &mut chunk,
        3,
        60,
        -2,
        "minecraft:lectern",
        &overrides(&[("Book", Value::from("foo")), ("Page", Value::Int(1))]),
    );

    editor::upsert(
        &mut chunk,
        3,
        60,
        -2,
        "",
        &overrides(&[("Book", Value::from("bar"))]),
    );

    assert_eq!(list_len(&chunk, CANONICAL_LIST_KEY), 1);
    let ent = editor::find(&chunk, 3, 60, -2).unwrap();
    assert_eq!(ent["Book"].as_str(), Some("bar"));
    assert_eq!(ent["Page"], Value::Int(1));
    assert_eq!(ent["id"].as_str(), Some("minecraft:lectern"));
}

#[test]
fn test_upsert_replaces_id_when_given() {
    let mut chunk = chunk_with(
        "block_entities",
        vec![entity(Value::Int(1), Value::Int(2), Value::Int(3), "minecraft:chest")],
    );

    editor::upsert(&mut chunk, 1, 2, 3, "minecraft:trapped_chest", &Compound::new());

    let ent = editor::find(&chunk, 1, 2, 3).unwrap();
    assert_eq!(ent["id"].as_str(), Some("minecraft:trapped_chest"));
}

#[test]
fn test_upsert_appends_to_existing_legacy_list() {
    let mut chunk = chunk_with(
        "TileEntities",
        vec![entity(Value::Int(1), Value::Int(2), Value::Int(3), "Chest")],
    );

    editor::upsert(&mut chunk, 4, 5, 6, "Furnace", &Compound::new());

    assert_eq!(list_len(&chunk, "TileEntities"), 2);
    assert!(!chunk.contains_key(CANONICAL_LIST_KEY));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_single_entry_in_order() {
    let mut chunk = chunk_with(
        "BlockEntities",
        vec![
            entity(Value::Int(1), Value::Int(1), Value::Int(1), "a"),
            entity(Value::Int(5), Value::Int(70), Value::Int(9), "b"),
            entity(Value::Int(2), Value::Int(2), Value::Int(2), "c"),
        ],
    );

    assert!(editor::delete(&mut chunk, 5, 70, 9));

    let ids: Vec<_> = chunk["BlockEntities"]
        .as_list()
        .unwrap()
        .iter()
        .map(|v| v.as_compound().unwrap()["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn test_delete_missing_leaves_chunk_unchanged() {
    let mut chunk = chunk_with(
        "BlockEntities",
        vec![entity(Value::Int(5), Value::Int(70), Value::Int(9), "b")],
    );
    let before = chunk.clone();

    assert!(!editor::delete(&mut chunk, 5, 70, 10));
    assert_eq!(chunk, before);
}

#[test]
fn test_delete_twice() {
    let mut chunk = chunk_with(
        "BlockEntities",
        vec![entity(Value::Int(5), Value::Int(70), Value::Int(9), "b")],
    );

    assert!(editor::delete(&mut chunk, 5, 70, 9));
    assert_eq!(list_len(&chunk, "BlockEntities"), 0);
    assert!(!editor::delete(&mut chunk, 5, 70, 9));
}

#[test]
fn test_delete_without_list() {
    let mut chunk = Compound::new();
    assert!(!editor::delete(&mut chunk, 0, 0, 0));
    assert!(chunk.is_empty());
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_adds_and_overwrites() {
    let mut dst = overrides(&[("foo", Value::from("bar")), ("keep", Value::Int(1))]);

    editor::merge_overrides(&mut dst, r#"{"baz": 1, "foo": "qux"}"#).unwrap();

    assert_eq!(dst["baz"], Value::Int(1));
    assert_eq!(dst["foo"].as_str(), Some("qux"));
    assert_eq!(dst["keep"], Value::Int(1));
}

#[test]
fn test_merge_empty_is_noop() {
    let mut dst = overrides(&[("foo", Value::from("bar"))]);
    let before = dst.clone();

    editor::merge_overrides(&mut dst, "").unwrap();

    assert_eq!(dst, before);
}

#[test]
fn test_merge_malformed_leaves_destination_unchanged() {
    let mut dst = overrides(&[("foo", Value::from("bar"))]);
    let before = dst.clone();

    let result = editor::merge_overrides(&mut dst, "not-json");

    assert!(matches!(result, Err(RegionError::Parse(_))));
    assert_eq!(dst, before);
}

#[test]
fn test_merge_partial_failure_applies_nothing() {
    let mut dst = Compound::new();

    let result = editor::merge_overrides(&mut dst, r#"{"a": 1, "b": null}"#);

    assert!(result.is_err());
    assert!(dst.is_empty());
}
