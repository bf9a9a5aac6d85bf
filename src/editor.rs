//! Record Field Editor
//!
//! Finds, creates and removes block entities inside a decoded chunk. A
//! block entity is a compound in the chunk's entity list whose `x`, `y`
//! and `z` fields match a block position.

use crate::error::Result;
use crate::nbt::{self, Compound, Value};

/// List keys used by successive chunk format versions, in lookup order
pub const ENTITY_LIST_KEYS: [&str; 3] = ["block_entities", "BlockEntities", "TileEntities"];

/// Key used when a chunk has no entity list yet
pub const CANONICAL_LIST_KEY: &str = "block_entities";

/// Field holding the block entity type
pub const ID_FIELD: &str = "id";

/// Key of the first entity list present in the chunk
fn list_key(chunk: &Compound) -> Option<&'static str> {
    ENTITY_LIST_KEYS
        .iter()
        .copied()
        .find(|key| matches!(chunk.get(*key), Some(Value::List(_))))
}

fn field_equals(entry: &Compound, field: &str, target: i32) -> bool {
    entry
        .get(field)
        .and_then(Value::as_i64)
        .is_some_and(|v| v == i64::from(target))
}

fn matches_position(value: &Value, x: i32, y: i32, z: i32) -> bool {
    match value {
        Value::Compound(entry) => {
            field_equals(entry, "x", x) && field_equals(entry, "y", y) && field_equals(entry, "z", z)
        }
        _ => false,
    }
}

fn position_of(list: &[Value], x: i32, y: i32, z: i32) -> Option<usize> {
    list.iter().position(|v| matches_position(v, x, y, z))
}

fn entity_list_mut<'a>(chunk: &'a mut Compound, key: &str) -> Option<&'a mut Vec<Value>> {
    match chunk.get_mut(key) {
        Some(Value::List(list)) => Some(list),
        _ => None,
    }
}

/// Find the block entity at `(x, y, z)`
pub fn find(chunk: &Compound, x: i32, y: i32, z: i32) -> Option<&Compound> {
    let key = list_key(chunk)?;
    let list = chunk.get(key)?.as_list()?;
    list.iter()
        .find(|v| matches_position(v, x, y, z))
        .and_then(Value::as_compound)
}

/// Create or update the block entity at `(x, y, z)`
///
/// A new entry is seeded with the position, `id` (when non-empty) and the
/// overrides. An existing entry gets `id` (when non-empty) and the
/// overrides applied on top; fields not named are kept.
pub fn upsert(chunk: &mut Compound, x: i32, y: i32, z: i32, id: &str, overrides: &Compound) {
    let key = list_key(chunk).unwrap_or(CANONICAL_LIST_KEY);

    if let Some(list) = entity_list_mut(chunk, key) {
        if let Some(i) = position_of(list, x, y, z) {
            if let Some(entry) = list[i].as_compound_mut() {
                apply(entry, id, overrides);
                tracing::debug!(x, y, z, key, "updated block entity");
                return;
            }
        }
    }

    let mut entry = Compound::new();
    entry.insert("x".to_string(), Value::Int(x));
    entry.insert("y".to_string(), Value::Int(y));
    entry.insert("z".to_string(), Value::Int(z));
    apply(&mut entry, id, overrides);

    match entity_list_mut(chunk, key) {
        Some(list) => list.push(Value::Compound(entry)),
        None => {
            chunk.insert(key.to_string(), Value::List(vec![Value::Compound(entry)]));
        }
    }
    tracing::debug!(x, y, z, key, "created block entity");
}

fn apply(entry: &mut Compound, id: &str, overrides: &Compound) {
    if !id.is_empty() {
        entry.insert(ID_FIELD.to_string(), Value::from(id));
    }
    for (k, v) in overrides {
        entry.insert(k.clone(), v.clone());
    }
}

/// Remove the block entity at `(x, y, z)`, keeping the others in order
///
/// Returns whether an entry was removed.
pub fn delete(chunk: &mut Compound, x: i32, y: i32, z: i32) -> bool {
    let Some(key) = list_key(chunk) else {
        return false;
    };
    let Some(list) = entity_list_mut(chunk, key) else {
        return false;
    };
    match position_of(list, x, y, z) {
        Some(i) => {
            list.remove(i);
            tracing::debug!(x, y, z, key, "deleted block entity");
            true
        }
        None => false,
    }
}

/// Shallow-merge a JSON object given as text into `dst`
///
/// Empty text is a no-op. Malformed text fails with `Parse` and leaves
/// `dst` untouched.
pub fn merge_overrides(dst: &mut Compound, text: &str) -> Result<()> {
    let parsed = nbt::parse_compound(text)?;
    dst.extend(parsed);
    Ok(())
}
