use indexmap::map::Entry;

use crate::constants::MAX_SPARSE_GAP;
use crate::key::{KeyPath, Segment, Slot};
use crate::value::{Map, Value};
use crate::{DecodeOptions, Error, Result};

use super::group::Group;
use super::special::{clean_value, replace_specials};

/// Decodes one group into its root container.
pub fn build(group: &Group, options: &DecodeOptions) -> Result<Value> {
    let mut root = root_container(group);
    for (key, raw) in &group.entries {
        let value = clean_value(replace_specials(raw.clone()), options);
        insert_entry(&mut root, key, value)?;
    }
    Ok(root)
}

fn root_container(group: &Group) -> Value {
    let first_kind = group
        .entries
        .keys()
        .next()
        .and_then(|key| KeyPath::parse(key))
        .and_then(|path| path.first_kind());
    match first_kind {
        Some(kind) if kind.is_list() => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}

fn insert_entry(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let path = match KeyPath::parse(key) {
        Some(path) if path.is_nested() || root.is_array() => path,
        _ => {
            match root {
                Value::Object(map) => {
                    map.entry(key.to_string()).or_insert(value);
                }
                _ => tracing::debug!(key, "plain key under an array root skipped"),
            }
            return Ok(());
        }
    };

    let written = write_path(root, &path.segments, value).map_err(|err| err.with_key(key))?;
    if !written {
        tracing::debug!(key, "key addresses an array by name; entry skipped");
    }
    Ok(())
}

/// Walks `segments` from `root`, creating containers on the way, and upserts
/// `value` at the last one. Returns `false` when the path cannot be addressed.
pub(crate) fn write_path(root: &mut Value, segments: &[Segment<'_>], value: Value) -> Result<bool> {
    let Some((last, parents)) = segments.split_last() else {
        return Ok(false);
    };

    let mut cursor = root;
    for (depth, segment) in parents.iter().enumerate() {
        let next = &segments[depth + 1];
        cursor = match descend(cursor, segment.slot(), next)? {
            Some(child) => child,
            None => return Ok(false),
        };
    }
    upsert(cursor, last.slot(), value)
}

fn descend<'v>(
    container: &'v mut Value,
    slot: Slot<'_>,
    next: &Segment<'_>,
) -> Result<Option<&'v mut Value>> {
    match (container, slot) {
        (Value::Object(map), slot) => {
            let child = map.entry(slot_key(slot)).or_insert(Value::Null);
            if needs_seed(child) {
                *child = seed(next);
            }
            Ok(Some(child))
        }
        (Value::Array(items), Slot::Index(index)) => {
            if index >= items.len() {
                pad(items, index)?;
                items.push(seed(next));
            } else if needs_seed(&items[index]) {
                items[index] = seed(next);
            }
            Ok(Some(&mut items[index]))
        }
        _ => Ok(None),
    }
}

fn upsert(container: &mut Value, slot: Slot<'_>, value: Value) -> Result<bool> {
    match (container, slot) {
        (Value::Object(map), slot) => {
            match map.entry(slot_key(slot)) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => fill_or_merge(entry.get_mut(), value),
            }
            Ok(true)
        }
        (Value::Array(items), Slot::Index(index)) => {
            match items.get_mut(index) {
                Some(existing) => fill_or_merge(existing, value),
                None => grow_and_set(items, index, value)?,
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

// An empty slot counts as unwritten; a written one only accepts additions.
fn fill_or_merge(existing: &mut Value, incoming: Value) {
    if !existing.is_truthy() {
        *existing = incoming;
        return;
    }
    match (existing, incoming) {
        (Value::Array(items), incoming @ Value::Array(_)) if incoming.is_truthy() => {
            items.push(incoming);
        }
        (Value::Object(map), Value::Object(incoming)) => {
            for (key, value) in incoming {
                map.entry(key).or_insert(value);
            }
        }
        _ => {}
    }
}

/// Places `value` at `index`, which must not be below `items.len()`.
fn grow_and_set(items: &mut Vec<Value>, index: usize, value: Value) -> Result<()> {
    if index > items.len() {
        pad(items, index)?;
        items.push(value);
        return Ok(());
    }
    match value {
        Value::Array(values) => items.extend(values),
        value => items.push(value),
    }
    Ok(())
}

fn pad(items: &mut Vec<Value>, index: usize) -> Result<()> {
    let gap = index.saturating_sub(items.len());
    if gap > MAX_SPARSE_GAP {
        return Err(Error::sparse_overflow(gap));
    }
    items.resize(index.max(items.len()), Value::Null);
    Ok(())
}

fn needs_seed(child: &Value) -> bool {
    !(child.is_container() && child.is_truthy())
}

fn seed(next: &Segment<'_>) -> Value {
    match next {
        Segment::Name(name) => {
            let mut map = Map::new();
            map.insert((*name).to_string(), Value::Null);
            Value::Object(map)
        }
        Segment::Index(_) | Segment::Append => Value::Array(Vec::new()),
    }
}

fn slot_key(slot: Slot<'_>) -> String {
    match slot {
        Slot::Index(index) => index.to_string(),
        Slot::Key(key) => key.to_string(),
    }
}
