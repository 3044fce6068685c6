use serde_json::{Map, Value};
use similar::{DiffOp as SimilarOp, DiffTag};
use std::collections::BTreeSet;
use std::ops::Range;

use crate::config::DiffConfig;
use crate::entry::{DiffEntry, RangeValues};
use crate::error::{Error, Result};

/// Compute the diff entries that turn `base` into `remote`.
///
/// Strings are diffed by line, objects by member and lists by element.
/// Values of any other kind can only be compared for equality, so two
/// differing scalars (or values of different kinds) are rejected.
pub fn diff(base: &Value, remote: &Value, config: &DiffConfig) -> Result<Vec<DiffEntry>> {
    if base == remote {
        return Ok(Vec::new());
    }
    match (base, remote) {
        (Value::String(base), Value::String(remote)) => Ok(diff_strings(base, remote, config)),
        (Value::Object(base), Value::Object(remote)) => diff_objects(base, remote, config),
        (Value::Array(base), Value::Array(remote)) => diff_arrays(base, remote, config),
        _ => Err(Error::Undiffable {
            base: value_kind(base),
            remote: value_kind(remote),
        }),
    }
}

/// JSON kind name of a value, for messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Whether two differing values can be expressed as a nested diff
fn diffable(base: &Value, remote: &Value) -> bool {
    matches!(
        (base, remote),
        (Value::String(_), Value::String(_))
            | (Value::Object(_), Value::Object(_))
            | (Value::Array(_), Value::Array(_))
    )
}

fn diff_strings(base: &str, remote: &str, config: &DiffConfig) -> Vec<DiffEntry> {
    let text_diff = config.text_diff().diff_lines(base, remote);
    let old_lines = text_diff.old_slices();
    let new_lines = text_diff.new_slices();

    let mut entries = Vec::new();
    let mut old_pos = 0;
    for op in text_diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        let at = insertion_point(&mut old_pos, &old);
        match tag {
            DiffTag::Equal => {}
            DiffTag::Replace if config.line_patches && old.len() == new.len() => {
                for (index, (old_line, new_line)) in old_lines[old.clone()]
                    .iter()
                    .zip(&new_lines[new.clone()])
                    .enumerate()
                {
                    entries.push(DiffEntry::patch(
                        old.start + index,
                        diff_chars(old_line, new_line, config),
                    ));
                }
            }
            _ => {
                let values = new_lines[new.clone()]
                    .iter()
                    .map(|line| Value::String(line.to_string()))
                    .collect();
                push_ranges(&mut entries, at, &old, &new, RangeValues::Items(values));
            }
        }
    }
    entries
}

fn diff_chars(base: &str, remote: &str, config: &DiffConfig) -> Vec<DiffEntry> {
    let text_diff = config.text_diff().diff_chars(base, remote);
    let new_chars = text_diff.new_slices();

    let mut entries = Vec::new();
    let mut old_pos = 0;
    for op in text_diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        let at = insertion_point(&mut old_pos, &old);
        if tag != DiffTag::Equal {
            let text = new_chars[new.clone()].concat();
            push_ranges(&mut entries, at, &old, &new, RangeValues::Text(text));
        }
    }
    entries
}

/// Base index an op's insertion belongs at, advancing the cursor past the
/// base items the op covers.
///
/// The old index `similar` reports for a pure insertion can lag behind the
/// preceding op, so insertions are keyed by the cursor instead.
fn insertion_point(old_pos: &mut usize, old: &Range<usize>) -> usize {
    if old.is_empty() {
        return *old_pos;
    }
    *old_pos = old.end;
    old.start
}

/// Emit the insertion (at base index `at`) before the removal for one
/// changed block
fn push_ranges(
    entries: &mut Vec<DiffEntry>,
    at: usize,
    old: &Range<usize>,
    new: &Range<usize>,
    values: RangeValues,
) {
    if !new.is_empty() {
        entries.push(DiffEntry::add_range(at, values));
    }
    if !old.is_empty() {
        entries.push(DiffEntry::remove_range(old.start, old.len()));
    }
}

fn diff_objects(
    base: &Map<String, Value>,
    remote: &Map<String, Value>,
    config: &DiffConfig,
) -> Result<Vec<DiffEntry>> {
    let keys: BTreeSet<&String> = base.keys().chain(remote.keys()).collect();

    let mut entries = Vec::new();
    for key in keys {
        match (base.get(key), remote.get(key)) {
            (Some(old), Some(new)) if old == new => {}
            (Some(old), Some(new)) if diffable(old, new) => {
                entries.push(DiffEntry::patch(key.as_str(), diff(old, new, config)?));
            }
            (Some(_), Some(new)) => entries.push(DiffEntry::replace(key.as_str(), new.clone())),
            (Some(_), None) => entries.push(DiffEntry::remove(key.as_str())),
            (None, Some(new)) => entries.push(DiffEntry::add(key.as_str(), new.clone())),
            (None, None) => {}
        }
    }
    Ok(entries)
}

fn diff_arrays(base: &[Value], remote: &[Value], config: &DiffConfig) -> Result<Vec<DiffEntry>> {
    // Compare elements through their serialized form, Value is not hashable
    let old: Vec<String> = base.iter().map(Value::to_string).collect();
    let new: Vec<String> = remote.iter().map(Value::to_string).collect();
    let ops = similar::capture_diff_slices_deadline(config.algorithm, &old, &new, config.deadline());

    let mut entries = Vec::new();
    let mut old_pos = 0;
    for op in &ops {
        let (tag, old, new) = op.as_tag_tuple();
        let at = insertion_point(&mut old_pos, &old);
        match tag {
            DiffTag::Equal => {}
            DiffTag::Replace if pairwise_diffable(op, base, remote) => {
                for (index, (old_item, new_item)) in base[old.clone()].iter().zip(&remote[new]).enumerate() {
                    entries.push(DiffEntry::patch(old.start + index, diff(old_item, new_item, config)?));
                }
            }
            _ => {
                let values = remote[new.clone()].to_vec();
                push_ranges(&mut entries, at, &old, &new, RangeValues::Items(values));
            }
        }
    }
    Ok(entries)
}

fn pairwise_diffable(op: &SimilarOp, base: &[Value], remote: &[Value]) -> bool {
    let (old, new) = (op.old_range(), op.new_range());
    old.len() == new.len()
        && base[old]
            .iter()
            .zip(&remote[new])
            .all(|(old_item, new_item)| diffable(old_item, new_item))
}
