use serde_json::{Map, Value};
use similar::{DiffTag, DiffableStr};

use crate::config::DiffConfig;
use crate::entry::{DiffEntry, RangeValues};
use crate::error::{Error, Result};
use crate::range::RawRange;

/// Canonical string form of a value.
///
/// Strings are taken verbatim; anything else is pretty-printed JSON with
/// two-space indentation and sorted object keys.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => format!("{:#}", other),
    }
}

/// The stringified endpoints of a patch with the char ranges that changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedText {
    pub base: String,
    pub remote: String,
    /// Inserted spans, offsets into `remote`
    pub additions: Vec<RawRange>,
    /// Removed spans, offsets into `base`
    pub deletions: Vec<RawRange>,
}

/// Apply `diff` to `base`, returning the patched value
pub fn patch(base: &Value, diff: &[DiffEntry]) -> Result<Value> {
    if diff.is_empty() {
        return Ok(base.clone());
    }
    match base {
        Value::Object(members) => patch_object(members, diff).map(Value::Object),
        Value::Array(items) => patch_array(items, diff).map(Value::Array),
        Value::String(text) => patch_string(text, diff).map(|patched| Value::String(patched.remote)),
        _ => Err(invalid(&diff[0], "scalar values cannot be patched")),
    }
}

/// Stringify `base`, apply `diff` and report the changed char ranges.
///
/// String values are patched line by line and their ranges come straight
/// from the entries. Other values are patched structurally and their ranges
/// come from a line diff of both stringified forms.
pub fn patch_stringified(base: &Value, diff: &[DiffEntry], config: &DiffConfig) -> Result<PatchedText> {
    match base {
        Value::String(text) => patch_string(text, diff),
        other => {
            let remote = patch(other, diff)?;
            let base = stringify(other);
            let remote = stringify(&remote);
            let (additions, deletions) = line_ranges(&base, &remote, config);
            Ok(PatchedText {
                base,
                remote,
                additions,
                deletions,
            })
        }
    }
}

/// Char ranges of lines added to `remote` and deleted from `base`
pub fn line_ranges(base: &str, remote: &str, config: &DiffConfig) -> (Vec<RawRange>, Vec<RawRange>) {
    let diff = config.text_diff().diff_lines(base, remote);
    let old_offsets = char_offsets(diff.old_slices());
    let new_offsets = char_offsets(diff.new_slices());

    let mut additions = Vec::new();
    let mut deletions = Vec::new();
    for op in diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        if matches!(tag, DiffTag::Delete | DiffTag::Replace) {
            deletions.push(RawRange::new(old_offsets[old.start], old_offsets[old.end]));
        }
        if matches!(tag, DiffTag::Insert | DiffTag::Replace) {
            additions.push(RawRange::new(new_offsets[new.start], new_offsets[new.end]));
        }
    }
    (additions, deletions)
}

/// Char offset of every token start, plus the total length
fn char_offsets(tokens: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tokens.len() + 1);
    let mut offset = 0;
    offsets.push(offset);
    for token in tokens {
        offset += token.chars().count();
        offsets.push(offset);
    }
    offsets
}

fn invalid(entry: &DiffEntry, reason: &'static str) -> Error {
    Error::InvalidPatch {
        op: entry.op(),
        key: entry.key().clone(),
        reason,
    }
}

fn sequence_key(entry: &DiffEntry, next: usize, len: usize) -> Result<usize> {
    let key = entry
        .key()
        .as_index()
        .ok_or_else(|| invalid(entry, "sequence entries need an index key"))?;
    if key < next {
        return Err(invalid(entry, "entries are out of order"));
    }
    if key > len {
        return Err(invalid(entry, "key is past the end of the sequence"));
    }
    Ok(key)
}

fn removal_end(entry: &DiffEntry, key: usize, length: usize, len: usize) -> Result<usize> {
    let end = key + length;
    if end > len {
        return Err(invalid(entry, "removal runs past the end of the sequence"));
    }
    Ok(end)
}

fn patch_object(base: &Map<String, Value>, diff: &[DiffEntry]) -> Result<Map<String, Value>> {
    let mut members = base.clone();
    for entry in diff {
        let name = entry
            .key()
            .as_name()
            .ok_or_else(|| invalid(entry, "object entries need a name key"))?;
        match entry {
            DiffEntry::Add { value, .. } => {
                if members.insert(name.to_string(), value.clone()).is_some() {
                    return Err(invalid(entry, "member already exists"));
                }
            }
            DiffEntry::Remove { .. } => {
                members
                    .remove(name)
                    .ok_or_else(|| invalid(entry, "member does not exist"))?;
            }
            DiffEntry::Replace { value, .. } => {
                let member = members
                    .get_mut(name)
                    .ok_or_else(|| invalid(entry, "member does not exist"))?;
                *member = value.clone();
            }
            DiffEntry::Patch { diff, .. } => {
                let member = members
                    .get_mut(name)
                    .ok_or_else(|| invalid(entry, "member does not exist"))?;
                *member = patch(member, diff)?;
            }
            DiffEntry::AddRange { .. } | DiffEntry::RemoveRange { .. } => {
                return Err(invalid(entry, "range operations need a sequence"));
            }
        }
    }
    Ok(members)
}

fn patch_array(base: &[Value], diff: &[DiffEntry]) -> Result<Vec<Value>> {
    let mut items = Vec::with_capacity(base.len());
    let mut next = 0;
    for entry in diff {
        let key = sequence_key(entry, next, base.len())?;
        items.extend_from_slice(&base[next..key]);
        next = key;
        match entry {
            DiffEntry::AddRange {
                values: RangeValues::Items(values),
                ..
            } => items.extend(values.iter().cloned()),
            DiffEntry::AddRange { .. } => {
                return Err(invalid(entry, "lists take a list of values"));
            }
            DiffEntry::RemoveRange { length, .. } => {
                next = removal_end(entry, key, *length, base.len())?;
            }
            DiffEntry::Patch { diff, .. } => {
                let item = base
                    .get(key)
                    .ok_or_else(|| invalid(entry, "key is past the end of the sequence"))?;
                items.push(patch(item, diff)?);
                next = key + 1;
            }
            DiffEntry::Add { .. } | DiffEntry::Remove { .. } | DiffEntry::Replace { .. } => {
                return Err(invalid(entry, "member operations need an object"));
            }
        }
    }
    items.extend_from_slice(&base[next..]);
    Ok(items)
}

/// Patch a string whose diff addresses its lines, tracking changed ranges.
///
/// Lines are split the same way the line differ splits them, so keys from
/// `diff` line up with the differ's output.
fn patch_string(base: &str, diff: &[DiffEntry]) -> Result<PatchedText> {
    let lines = base.tokenize_lines();
    let mut writer = TextWriter::default();
    writer.apply(&lines, diff, true)?;
    Ok(PatchedText {
        base: base.to_string(),
        remote: writer.remote,
        additions: writer.additions,
        deletions: writer.deletions,
    })
}

#[derive(Default)]
struct TextWriter {
    remote: String,
    base_pos: usize,
    remote_pos: usize,
    additions: Vec<RawRange>,
    deletions: Vec<RawRange>,
}

impl TextWriter {
    /// Walk `tokens` (lines, or chars of one line) applying `diff`
    fn apply(&mut self, tokens: &[&str], diff: &[DiffEntry], lines: bool) -> Result<()> {
        let mut next = 0;
        for entry in diff {
            let key = sequence_key(entry, next, tokens.len())?;
            tokens[next..key].iter().for_each(|token| self.keep(token));
            next = key;
            match entry {
                DiffEntry::AddRange { values, .. } => {
                    let text = values
                        .to_text()
                        .ok_or_else(|| invalid(entry, "strings take string values"))?;
                    self.insert(&text);
                }
                DiffEntry::RemoveRange { length, .. } => {
                    next = removal_end(entry, key, *length, tokens.len())?;
                    tokens[key..next].iter().for_each(|token| self.delete(token));
                }
                DiffEntry::Patch { diff, .. } if lines => {
                    let line = tokens
                        .get(key)
                        .ok_or_else(|| invalid(entry, "key is past the end of the sequence"))?;
                    let chars: Vec<&str> = line
                        .char_indices()
                        .map(|(at, ch)| &line[at..at + ch.len_utf8()])
                        .collect();
                    self.apply(&chars, diff, false)?;
                    next = key + 1;
                }
                DiffEntry::Patch { .. } => {
                    return Err(invalid(entry, "chars cannot be patched"));
                }
                DiffEntry::Add { .. } | DiffEntry::Remove { .. } | DiffEntry::Replace { .. } => {
                    return Err(invalid(entry, "member operations need an object"));
                }
            }
        }
        tokens[next..].iter().for_each(|token| self.keep(token));
        Ok(())
    }

    fn keep(&mut self, text: &str) {
        let len = text.chars().count();
        self.remote.push_str(text);
        self.base_pos += len;
        self.remote_pos += len;
    }

    fn insert(&mut self, text: &str) {
        let len = text.chars().count();
        push_range(&mut self.additions, self.remote_pos, len);
        self.remote.push_str(text);
        self.remote_pos += len;
    }

    fn delete(&mut self, text: &str) {
        let len = text.chars().count();
        push_range(&mut self.deletions, self.base_pos, len);
        self.base_pos += len;
    }
}

/// Append a range, extending the previous one when they touch
fn push_range(ranges: &mut Vec<RawRange>, from: usize, len: usize) {
    if len == 0 {
        return;
    }
    match ranges.last_mut() {
        Some(last) if last.to == from => last.to += len,
        _ => ranges.push(RawRange::new(from, from + len)),
    }
}
