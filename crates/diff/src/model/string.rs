use log::debug;
use serde_json::Value;

use crate::chunk::{build_chunks, Chunk};
use crate::config::DiffConfig;
use crate::entry::DiffEntry;
use crate::error::{Error, Result};
use crate::model::{CollapseHints, DiffModel};
use crate::patch::{line_ranges, patch_stringified, stringify};
use crate::range::{raw_to_pos, PositionRange, RawRange};

const DEFAULT_MIMETYPE: &str = "text/plain";

/// The diff of a single string: base and remote text with the ranges that
/// were added to the remote and deleted from the base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringDiffModel {
    /// The old version of the text, absent for a pure addition
    base: Option<String>,

    /// The new version of the text, absent for a pure deletion
    remote: Option<String>,

    /// Added spans in remote coordinates, sorted by start
    additions: Vec<PositionRange>,

    /// Deleted spans in base coordinates, sorted by start
    deletions: Vec<PositionRange>,

    /// Content type used to interpret the text
    mimetype: String,

    hints: CollapseHints,
}

impl StringDiffModel {
    /// Create a model from both texts and raw ranges into them.
    ///
    /// Additions index into `remote` and deletions into `base`. Empty ranges
    /// are dropped and the rest sorted before translation.
    pub fn new(
        base: Option<String>,
        remote: Option<String>,
        additions: &[RawRange],
        deletions: &[RawRange],
    ) -> Result<Self> {
        let additions = sorted_nonempty(additions);
        let deletions = sorted_nonempty(deletions);

        let additions = match &remote {
            Some(remote) => raw_to_pos(&additions, remote)?,
            None if additions.is_empty() => Vec::new(),
            None => return Err(Error::InconsistentRanges("additions")),
        };
        let deletions = match &base {
            Some(base) => raw_to_pos(&deletions, base)?,
            None if deletions.is_empty() => Vec::new(),
            None => return Err(Error::InconsistentRanges("deletions")),
        };
        if base.is_none() && remote.is_none() {
            return Err(Error::MissingEndpoints);
        }

        debug!(
            "string diff model with {} additions and {} deletions",
            additions.len(),
            deletions.len()
        );
        Ok(Self {
            base,
            remote,
            additions,
            deletions,
            mimetype: DEFAULT_MIMETYPE.to_string(),
            hints: CollapseHints::default(),
        })
    }

    /// Set the mimetype, right after construction
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = mimetype.into();
        self
    }

    /// Set the collapse hints, right after construction
    pub fn with_collapse_hints(mut self, hints: CollapseHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn additions(&self) -> &[PositionRange] {
        &self.additions
    }

    pub fn deletions(&self) -> &[PositionRange] {
        &self.deletions
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Group the additions and deletions into chunks.
    ///
    /// Computed on every call; cache the result if it is needed repeatedly.
    pub fn get_chunks(&self) -> Vec<Chunk> {
        build_chunks(&self.additions, &self.deletions)
    }
}

impl DiffModel for StringDiffModel {
    fn unchanged(&self) -> bool {
        self.base == self.remote
    }

    fn added(&self) -> bool {
        self.base.is_none()
    }

    fn deleted(&self) -> bool {
        self.remote.is_none()
    }

    fn collapse_hints(&self) -> &CollapseHints {
        &self.hints
    }
}

fn sorted_nonempty(ranges: &[RawRange]) -> Vec<RawRange> {
    let mut ranges: Vec<RawRange> = ranges.iter().filter(|range| !range.is_empty()).copied().collect();
    ranges.sort_by_key(|range| range.from);
    ranges
}

/// Full-span range over a text, or nothing for an empty text
fn full_span(text: &str) -> Vec<RawRange> {
    let len = text.chars().count();
    if len == 0 {
        Vec::new()
    } else {
        vec![RawRange::new(0, len)]
    }
}

/// Model an addition, a deletion or an unchanged value.
///
/// Non-string values are stringified first. Two present values that differ
/// are a genuine transformation, which a direct model cannot represent.
pub fn create_direct_string_diff_model(
    base: Option<&Value>,
    remote: Option<&Value>,
) -> Result<StringDiffModel> {
    let base = base.map(stringify);
    let remote = remote.map(stringify);
    match (base, remote) {
        (None, None) => Err(Error::MissingEndpoints),
        (None, Some(remote)) => {
            let additions = full_span(&remote);
            StringDiffModel::new(None, Some(remote), &additions, &[])
        }
        (Some(base), None) => {
            let deletions = full_span(&base);
            StringDiffModel::new(Some(base), None, &[], &deletions)
        }
        (Some(base), Some(remote)) if base == remote => {
            StringDiffModel::new(Some(base), Some(remote), &[], &[])
        }
        (Some(_), Some(_)) => Err(Error::MismatchedEndpoints),
    }
}

/// Model the result of applying `diff` to `base`
pub fn create_patch_string_diff_model(
    base: &Value,
    diff: &[DiffEntry],
    config: &DiffConfig,
) -> Result<StringDiffModel> {
    let patched = patch_stringified(base, diff, config)?;
    StringDiffModel::new(
        Some(patched.base),
        Some(patched.remote),
        &patched.additions,
        &patched.deletions,
    )
}

/// Model two present values by diffing their stringified lines
pub fn create_text_diff_model(base: &Value, remote: &Value, config: &DiffConfig) -> Result<StringDiffModel> {
    let base = stringify(base);
    let remote = stringify(remote);
    let (additions, deletions) = line_ranges(&base, &remote, config);
    StringDiffModel::new(Some(base), Some(remote), &additions, &deletions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sorted_nonempty_drops_and_sorts() {
        let ranges = sorted_nonempty(&[RawRange::new(5, 7), RawRange::new(3, 3), RawRange::new(0, 2)]);
        assert_eq!(ranges, vec![RawRange::new(0, 2), RawRange::new(5, 7)]);
    }

    #[test]
    fn test_full_span_counts_chars() {
        assert_eq!(full_span("añb"), vec![RawRange::new(0, 3)]);
        assert!(full_span("").is_empty());
    }
}
