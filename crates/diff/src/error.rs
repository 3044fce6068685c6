use crate::entry::{DiffKey, DiffOp};

/// Common result type for the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced while building or deriving diff models.
///
/// Every variant is a precondition violation on the caller's inputs. None of
/// them are transient, so retrying with the same inputs fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw range is reversed or runs past the end of its text.
    #[error("invalid range {from}..{to} for text of {len} chars")]
    InvalidRange {
        /// Start offset of the offending range.
        from: usize,
        /// End offset of the offending range.
        to: usize,
        /// Length of the text the range indexes into, in chars.
        len: usize,
    },

    /// A direct model was asked to represent a genuine transformation.
    #[error("direct diff models only represent additions, deletions or identical values")]
    MismatchedEndpoints,

    /// Neither a base nor a remote value was supplied.
    #[error("a diff model needs a base or a remote value")]
    MissingEndpoints,

    /// Ranges were supplied for a side that does not exist.
    #[error("{0} supplied for a model without the matching text")]
    InconsistentRanges(&'static str),

    /// A dotted path segment exists in neither the base nor the remote value.
    #[error("unknown key `{key}` in path `{path}`")]
    UnknownPathKey {
        /// Full path that was being resolved.
        path: String,
        /// Segment that failed to resolve.
        key: String,
    },

    /// No mimetype is known for a sub-path of an output.
    #[error("cannot determine mimetype for {output_type} output with key `{key}`")]
    UnknownMimeType {
        /// Declared `output_type` of the output.
        output_type: String,
        /// Path that was asked for.
        key: String,
    },

    /// Neither output value declares an `output_type`.
    #[error("output has no `output_type`")]
    MissingOutputType,

    /// A diff entry cannot be applied to the value it targets.
    #[error("cannot apply `{op}` at key {key}: {reason}")]
    InvalidPatch {
        /// Operation of the failing entry.
        op: DiffOp,
        /// Key of the failing entry.
        key: DiffKey,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Two values that differ cannot be expressed as diff entries.
    #[error("cannot diff {base} against {remote}")]
    Undiffable {
        /// JSON kind of the base value.
        base: &'static str,
        /// JSON kind of the remote value.
        remote: &'static str,
    },

    /// Diff entries failed to (de)serialize.
    #[error("json error: {source}")]
    Json {
        /// Underlying serde_json error.
        #[from]
        source: serde_json::Error,
    },
}
