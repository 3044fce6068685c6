// Diff models for notebook cells and outputs
// This crate turns raw edit ranges into line-based chunks for display

mod chunk;
mod config;
mod differ;
mod entry;
mod error;
mod model;
mod patch;
mod range;

pub use chunk::{build_chunks, Chunk};
pub use config::DiffConfig;
pub use differ::diff;
pub use entry::{get_diff_key, parse_diff, DiffEntry, DiffKey, DiffOp, KeyLookup, RangeValues};
pub use error::{Error, Result};
pub use model::{
    create_direct_string_diff_model, create_patch_string_diff_model, create_text_diff_model,
    CollapseHints, DiffModel, OutputDiffModel, OutputType, StringDiffModel,
};
pub use patch::{line_ranges, patch, patch_stringified, stringify, PatchedText};
pub use range::{raw_to_pos, Position, PositionRange, RawRange};
pub use similar::Algorithm;
