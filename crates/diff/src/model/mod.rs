mod output;
mod string;

pub use output::{OutputDiffModel, OutputType};
pub use string::{
    create_direct_string_diff_model, create_patch_string_diff_model, create_text_diff_model,
    StringDiffModel,
};

/// Display hints a renderer uses to fold a diff away
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseHints {
    /// Whether the diff may be collapsed at all
    pub collapsible: bool,

    /// Header shown in place of a collapsed diff
    pub header: String,

    /// Whether the diff starts out collapsed
    pub start_collapsed: bool,
}

/// Capabilities shared by every kind of diff model
pub trait DiffModel {
    /// Base and remote are identical
    fn unchanged(&self) -> bool;

    /// Only the remote exists
    fn added(&self) -> bool;

    /// Only the base exists
    fn deleted(&self) -> bool;

    fn collapse_hints(&self) -> &CollapseHints;

    fn collapsible(&self) -> bool {
        self.collapse_hints().collapsible
    }
}
