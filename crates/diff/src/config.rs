use similar::{Algorithm, TextDiff, TextDiffConfig};
use std::time::{Duration, Instant};

/// Options for the sequence diffs behind the differ and the text diff model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Sequence diff algorithm
    pub algorithm: Algorithm,

    /// Give up refining a diff after this long; `None` never times out
    pub timeout: Option<Duration>,

    /// Express same-sized blocks of replaced lines as per-line character
    /// patches instead of whole-line add/remove pairs
    pub line_patches: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Myers,
            timeout: Some(Duration::from_secs(5)),
            line_patches: true,
        }
    }
}

impl DiffConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_line_patches(mut self, line_patches: bool) -> Self {
        self.line_patches = line_patches;
        self
    }

    /// A `similar` text diff configuration honoring these options
    pub(crate) fn text_diff(&self) -> TextDiffConfig {
        let mut config = TextDiff::configure();
        config.algorithm(self.algorithm);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        config
    }

    /// Deadline for slice diffs started now
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|timeout| Instant::now() + timeout)
    }
}
