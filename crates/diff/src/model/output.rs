use derive_more::Display;
use log::debug;
use serde_json::Value;

use crate::config::DiffConfig;
use crate::differ::diff;
use crate::entry::{get_diff_key, DiffEntry, DiffKey};
use crate::error::{Error, Result};
use crate::model::string::{
    create_direct_string_diff_model, create_patch_string_diff_model, StringDiffModel,
};
use crate::model::{CollapseHints, DiffModel};
use crate::patch::patch;

const JSON_MIMETYPE: &str = "application/json";
const CONSOLE_TEXT_MIMETYPE: &str = "application/vnd.jupyter.console-text";

/// The declared `output_type` of a notebook output
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum OutputType {
    #[display(fmt = "stream")]
    Stream,
    #[display(fmt = "execute_result")]
    ExecuteResult,
    #[display(fmt = "display_data")]
    DisplayData,
    #[display(fmt = "error")]
    Error,
    #[display(fmt = "{}", _0)]
    Other(String),
}

impl From<&str> for OutputType {
    fn from(name: &str) -> Self {
        match name {
            "stream" => OutputType::Stream,
            "execute_result" => OutputType::ExecuteResult,
            "display_data" => OutputType::DisplayData,
            "error" => OutputType::Error,
            other => OutputType::Other(other.to_string()),
        }
    }
}

/// The diff of one notebook output: the structured base and remote values
/// and the diff entries between them
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDiffModel {
    base: Option<Value>,
    remote: Option<Value>,
    diff: Option<Vec<DiffEntry>>,
    hints: CollapseHints,
    config: DiffConfig,
}

/// Values and diff found at a sub-path of an output
struct SubValues<'a> {
    base: Option<&'a Value>,
    remote: Option<&'a Value>,
    diff: Option<&'a [DiffEntry]>,
}

impl OutputDiffModel {
    /// Create a model from an output pair and the diff between them.
    ///
    /// When `remote` is missing but `diff` is given, the remote is derived by
    /// patching the base.
    pub fn new(base: Option<Value>, remote: Option<Value>, diff: Option<Vec<DiffEntry>>) -> Result<Self> {
        let remote = match (remote, &base, &diff) {
            (Some(remote), _, _) => Some(remote),
            (None, Some(base), Some(diff)) => Some(patch(base, diff)?),
            (None, _, _) => None,
        };
        if base.is_none() && remote.is_none() {
            return Err(Error::MissingEndpoints);
        }
        Ok(Self {
            base,
            remote,
            diff,
            hints: CollapseHints::default(),
            config: DiffConfig::default(),
        })
    }

    /// Create a model from an output pair, computing the diff between them
    pub fn from_pair(base: Option<Value>, remote: Option<Value>, config: DiffConfig) -> Result<Self> {
        let entries = match (&base, &remote) {
            (Some(base), Some(remote)) if base != remote => Some(diff(base, remote, &config)?),
            _ => None,
        };
        Ok(Self::new(base, remote, entries)?.with_config(config))
    }

    /// Set the collapse hints passed on to derived string models
    pub fn with_collapse_hints(mut self, hints: CollapseHints) -> Self {
        self.hints = hints;
        self
    }

    /// Set the options used to stringify patched sub-values
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base(&self) -> Option<&Value> {
        self.base.as_ref()
    }

    pub fn remote(&self) -> Option<&Value> {
        self.remote.as_ref()
    }

    pub fn diff(&self) -> Option<&[DiffEntry]> {
        self.diff.as_deref()
    }

    fn endpoints(&self) -> impl Iterator<Item = &Value> {
        self.base.iter().chain(self.remote.iter())
    }

    /// The `output_type` declared by the base, or the remote when added
    pub fn output_type(&self) -> Result<OutputType> {
        self.endpoints()
            .next()
            .and_then(|output| output.get("output_type"))
            .and_then(Value::as_str)
            .map(OutputType::from)
            .ok_or(Error::MissingOutputType)
    }

    /// The sub-path holding content of `mimetype`, if this output has any
    pub fn has_mime_type(&self, mimetype: &str) -> Option<String> {
        match self.output_type().ok()? {
            OutputType::Stream => {
                let name = self
                    .endpoints()
                    .find_map(|output| output.get("name"))
                    .and_then(Value::as_str);
                let matches = mimetype == CONSOLE_TEXT_MIMETYPE
                    || name.is_some_and(|name| mimetype == format!("application/vnd.jupyter.{name}"));
                matches.then(|| "text".to_string())
            }
            OutputType::ExecuteResult | OutputType::DisplayData => self
                .endpoints()
                .any(|output| output.get("data").and_then(|data| data.get(mimetype)).is_some())
                .then(|| format!("data.{mimetype}")),
            OutputType::Error => (mimetype == CONSOLE_TEXT_MIMETYPE).then(|| "traceback".to_string()),
            OutputType::Other(_) => None,
        }
    }

    /// The mimetype of the content at sub-path `key`
    pub fn inner_mime_type(&self, key: &str) -> Result<String> {
        let output_type = self.output_type()?;
        match (&output_type, key) {
            (OutputType::Stream, "text") | (OutputType::Error, "traceback") => Ok("text/plain".to_string()),
            (OutputType::ExecuteResult | OutputType::DisplayData, _) if key.starts_with("data.") => {
                Ok(key["data.".len()..].to_string())
            }
            _ => Err(Error::UnknownMimeType {
                output_type: output_type.to_string(),
                key: key.to_string(),
            }),
        }
    }

    /// Derive a string model for the whole output or for a dotted sub-path.
    ///
    /// Without a path the output is serialized as JSON. With a path such as
    /// `data.text/plain` the content at that path is modeled with its own
    /// mimetype. Differing values with no nested diff between them fail with
    /// `Error::MismatchedEndpoints`.
    pub fn stringify(&self, path: Option<&str>) -> Result<StringDiffModel> {
        let model = match path {
            None => self
                .string_model(self.base(), self.remote(), self.diff())?
                .with_mimetype(JSON_MIMETYPE),
            Some(path) => {
                let mimetype = self.inner_mime_type(path)?;
                let sub = self.resolve(path)?;
                self.string_model(sub.base, sub.remote, sub.diff)?
                    .with_mimetype(mimetype)
            }
        };
        Ok(model.with_collapse_hints(self.hints.clone()))
    }

    fn string_model(
        &self,
        base: Option<&Value>,
        remote: Option<&Value>,
        diff: Option<&[DiffEntry]>,
    ) -> Result<StringDiffModel> {
        if self.unchanged() || self.added() || self.deleted() {
            return create_direct_string_diff_model(base, remote);
        }
        match (base, remote, diff) {
            (Some(base), Some(_), Some(diff)) if !diff.is_empty() => {
                create_patch_string_diff_model(base, diff, &self.config)
            }
            _ => create_direct_string_diff_model(base, remote),
        }
    }

    /// Walk a dotted path through base, remote and diff in parallel.
    ///
    /// Segments are joined back together until they name an existing member,
    /// so keys containing dots resolve.
    fn resolve(&self, path: &str) -> Result<SubValues<'_>> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut sub = SubValues {
            base: self.base(),
            remote: self.remote(),
            diff: self.diff(),
        };

        let mut at = 0;
        while at < segments.len() {
            let (key, end) = (at + 1..=segments.len())
                .map(|end| (segments[at..end].join("."), end))
                .find(|(key, _)| member(sub.base, key).is_some() || member(sub.remote, key).is_some())
                .ok_or_else(|| Error::UnknownPathKey {
                    path: path.to_string(),
                    key: segments[at].to_string(),
                })?;

            let diff_key = match (sub.base.or(sub.remote), key.parse::<usize>()) {
                (Some(Value::Array(_)), Ok(index)) => DiffKey::Index(index),
                _ => DiffKey::Name(key.clone()),
            };
            sub = SubValues {
                base: member(sub.base, &key),
                remote: member(sub.remote, &key),
                diff: sub.diff.and_then(|diff| get_diff_key(diff, &diff_key).nested()),
            };
            debug!(
                "resolved `{}` in `{}`, nested diff: {}",
                key,
                path,
                sub.diff.is_some()
            );
            at = end;
        }
        Ok(sub)
    }
}

fn member<'v>(value: Option<&'v Value>, key: &str) -> Option<&'v Value> {
    match value? {
        Value::Object(members) => members.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}

impl DiffModel for OutputDiffModel {
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
