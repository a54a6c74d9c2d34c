//! Declared argument specs.

use std::fmt;

/// Prefix used by `flag`/`toggle` when none is given.
pub const DEFAULT_PREFIX: &str = "-";

/// Callback invoked once per accepted value.
pub type Action<'a> = Box<dyn Fn(&str) + 'a>;

/// A `(prefix, name)` pair identifying a flag token by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    prefix: String,
    toggle: bool,
}

impl Tag {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, toggle: bool) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            toggle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// State written into the evaluation when this tag is matched.
    pub fn toggle(&self) -> bool {
        self.toggle
    }

    /// The exact token text that matches this tag.
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }
}

/// How a spec reacts to being encountered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// A second occurrence is an error.
    #[default]
    Once,
    /// Values of every occurrence accumulate.
    Append,
    /// Each occurrence replaces the values of the previous one.
    Overwrite,
}

/// One declared argument: a tagged flag or, when it has no tags, a positional.
pub struct ArgSpec<'a> {
    pub(crate) id: String,
    pub(crate) tags: Vec<Tag>,
    pub(crate) consumed_args: usize,
    pub(crate) allowed_values: Vec<String>,
    pub(crate) default_toggle: bool,
    pub(crate) default_values: Vec<String>,
    pub(crate) required: bool,
    pub(crate) repeat: Repeat,
    pub(crate) abort: bool,
    pub(crate) action: Option<Action<'a>>,
}

impl<'a> ArgSpec<'a> {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            tags: Vec::new(),
            consumed_args: 0,
            allowed_values: Vec::new(),
            default_toggle: false,
            default_values: Vec::new(),
            required: false,
            repeat: Repeat::Once,
            abort: false,
            action: None,
        }
    }

    /// Declare a tag, replacing an earlier one with the same text.
    ///
    /// Identity is the joined `prefix ++ name`, the same text tokens are
    /// matched against, so `-` + `in` and `-i` + `n` are one tag.
    pub(crate) fn insert_tag(&mut self, tag: Tag) {
        let text = tag.text();
        match self.tags.iter_mut().find(|t| t.text() == text) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_positional(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn consumed_args(&self) -> usize {
        self.consumed_args
    }

    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }

    /// Whether `value` is acceptable; an empty allowed set accepts anything.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == value)
    }

    pub fn default_toggle(&self) -> bool {
        self.default_toggle
    }

    pub fn default_values(&self) -> &[String] {
        &self.default_values
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn is_multiple(&self) -> bool {
        self.repeat != Repeat::Once
    }

    pub fn is_overwritable(&self) -> bool {
        self.repeat == Repeat::Overwrite
    }

    pub fn is_abort(&self) -> bool {
        self.abort
    }

    pub(crate) fn notify(&self, value: &str) {
        if let Some(action) = &self.action {
            action(value);
        }
    }
}

impl fmt::Debug for ArgSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgSpec")
            .field("id", &self.id)
            .field("tags", &self.tags)
            .field("consumed_args", &self.consumed_args)
            .field("allowed_values", &self.allowed_values)
            .field("default_toggle", &self.default_toggle)
            .field("default_values", &self.default_values)
            .field("required", &self.required)
            .field("repeat", &self.repeat)
            .field("abort", &self.abort)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// Initial state or values for a spec, accepted by `Configurator::initial`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initial {
    State(bool),
    Values(Vec<String>),
}

impl From<bool> for Initial {
    fn from(state: bool) -> Self {
        Self::State(state)
    }
}

impl From<&str> for Initial {
    fn from(value: &str) -> Self {
        Self::Values(vec![value.to_string()])
    }
}

impl From<String> for Initial {
    fn from(value: String) -> Self {
        Self::Values(vec![value])
    }
}

impl From<Vec<String>> for Initial {
    fn from(values: Vec<String>) -> Self {
        Self::Values(values)
    }
}

impl From<Vec<&str>> for Initial {
    fn from(values: Vec<&str>) -> Self {
        Self::Values(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Initial {
    fn from(values: &[&str]) -> Self {
        Self::Values(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Initial {
    fn from(values: [&str; N]) -> Self {
        Self::Values(values.into_iter().map(str::to_string).collect())
    }
}
