//! Evaluation results.

use indexmap::IndexMap;
use serde::Serialize;

/// State and values recorded for one spec id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    state: bool,
    values: Vec<String>,
}

impl Entry {
    pub fn state(&self) -> bool {
        self.state
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Result of evaluating a token list against a [`Registry`](crate::Registry).
///
/// Entries are kept in declaration order. Lookups of unknown ids return the
/// neutral value (`false`, empty list, `None`) instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    #[serde(rename = "aborted")]
    abort_id: Option<String>,
    args: IndexMap<String, Entry>,
}

impl Evaluation {
    /// Presence/toggle state of `id`; `false` if the id is unknown.
    pub fn state(&self, id: &str) -> bool {
        self.args.get(id).is_some_and(|e| e.state)
    }

    /// All values of `id` in consumption order.
    pub fn list(&self, id: &str) -> &[String] {
        self.args.get(id).map(|e| e.values.as_slice()).unwrap_or(&[])
    }

    /// Alias of [`list`](Self::list).
    pub fn values(&self, id: &str) -> &[String] {
        self.list(id)
    }

    /// The last value of `id`.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.list(id).last().map(String::as_str)
    }

    /// Whether `id` holds at least one value, seeded or consumed.
    pub fn captured(&self, id: &str) -> bool {
        !self.list(id).is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.args.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.args.iter().map(|(id, e)| (id.as_str(), e))
    }

    pub fn aborted(&self) -> bool {
        self.abort_id.is_some()
    }

    /// Id of the abort spec that stopped evaluation.
    pub fn aborted_id(&self) -> Option<&str> {
        self.abort_id.as_deref()
    }
}

impl Evaluation {
    pub(crate) fn set_state(&mut self, id: &str, state: bool) {
        self.entry_mut(id).state = state;
    }

    pub(crate) fn push_value(&mut self, id: &str, value: impl Into<String>) {
        self.entry_mut(id).values.push(value.into());
    }

    pub(crate) fn clear_values(&mut self, id: &str) {
        self.entry_mut(id).values.clear();
    }

    pub(crate) fn set_aborted_by(&mut self, id: &str) {
        self.abort_id = Some(id.to_string());
    }

    fn entry_mut(&mut self, id: &str) -> &mut Entry {
        if !self.args.contains_key(id) {
            self.args.insert(id.to_string(), Entry::default());
        }
        &mut self.args[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_read_as_neutral() {
        let eval = Evaluation::default();
        assert!(!eval.state("nope"));
        assert!(eval.list("nope").is_empty());
        assert_eq!(eval.value("nope"), None);
        assert!(!eval.captured("nope"));
        assert!(eval.entry("nope").is_none());
        assert!(!eval.aborted());
        assert_eq!(eval.aborted_id(), None);
    }

    #[test]
    fn value_is_last_pushed() {
        let mut eval = Evaluation::default();
        eval.set_state("x", true);
        eval.push_value("x", "a");
        eval.push_value("x", "b");
        assert!(eval.state("x"));
        assert_eq!(eval.list("x"), ["a", "b"]);
        assert_eq!(eval.value("x"), Some("b"));

        eval.clear_values("x");
        assert!(!eval.captured("x"));
        assert!(eval.state("x"));
    }

    #[test]
    fn empty_string_abort_id_is_still_an_abort() {
        let mut eval = Evaluation::default();
        eval.set_aborted_by("");
        assert!(eval.aborted());
        assert_eq!(eval.aborted_id(), Some(""));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut eval = Evaluation::default();
        eval.set_state("b", true);
        eval.push_value("a", "v");
        let json = serde_json::to_string(&eval).unwrap();
        assert_eq!(
            json,
            r#"{"aborted":null,"args":{"b":{"state":true,"values":[]},"a":{"state":false,"values":["v"]}}}"#
        );
    }
}
