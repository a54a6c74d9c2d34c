//! Ordered spec registry and its fluent configurator.

use crate::error::{BuildFault, Error, Result};
use crate::spec::{ArgSpec, DEFAULT_PREFIX, Initial, Repeat, Tag};

/// Ordered collection of argument specs.
///
/// Declaration order matters: positionals are claimed in this order and the
/// required-argument check reports the first missing spec in this order.
#[derive(Debug, Default)]
pub struct Registry<'a> {
    specs: Vec<ArgSpec<'a>>,
}

impl<'a> Registry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new spec and return a configurator bound to it.
    ///
    /// The spec is validated when [`Configurator::end`] is called.
    pub fn start(&mut self, id: impl Into<String>) -> Configurator<'_, 'a> {
        let index = self.specs.len();
        self.specs.push(ArgSpec::new(id.into()));
        Configurator {
            registry: Some(self),
            index,
            fault: None,
        }
    }

    pub fn specs(&self) -> &[ArgSpec<'a>] {
        &self.specs
    }

    pub fn get(&self, id: &str) -> Option<&ArgSpec<'a>> {
        self.specs.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn check(&self, index: usize) -> std::result::Result<(), BuildFault> {
        let spec = &self.specs[index];

        if spec.is_positional() && spec.is_multiple() && spec.consumed_args() > 0 {
            return Err(BuildFault::GreedyWithArity);
        }

        let others = self
            .specs
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s);

        for other in others {
            if other.id() == spec.id() {
                return Err(BuildFault::DuplicateId);
            }
            for tag in spec.tags() {
                let text = tag.text();
                if other.tags().iter().any(|t| t.text() == text) {
                    return Err(BuildFault::DuplicateTag(text));
                }
            }
        }
        Ok(())
    }
}

/// Fluent handle configuring one spec of a [`Registry`].
///
/// Holds the registry plus the index of its spec, so every method only
/// touches that spec. Dropping it without calling [`end`](Self::end)
/// withdraws the spec, so the registry never holds unvalidated specs.
#[must_use = "call `end()` to validate the spec"]
pub struct Configurator<'r, 'a> {
    // `None` only once `end()` has taken the registry back.
    registry: Option<&'r mut Registry<'a>>,
    index: usize,
    fault: Option<BuildFault>,
}

impl<'r, 'a> Configurator<'r, 'a> {
    fn spec(&mut self) -> &mut ArgSpec<'a> {
        let registry = self
            .registry
            .as_deref_mut()
            .expect("configurator used after end()");
        &mut registry.specs[self.index]
    }

    /// Add a tag with the default `-` prefix that sets the state to `true`.
    pub fn flag(self, tag: impl Into<String>) -> Self {
        self.toggle_with_prefix(true, tag, DEFAULT_PREFIX)
    }

    pub fn flag_with_prefix(self, tag: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.toggle_with_prefix(true, tag, prefix)
    }

    /// Add a tag with the default `-` prefix that sets the state to `value`.
    pub fn toggle(self, value: bool, tag: impl Into<String>) -> Self {
        self.toggle_with_prefix(value, tag, DEFAULT_PREFIX)
    }

    pub fn toggle_with_prefix(
        mut self,
        value: bool,
        tag: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.spec().insert_tag(Tag::new(tag, prefix, value));
        self
    }

    /// Number of tokens consumed after the tag (or at the claim, for positionals).
    pub fn consume(mut self, n: usize) -> Self {
        self.spec().consumed_args = n;
        self
    }

    /// Like [`consume`](Self::consume), restricting every value to `allowed`.
    pub fn consume_with<I, S>(mut self, n: usize, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.spec();
        spec.consumed_args = n;
        spec.allowed_values = allowed.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.spec().required = true;
        self
    }

    /// Allow repeated occurrences; values accumulate in encounter order.
    pub fn multiple(mut self) -> Self {
        if self.spec().repeat == Repeat::Overwrite {
            self.fault = Some(BuildFault::MultipleWithOver);
        } else {
            self.spec().repeat = Repeat::Append;
        }
        self
    }

    /// Stop evaluation as soon as this spec appears anywhere in the input.
    pub fn abort(mut self) -> Self {
        self.spec().abort = true;
        self
    }

    /// Allow repeated occurrences; each one replaces the previous values.
    ///
    /// Implies `multiple` for repeat handling.
    pub fn over(mut self) -> Self {
        if self.spec().repeat == Repeat::Append {
            self.fault = Some(BuildFault::MultipleWithOver);
        } else {
            self.spec().repeat = Repeat::Overwrite;
        }
        self
    }

    /// Seed the initial state (`bool`) or values (string or list).
    ///
    /// Seeded values are replaced, not appended to, once the spec consumes
    /// real values.
    pub fn initial(mut self, initial: impl Into<Initial>) -> Self {
        match initial.into() {
            Initial::State(state) => self.spec().default_toggle = state,
            Initial::Values(values) => self.spec().default_values = values,
        }
        self
    }

    /// Callback invoked with each accepted value.
    pub fn action(mut self, action: impl Fn(&str) + 'a) -> Self {
        self.spec().action = Some(Box::new(action));
        self
    }

    /// Validate the spec and hand the registry back for further declarations.
    ///
    /// On failure the spec is removed from the registry.
    pub fn end(mut self) -> Result<&'r mut Registry<'a>> {
        let index = self.index;
        let fault = self.fault.take();
        let registry = self
            .registry
            .take()
            .expect("configurator used after end()");

        let outcome = match fault {
            Some(fault) => Err(fault),
            None => registry.check(index),
        };

        match outcome {
            Ok(()) => Ok(registry),
            Err(fault) => {
                let spec = registry.specs.remove(index);
                Err(Error::InvalidBuilding {
                    id: spec.id,
                    fault,
                })
            }
        }
    }
}

impl Drop for Configurator<'_, '_> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take() {
            let spec = registry.specs.remove(self.index);
            tracing::debug!(id = spec.id(), "spec dropped without end(), withdrawn");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn start_appends_in_declaration_order() {
        let mut reg = Registry::new();
        reg.start("a")
            .flag("a")
            .end()
            .unwrap()
            .start("b")
            .end()
            .unwrap();
        let ids: Vec<&str> = reg.specs().iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(reg.get("b").unwrap().is_positional());
    }

    #[test]
    fn configurator_sets_every_field() {
        let mut reg = Registry::new();
        reg.start("mode")
            .flag("m")
            .toggle_with_prefix(false, "no-mode", "--")
            .consume_with(1, ["fast", "slow"])
            .required()
            .initial(true)
            .initial("fast")
            .end()
            .unwrap();

        let spec = reg.get("mode").unwrap();
        assert_eq!(spec.tags().len(), 2);
        assert_eq!(spec.tags()[1].text(), "--no-mode");
        assert!(!spec.tags()[1].toggle());
        assert_eq!(spec.consumed_args(), 1);
        assert_eq!(spec.allowed_values(), ["fast", "slow"]);
        assert!(spec.is_required());
        assert!(spec.default_toggle());
        assert_eq!(spec.default_values(), ["fast"]);
        assert!(!spec.is_multiple());
    }

    #[test]
    fn over_implies_multiple() {
        let mut reg = Registry::new();
        reg.start("level").flag("l").consume(1).over().end().unwrap();
        let spec = reg.get("level").unwrap();
        assert!(spec.is_multiple());
        assert!(spec.is_overwritable());
    }

    #[test]
    fn multiple_and_over_conflict() {
        let mut reg = Registry::new();
        let err = reg.start("x").flag("x").multiple().over().end().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBuilding {
                id: "x".into(),
                fault: BuildFault::MultipleWithOver
            }
        );

        let err = reg.start("y").flag("y").over().multiple().end().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBuilding);
        assert!(reg.is_empty());
    }

    #[test]
    fn greedy_positional_with_arity_is_rejected() {
        let mut reg = Registry::new();
        let err = reg.start("files").multiple().consume(2).end().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBuilding {
                id: "files".into(),
                fault: BuildFault::GreedyWithArity
            }
        );
        assert!(reg.get("files").is_none());

        // Tagged specs may combine both.
        reg.start("pair").flag("p").multiple().consume(2).end().unwrap();
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut reg = Registry::new();
        reg.start("x").flag("x").end().unwrap();
        let err = reg.start("x").flag("y").end().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBuilding {
                id: "x".into(),
                fault: BuildFault::DuplicateId
            }
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unfinished_spec_is_withdrawn() {
        let mut reg = Registry::new();
        reg.start("a").flag("x").end().unwrap();
        let _ = reg.start("a").flag("x");
        assert_eq!(reg.len(), 1);

        {
            let _pending = reg.start("files").multiple().consume(2);
        }
        assert_eq!(reg.len(), 1);
        assert!(reg.get("files").is_none());

        let eval = reg.evaluate(["-x"]).unwrap();
        assert!(eval.state("a"));
        assert!(reg.evaluate(["-x", "-x"]).is_err());
    }

    #[test]
    fn duplicate_tag_text_is_rejected() {
        let mut reg = Registry::new();
        reg.start("a").flag_with_prefix("in", "-").end().unwrap();
        let err = reg.start("b").flag_with_prefix("n", "-i").end().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBuilding {
                id: "b".into(),
                fault: BuildFault::DuplicateTag("-in".into())
            }
        );
    }
}
