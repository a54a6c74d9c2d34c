//! Single-pass evaluation of a token list against a registry.
//!
//! The pass runs in four steps:
//! 1. seed every spec's default state and values,
//! 2. scan all tokens for an abort tag and stop right there if one is found,
//! 3. walk the tokens left to right, dispatching each to its tagged spec or
//!    to the first positional able to claim it,
//! 4. report the first required spec (in declaration order) never seen.

use crate::error::{Error, Result};
use crate::evaluation::Evaluation;
use crate::matcher::{TagMatch, TagMatcher};
use crate::registry::Registry;
use crate::spec::ArgSpec;
use std::ffi::OsString;

impl<'a> Registry<'a> {
    /// Evaluate `tokens` (argv without the program name).
    ///
    /// Callbacks run synchronously in token order. On error no partial
    /// result is returned.
    pub fn evaluate<I, S>(&self, tokens: I) -> Result<Evaluation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        Evaluator::new(self.specs(), &tokens).run()
    }

    /// Evaluate a full argv whose first element is the program name.
    ///
    /// Non-UTF-8 arguments are converted lossily.
    pub fn evaluate_argv<I, S>(&self, argv: I) -> Result<Evaluation>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.evaluate(argv.into_iter().skip(1).map(|arg| {
            let arg: OsString = arg.into();
            arg.to_string_lossy().into_owned()
        }))
    }

    /// Evaluate the process arguments, skipping the program name.
    ///
    /// ```no_run
    /// let mut args = clab::Registry::new();
    /// args.start("verbose").flag("v").end()?;
    ///
    /// let eval = args.evaluate_env()?;
    /// if eval.state("verbose") {
    ///     eprintln!("verbose output enabled");
    /// }
    /// # Ok::<(), clab::Error>(())
    /// ```
    pub fn evaluate_env(&self) -> Result<Evaluation> {
        self.evaluate_argv(std::env::args_os())
    }
}

struct Evaluator<'r, 'a, 't> {
    specs: &'r [ArgSpec<'a>],
    tokens: &'t [String],
    matcher: TagMatcher,
    seen: Vec<bool>,
    out: Evaluation,
}

impl<'r, 'a, 't> Evaluator<'r, 'a, 't> {
    fn new(specs: &'r [ArgSpec<'a>], tokens: &'t [String]) -> Self {
        Self {
            specs,
            tokens,
            matcher: TagMatcher::new(specs),
            seen: vec![false; specs.len()],
            out: Evaluation::default(),
        }
    }

    fn run(mut self) -> Result<Evaluation> {
        tracing::debug!(
            specs = self.specs.len(),
            tokens = self.tokens.len(),
            "evaluating arguments"
        );

        self.seed();
        if self.abort_scan() {
            return Ok(self.out);
        }
        self.scan()?;
        self.validate()?;

        tracing::debug!("evaluation complete");
        Ok(self.out)
    }

    fn seed(&mut self) {
        for spec in self.specs {
            self.out.set_state(spec.id(), spec.default_toggle());
            for value in spec.default_values() {
                self.out.push_value(spec.id(), value.as_str());
            }
        }
    }

    fn abort_scan(&mut self) -> bool {
        let specs = self.specs;
        for token in self.tokens {
            let Some(hit) = self.matcher.find(token) else {
                continue;
            };
            let spec = &specs[hit.index];
            if !spec.is_abort() {
                continue;
            }
            tracing::debug!(id = spec.id(), token = token.as_str(), "evaluation aborted");
            self.out.set_aborted_by(spec.id());
            self.out.set_state(spec.id(), hit.toggle);
            spec.notify("");
            return true;
        }
        false
    }

    fn scan(&mut self) -> Result<()> {
        let mut cursor = 0;
        while cursor < self.tokens.len() {
            cursor = match self.matcher.find(&self.tokens[cursor]) {
                Some(hit) => self.tagged(cursor, hit)?,
                None => self.positional(cursor)?,
            };
        }
        Ok(())
    }

    /// Handle a tag token at `cursor`; returns the cursor past its values.
    fn tagged(&mut self, cursor: usize, hit: TagMatch) -> Result<usize> {
        let specs = self.specs;
        let tokens = self.tokens;
        let spec = &specs[hit.index];
        let token = &tokens[cursor];

        let first = !self.seen[hit.index];
        if !first && !spec.is_multiple() {
            return Err(Error::RedundantArgument {
                id: spec.id().to_string(),
                token: token.clone(),
            });
        }
        tracing::trace!(id = spec.id(), token = token.as_str(), "matched tag");

        if spec.consumed_args() > 0 && (first || spec.is_overwritable()) {
            self.out.clear_values(spec.id());
        }
        self.seen[hit.index] = true;
        self.out.set_state(spec.id(), hit.toggle);

        let start = cursor + 1;
        for taken in 0..spec.consumed_args() {
            let value = self.next_value(spec, start + taken, taken)?;
            self.accept(spec, value)?;
        }
        Ok(start + spec.consumed_args())
    }

    /// Hand the untagged token at `cursor` to the first positional able to
    /// claim it; returns the cursor past everything the claim consumed.
    fn positional(&mut self, cursor: usize) -> Result<usize> {
        let specs = self.specs;
        let tokens = self.tokens;

        let claim = specs
            .iter()
            .enumerate()
            .position(|(i, s)| s.is_positional() && (!self.seen[i] || s.is_multiple()));
        let Some(index) = claim else {
            return Err(Error::UnexpectedArgument {
                token: tokens[cursor].clone(),
            });
        };
        let spec = &specs[index];
        tracing::trace!(
            id = spec.id(),
            token = tokens[cursor].as_str(),
            "claimed by positional"
        );

        let first = !self.seen[index];
        self.seen[index] = true;
        self.out.set_state(spec.id(), true);
        if first || spec.is_overwritable() {
            self.out.clear_values(spec.id());
        }

        if spec.is_multiple() {
            // Greedy: everything up to the next tag token.
            let mut next = cursor;
            while let Some(value) = tokens.get(next) {
                if self.matcher.is_tag(value) {
                    break;
                }
                self.accept(spec, value)?;
                next += 1;
            }
            return Ok(next);
        }

        // A positional always takes at least the token that claimed it.
        let arity = spec.consumed_args().max(1);
        for taken in 0..arity {
            let value = self.next_value(spec, cursor + taken, taken)?;
            self.accept(spec, value)?;
        }
        Ok(cursor + arity)
    }

    /// Fetch the value slot at `at` for `spec`, `taken` values in.
    fn next_value(&self, spec: &ArgSpec<'_>, at: usize, taken: usize) -> Result<&'t str> {
        let tokens = self.tokens;
        let Some(value) = tokens.get(at) else {
            return Err(Error::MissingValue {
                id: spec.id().to_string(),
                expected: spec.consumed_args().max(taken + 1),
                found: taken,
            });
        };
        if self.matcher.is_tag(value) {
            return Err(Error::TokenMismatch {
                id: spec.id().to_string(),
                token: value.clone(),
            });
        }
        Ok(value.as_str())
    }

    fn accept(&mut self, spec: &ArgSpec<'_>, value: &str) -> Result<()> {
        if !spec.allows(value) {
            return Err(Error::InvalidValue {
                id: spec.id().to_string(),
                value: value.to_string(),
                allowed: spec.allowed_values().to_vec(),
            });
        }
        self.out.push_value(spec.id(), value);
        spec.notify(value);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let missing = self
            .specs
            .iter()
            .zip(&self.seen)
            .find(|(spec, seen)| spec.is_required() && !**seen);
        match missing {
            Some((spec, _)) => Err(Error::MissingArgument {
                id: spec.id().to_string(),
            }),
            None => Ok(()),
        }
    }
}
