//! Declarative command line argument specs and single-pass evaluation.
//!
//! Declare every argument up front on a [`Registry`]: tagged flags (`-i`,
//! `--input`) and untagged positionals, each with an arity, defaults, an
//! allowed-value set and required/multiple/abort/over semantics. Then call
//! [`Registry::evaluate`] once with the token list and read the outcome from
//! the returned [`Evaluation`].
//!
//! Matching is exact: a token is a tag only if it equals `prefix ++ name` of
//! some declared tag. There is no abbreviation, no `--opt=value` and no
//! combined short flags.
//!
//! # Example
//!
//! ```
//! use clab::{Error, Registry};
//!
//! # fn main() -> Result<(), Error> {
//! let mut args = Registry::new();
//! args.start("input")
//!     .flag("i")
//!     .flag_with_prefix("input", "--")
//!     .consume(1)
//!     .required()
//!     .end()?
//!     .start("output")
//!     .flag("o")
//!     .flag_with_prefix("output", "--")
//!     .consume(1)
//!     .initial("a.out")
//!     .end()?
//!     .start("help")
//!     .flag("h")
//!     .flag_with_prefix("help", "--")
//!     .abort()
//!     .end()?;
//!
//! let eval = args.evaluate(["-i", "in.txt"])?;
//! assert_eq!(eval.value("input"), Some("in.txt"));
//! assert_eq!(eval.value("output"), Some("a.out"));
//! assert!(!eval.aborted());
//!
//! let eval = args.evaluate(["--help"])?;
//! assert_eq!(eval.aborted_id(), Some("help"));
//!
//! let err = args.evaluate(Vec::<String>::new()).unwrap_err();
//! assert_eq!(err, Error::MissingArgument { id: "input".into() });
//! # Ok(())
//! # }
//! ```

mod error;
mod evaluation;
mod evaluator;
mod matcher;
mod registry;
mod spec;

pub use error::{BuildFault, Error, ErrorKind, Result};
pub use evaluation::{Entry, Evaluation};
pub use matcher::{TagMatch, TagMatcher};
pub use registry::{Configurator, Registry};
pub use spec::{Action, ArgSpec, DEFAULT_PREFIX, Initial, Repeat, Tag};
