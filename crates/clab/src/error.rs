//! Error taxonomy for building and evaluating argument specs.

use std::fmt;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structural problem detected when a spec is finalized with `end()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFault {
    /// A positional spec declares both `multiple` and a fixed arity.
    GreedyWithArity,
    /// A spec declares both `multiple()` and `over()`.
    MultipleWithOver,
    /// Another spec already uses this id.
    DuplicateId,
    /// Another spec already declares this tag text (`prefix ++ name`).
    DuplicateTag(String),
}

impl fmt::Display for BuildFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreedyWithArity => {
                write!(f, "positional cannot be 'multiple' and consume a fixed count")
            }
            Self::MultipleWithOver => write!(f, "cannot be 'multiple' and 'over' at the same time"),
            Self::DuplicateId => write!(f, "id is already declared"),
            Self::DuplicateTag(tag) => write!(f, "tag '{tag}' is already declared"),
        }
    }
}

/// Errors raised while building a [`Registry`](crate::Registry) or evaluating tokens.
///
/// Messages identify the offending id and token; they are not meant as
/// finished user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid spec '{id}': {fault}")]
    InvalidBuilding { id: String, fault: BuildFault },

    #[error("required argument '{id}' is missing")]
    MissingArgument { id: String },

    #[error("argument '{id}' expects {expected} value(s), found {found}")]
    MissingValue {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid value '{value}' for '{id}'. possible values: {}", .allowed.join(", "))]
    InvalidValue {
        id: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unexpected argument '{token}'")]
    UnexpectedArgument { token: String },

    #[error("argument '{id}' cannot be used multiple times (found '{token}' again)")]
    RedundantArgument { id: String, token: String },

    #[error("argument '{id}' expected a value but found tag '{token}'")]
    TokenMismatch { id: String, token: String },
}

/// Fieldless view of [`Error`] for matching on the taxonomy alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidBuilding,
    MissingArgument,
    MissingValue,
    InvalidValue,
    UnexpectedArgument,
    RedundantArgument,
    TokenMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBuilding { .. } => ErrorKind::InvalidBuilding,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::MissingValue { .. } => ErrorKind::MissingValue,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            Self::RedundantArgument { .. } => ErrorKind::RedundantArgument,
            Self::TokenMismatch { .. } => ErrorKind::TokenMismatch,
        }
    }

    /// The spec id the error refers to, if any.
    ///
    /// `UnexpectedArgument` has no owning spec and returns `None`.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::InvalidBuilding { id, .. }
            | Self::MissingArgument { id }
            | Self::MissingValue { id, .. }
            | Self::InvalidValue { id, .. }
            | Self::RedundantArgument { id, .. }
            | Self::TokenMismatch { id, .. } => Some(id.as_str()),
            Self::UnexpectedArgument { .. } => None,
        }
    }

    /// Whether the error was raised by `end()` rather than by evaluation.
    pub fn is_build_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidBuilding
    }
}
