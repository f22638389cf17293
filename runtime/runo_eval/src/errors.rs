//! Error kernel: the closed taxonomy of evaluation errors.
//!
//! Errors are ordinary values carried through every evaluator signature as
//! `Result`; nothing in the core panics or unwinds. Factory functions are the
//! preferred construction path so call sites stay terse and messages stay in
//! one place.

use thiserror::Error;

use crate::value::Value;

/// Result of evaluating an expression or statement.
pub type EvalResult = Result<Value, EvalError>;

/// An evaluation error.
///
/// `UnresolvedDriver` is the driver-namespace sibling of
/// `UnresolvedBinding`; `NotCallable` and `DivisionByZero` are specialized
/// type mismatches kept distinct for diagnostics.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("`{name}` is already bound in this scope")]
    DuplicateBinding { name: String },

    #[error("`{name}` is not bound in any enclosing scope")]
    UnresolvedBinding { name: String },

    #[error("`{name}` is not a registered driver")]
    UnresolvedDriver { name: String },

    #[error("expected {expected} but got {actual} in {context}")]
    TypeMismatch {
        expected: String,
        actual: String,
        context: String,
    },

    #[error("cannot apply {extra} extra argument(s) to a {type_name}")]
    NotCallable { type_name: String, extra: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("no case matches tag `{tag}`")]
    NonExhaustiveMatch { tag: String },

    #[error("cannot pattern match on a {type_name}")]
    NotMatchable { type_name: String },

    #[error("selector matched no bindings")]
    SelectionEmpty,

    #[error("invalid flow: {reason}")]
    InvalidFlow { reason: String },

    #[error("primitive `{name}` must declare an arity of at least 1")]
    InvalidPrimitive { name: String },

    #[error("{0}; {1}")]
    Composite(Box<EvalError>, Box<EvalError>),
}

impl EvalError {
    /// Aggregate two errors raised by independent sibling expressions.
    pub fn join(self, other: EvalError) -> EvalError {
        EvalError::Composite(Box::new(self), Box::new(other))
    }
}

// Factory functions

pub fn duplicate_binding(name: impl Into<String>) -> EvalError {
    EvalError::DuplicateBinding { name: name.into() }
}

pub fn unresolved_binding(name: impl Into<String>) -> EvalError {
    EvalError::UnresolvedBinding { name: name.into() }
}

pub fn unresolved_driver(name: impl Into<String>) -> EvalError {
    EvalError::UnresolvedDriver { name: name.into() }
}

pub fn type_mismatch(
    expected: impl Into<String>,
    actual: impl Into<String>,
    context: impl Into<String>,
) -> EvalError {
    EvalError::TypeMismatch {
        expected: expected.into(),
        actual: actual.into(),
        context: context.into(),
    }
}

pub fn not_callable(type_name: impl Into<String>, extra: usize) -> EvalError {
    EvalError::NotCallable {
        type_name: type_name.into(),
        extra,
    }
}

pub fn division_by_zero() -> EvalError {
    EvalError::DivisionByZero
}

pub fn non_exhaustive_match(tag: impl Into<String>) -> EvalError {
    EvalError::NonExhaustiveMatch { tag: tag.into() }
}

pub fn not_matchable(type_name: impl Into<String>) -> EvalError {
    EvalError::NotMatchable {
        type_name: type_name.into(),
    }
}

pub fn selection_empty() -> EvalError {
    EvalError::SelectionEmpty
}

pub fn invalid_flow(reason: impl Into<String>) -> EvalError {
    EvalError::InvalidFlow {
        reason: reason.into(),
    }
}

pub fn invalid_primitive(name: impl Into<String>) -> EvalError {
    EvalError::InvalidPrimitive { name: name.into() }
}
