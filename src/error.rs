//! The error type shared by the environment, evaluator, and primitives.
//!
//! Reader errors are a separate type (see `reader::ReaderError`): a parse
//! failure is a string handed back to the REPL, never a `Result` that
//! propagates through `eval`. Only `read-string` crosses that boundary,
//! wrapping a `ReaderError` into `MalError::ReadError`.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MalError {
    #[error("'{0}' not found in the environment")]
    SymbolNotFound(String),

    #[error("{form}: expected {expected} argument(s), got {got}")]
    ArityError {
        form: String,
        expected: String,
        got: usize,
    },

    #[error("unexpected argument in {context}, expected {expected}, got {got}")]
    TypeError {
        context: String,
        expected: String,
        got: String,
    },

    #[error("cannot call {0} as a function")]
    NotCallable(String),

    #[error("expected a list or a vector of bindings, got {0}")]
    BadBindings(String),

    #[error("expected a list or a vector of symbols as parameters, got {0}")]
    BadParams(String),

    #[error("empty do block")]
    EmptyDo,

    #[error("{0}")]
    ReadError(String),

    #[error("{0}")]
    Io(String),
}

impl MalError {
    pub fn arity(form: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        MalError::ArityError {
            form: form.into(),
            expected: expected.into(),
            got,
        }
    }

    pub fn type_error(
        context: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        MalError::TypeError {
            context: context.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }
}
