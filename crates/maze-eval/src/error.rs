//! Runtime faults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fatal run-time error. Aborts the current run only; the world and the
/// session stay usable for a fresh run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    /// A name was read before any assignment to it ran.
    #[error("line {line}: name '{name}' is not defined")]
    UndefinedVariable { name: String, line: u32 },

    #[error("line {line}: integer division or modulo by zero")]
    DivisionByZero { line: u32 },

    #[error("line {line}: integer overflow")]
    IntegerOverflow { line: u32 },

    /// The statement governor tripped.
    #[error("line {line}: exceeded {limit} statements")]
    StatementLimitExceeded { limit: u64, line: u32 },

    /// The wall-clock governor tripped.
    #[error("line {line}: exceeded the time limit of {limit_ms} ms")]
    TimeLimitExceeded { limit_ms: u64, line: u32 },

    /// The executor reached a state it should never be in.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Fault {
    /// The 1-based source line, when the fault has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Fault::UndefinedVariable { line, .. }
            | Fault::DivisionByZero { line }
            | Fault::IntegerOverflow { line }
            | Fault::StatementLimitExceeded { line, .. }
            | Fault::TimeLimitExceeded { line, .. } => Some(*line),
            Fault::Internal { .. } => None,
        }
    }

    /// Whether a governor interrupted the run, as opposed to an error in
    /// the program's own logic.
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            Fault::StatementLimitExceeded { .. } | Fault::TimeLimitExceeded { .. }
        )
    }
}

/// Result alias for evaluation and execution.
pub type EvalResult<T> = Result<T, Fault>;
