//! Shared types for the maze language.
//!
//! This crate defines source spans, structured diagnostics, the raw syntax
//! tree produced by the parser and the validated program the executor runs.

mod error;
mod span;
pub mod ast;
pub mod program;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, MazeError, Severity, MAX_ERRORS};
pub use span::{SourceFile, Span};
