use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before further ones are only counted.
pub const MAX_ERRORS: usize = 20;

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Statement,
    Call,
    Loop,
    Expression,
    Literal,
}

impl ErrorCategory {
    /// Syntax errors come from the lexer/parser; everything else from the
    /// validator.
    pub fn is_syntax(self) -> bool {
        self == Self::Syntax
    }
}

/// Numeric error code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const UNEXPECTED_CHARACTER: Self = Self(102);
    pub const INCONSISTENT_DEDENT: Self = Self(103);
    pub const UNEXPECTED_INDENT: Self = Self(104);
    pub const EXPECTED_INDENTED_BLOCK: Self = Self(105);
    pub const UNCLOSED_BRACKET: Self = Self(106);
    pub const STRUCTURAL_LIMIT_EXCEEDED: Self = Self(107);

    // ── Statement errors (E200–E299) ──
    pub const DISALLOWED_STATEMENT: Self = Self(200);
    pub const DISALLOWED_EXPRESSION: Self = Self(201);
    pub const VARIABLES_DISABLED: Self = Self(202);
    pub const INVALID_ASSIGNMENT_TARGET: Self = Self(203);
    pub const UNDEFINED_NAME: Self = Self(204);
    pub const NOT_A_MODULE: Self = Self(205);

    // ── Call errors (E300–E399) ──
    pub const UNKNOWN_FUNCTION: Self = Self(300);
    pub const ARGUMENTS_NOT_ALLOWED: Self = Self(301);
    pub const NOT_AN_ACTION: Self = Self(302);
    pub const ACTION_IN_EXPRESSION: Self = Self(303);
    pub const RANGE_OUTSIDE_FOR: Self = Self(304);
    pub const INVALID_CALL_TARGET: Self = Self(305);

    // ── Loop errors (E400–E499) ──
    pub const FOR_REQUIRES_RANGE: Self = Self(400);
    pub const INVALID_RANGE_ARGUMENTS: Self = Self(401);
    pub const INVALID_LOOP_TARGET: Self = Self(402);
    pub const FOR_ELSE_NOT_ALLOWED: Self = Self(403);

    // ── Expression errors (E500–E599) ──
    pub const CHAINED_COMPARISON: Self = Self(500);
    pub const DISALLOWED_OPERATOR: Self = Self(501);

    // ── Literal errors (E600–E699) ──
    pub const DISALLOWED_LITERAL: Self = Self(600);
    pub const INTEGER_TOO_LARGE: Self = Self(601);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Statement,
            300..=399 => ErrorCategory::Call,
            400..=499 => ErrorCategory::Loop,
            500..=599 => ErrorCategory::Expression,
            600..=699 => ErrorCategory::Literal,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured diagnostic produced while compiling a maze program.
///
/// Hosts render these directly; they never need to parse free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E300).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl MazeError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// The 1-based line of the offending node.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for MazeError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Statement => write!(f, "statement"),
            Self::Call => write!(f, "call"),
            Self::Loop => write!(f, "loop"),
            Self::Expression => write!(f, "expression"),
            Self::Literal => write!(f, "literal"),
        }
    }
}

/// The structured output of a failed compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<MazeError>,
    pub warnings: Vec<MazeError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: MazeError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: MazeError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// The first reported error, in source order of discovery.
    pub fn first(&self) -> Option<&MazeError> {
        self.errors.first()
    }

    /// Whether any stored error carries `code`.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        let hidden = self.total_errors.saturating_sub(self.errors.len());
        if hidden > 0 {
            write!(f, "\n... and {hidden} more")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

impl From<MazeError> for CompileErrors {
    fn from(error: MazeError) -> Self {
        let mut errors = Self::empty();
        errors.push_error(error);
        errors
    }
}
