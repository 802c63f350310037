//! Core parser infrastructure: token cursor, error reporting, helpers.

use maze_lexer::token::{Token, TokenKind};
use maze_types::ast::{Ident, Module};
use maze_types::{CompileErrors, ErrorCode, MazeError, SourceFile, Span};

/// Deepest expression nesting the parser accepts.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Deepest block (suite) nesting the parser accepts.
pub const MAX_BLOCK_DEPTH: u32 = 32;

/// The maze-language parser.
///
/// Consumes a token stream produced by the lexer and builds the raw syntax
/// tree. The grammar is a permissive superset of the maze language; anything
/// outside the language is left for the validator to reject. Parsing stops
/// at the first syntax error.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors (at most one).
    errors: CompileErrors,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
    /// Current suite nesting depth.
    pub(crate) block_depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    /// The syntax tree; `None` when parsing failed.
    pub module: Option<Module>,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            expr_depth: 0,
            block_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.look_ahead(0)
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token's span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns its span, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Span> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got {}", expected, self.describe_current()),
            );
            None
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance();
                Some(Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a name, got {}", self.describe_current()),
                );
                None
            }
        }
    }

    /// Expect the end of a logical line.
    pub(crate) fn expect_line_end(&mut self) -> Option<()> {
        if self.eat(&TokenKind::Newline) || self.at_end() {
            Some(())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected end of line, got {}", self.describe_current()),
            );
            None
        }
    }

    /// The current token, phrased for an error message.
    pub(crate) fn describe_current(&self) -> String {
        let kind = self.peek_kind();
        if kind.is_layout() {
            kind.to_string()
        } else {
            format!("'{kind}'")
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span. Only the first error is kept.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.push_error(self.make_error(code, message, span));
    }

    pub(crate) fn make_error(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> MazeError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        MazeError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn push_error(&mut self, error: MazeError) {
        if !self.errors.has_errors() {
            self.errors.push_error(error);
        }
    }

    // ── Nesting Limits ────────────────────────────────────────────────────────

    /// Enter one level of expression nesting.
    pub(crate) fn enter_expr(&mut self) -> Option<()> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                format!("expression is nested too deeply (limit is {MAX_EXPR_DEPTH})"),
            );
            self.expr_depth -= 1;
            return None;
        }
        Some(())
    }

    pub(crate) fn leave_expr(&mut self) {
        self.expr_depth = self.expr_depth.saturating_sub(1);
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Module`].
    pub fn parse(mut self) -> ParseResult {
        let module = self.parse_module();
        let module = if self.errors.has_errors() { None } else { module };
        ParseResult {
            module,
            errors: self.errors,
        }
    }
}
