//! Indentation-aware lexer for the maze language.
//!
//! Features:
//! - Python layout rules: `Indent` / `Dedent` from an indentation stack,
//!   `Newline` at the end of each logical line
//! - Blank and comment-only lines never produce layout tokens
//! - Implicit line joining inside `()`, `[]`, `{}` and explicit joining with `\`
//! - String literals with prefixes and triple quotes, int/float/hex literals
//! - Stops at the first error: a layout grammar has no reliable resync point

use maze_types::ast::BinOp;
use maze_types::{CompileErrors, ErrorCode, MazeError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// Columns a tab advances to when it survived normalisation.
const TAB_WIDTH: u32 = 4;

/// What the start of a physical line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStart {
    /// Only whitespace and/or a comment; consumed entirely.
    Blank,
    /// The line carries tokens; indentation has been resolved.
    Content,
}

/// The maze-language lexer.
///
/// Converts source text into a vector of [`Token`]s. The stream always ends
/// with `Newline`, matching `Dedent`s and [`TokenKind::Eof`] when lexing
/// succeeds.
pub struct Lexer<'src> {
    /// Source characters.
    chars: Vec<char>,
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current index into `chars`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Open indentation levels; the bottom entry is always 0.
    indents: Vec<u32>,
    /// Open brackets with the span of the opener.
    brackets: Vec<(char, Span)>,
    /// Whether the next character begins a physical line.
    at_line_start: bool,
    /// Tokens produced so far.
    tokens: Vec<Token>,
    /// Collected errors (at most one).
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            chars: source_file.source.chars().collect(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            indents: vec![0],
            brackets: Vec::new(),
            at_line_start: true,
            tokens: Vec::new(),
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        while !self.errors.has_errors() {
            if self.at_line_start {
                self.at_line_start = false;
                if self.brackets.is_empty() && self.scan_indentation() == LineStart::Blank {
                    self.at_line_start = true;
                    continue;
                }
            }

            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                self.finish();
                break;
            };

            match ch {
                '#' => self.skip_comment(),
                '\n' => self.scan_newline(),
                '\\' => self.scan_continuation(),
                _ => self.scan_token(ch),
            }
        }

        let eof_span = self.current_span();
        self.tokens.push(Token::new(TokenKind::Eof, eof_span));

        LexResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = MazeError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = MazeError::new(&self.source_file.name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────

    /// Measure the indentation of a physical line and emit `Indent` /
    /// `Dedent` tokens against the indentation stack.
    fn scan_indentation(&mut self) -> LineStart {
        let mut width: u32 = 0;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                '\x0c' => width = 0,
                '\r' => {}
                _ => break,
            }
            self.advance();
        }

        match self.peek() {
            None => return LineStart::Content,
            Some('#') => {
                self.skip_comment();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                return LineStart::Blank;
            }
            Some('\n') => {
                self.advance();
                return LineStart::Blank;
            }
            Some(_) => {}
        }

        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            let span = Span::new(self.line, 1, self.line, width.max(1));
            self.push(TokenKind::Indent, span);
        } else if width < current {
            while self.indents.last().is_some_and(|&level| level > width) {
                self.indents.pop();
                let span = self.current_span();
                self.push(TokenKind::Dedent, span);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                let span = Span::new(self.line, 1, self.line, width.max(1));
                self.emit_error_with_suggestion(
                    ErrorCode::INCONSISTENT_DEDENT,
                    "unindent does not match any outer indentation level",
                    span,
                    "unindent back to the exact column where the matching block starts",
                );
            }
        }
        LineStart::Content
    }

    /// End of a physical line.
    fn scan_newline(&mut self) {
        let start = self.current_span();
        self.advance();
        if self.brackets.is_empty() {
            self.push(TokenKind::Newline, start);
            self.at_line_start = true;
        }
    }

    /// `\` joins the next physical line onto this one.
    fn scan_continuation(&mut self) {
        let start = self.current_span();
        self.advance();
        if self.peek() == Some('\r') {
            self.advance();
        }
        match self.peek() {
            Some('\n') => {
                self.advance();
            }
            None => self.emit_error(
                ErrorCode::UNEXPECTED_TOKEN,
                "unexpected end of file after line continuation",
                start,
            ),
            Some(_) => self.emit_error(
                ErrorCode::UNEXPECTED_CHARACTER,
                "unexpected character after line continuation character",
                start,
            ),
        }
    }

    /// Close the stream: pending `Newline`, then one `Dedent` per open level.
    fn finish(&mut self) {
        if let Some(&(open, span)) = self.brackets.last() {
            self.emit_error(
                ErrorCode::UNCLOSED_BRACKET,
                format!("'{open}' was never closed"),
                span,
            );
            return;
        }

        let span = self.current_span();
        let needs_newline = self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Dedent));
        if needs_newline {
            self.push(TokenKind::Newline, span);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, span);
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip intra-line whitespace (NOT newlines; those are tokens).
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if matches!(ch, ' ' | '\t' | '\r' | '\x0c') {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a `#` comment up to (not including) the newline.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self, ch: char) {
        let start_line = self.line;
        let start_col = self.col;

        if is_ident_start(ch) {
            self.scan_identifier(start_line, start_col);
        } else if ch.is_ascii_digit() || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())) {
            self.scan_number(start_line, start_col);
        } else if ch == '"' || ch == '\'' {
            self.scan_string(start_line, start_col, false);
        } else {
            self.scan_operator(ch, start_line, start_col);
        }
    }

    fn scan_identifier(&mut self, start_line: u32, start_col: u32) {
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // String prefixes: r"..", b'..', f"..", rb"..", ...
        if matches!(self.peek(), Some('"' | '\'')) && is_string_prefix(&word) {
            let raw = word.contains(['r', 'R']);
            self.scan_string(start_line, start_col, raw);
            return;
        }

        let span = self.span_from(start_line, start_col);
        let kind = TokenKind::from_keyword(&word).unwrap_or(TokenKind::Identifier(word));
        self.push(kind, span);
    }

    fn scan_number(&mut self, start_line: u32, start_col: u32) {
        let radix = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let kind = if let Some(radix) = radix {
            self.advance();
            self.advance();
            let digits = self.take_digits(|c| c.is_digit(radix));
            if digits.is_empty() {
                let span = self.span_from(start_line, start_col);
                self.emit_error(ErrorCode::UNEXPECTED_TOKEN, "invalid integer literal", span);
                return;
            }
            TokenKind::Int(saturating_parse(&digits, radix))
        } else {
            let mut text = self.take_digits(|c| c.is_ascii_digit());
            let mut is_float = false;
            if self.peek() == Some('.') {
                is_float = true;
                self.advance();
                text.push('.');
                text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let signed = matches!(self.peek_at(1), Some('+' | '-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    text.push('e');
                    self.advance();
                    if signed {
                        if let Some(sign) = self.advance() {
                            text.push(sign);
                        }
                    }
                    text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
                }
            }
            if matches!(self.peek(), Some('j' | 'J')) {
                is_float = true;
                self.advance();
            }
            if is_float {
                TokenKind::Float(text.parse().unwrap_or(f64::INFINITY))
            } else {
                TokenKind::Int(saturating_parse(&text, 10))
            }
        };

        if self.peek().is_some_and(is_ident_continue) {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance();
            }
            let span = self.span_from(start_line, start_col);
            self.emit_error(ErrorCode::UNEXPECTED_TOKEN, "invalid numeric literal", span);
            return;
        }

        let span = self.span_from(start_line, start_col);
        self.push(kind, span);
    }

    /// Consume digits (with `_` separators) accepted by `accept`.
    fn take_digits(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if accept(ch) {
                digits.push(ch);
            } else if ch != '_' || !self.peek_at(1).is_some_and(&accept) {
                break;
            }
            self.advance();
        }
        digits
    }

    fn scan_string(&mut self, start_line: u32, start_col: u32, raw: bool) {
        let Some(quote) = self.advance() else {
            return;
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }

        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    let span = Span::point(start_line, start_col);
                    let message = if triple {
                        "unterminated triple-quoted string literal"
                    } else {
                        "unterminated string literal"
                    };
                    self.emit_error(ErrorCode::UNTERMINATED_STRING, message, span);
                    return;
                }
                Some('\n') if !triple => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                        format!("close the string with {quote}"),
                    );
                    return;
                }
                Some('\\') => {
                    self.advance();
                    let Some(escaped) = self.advance() else {
                        continue;
                    };
                    if raw {
                        value.push('\\');
                        value.push(escaped);
                        continue;
                    }
                    match escaped {
                        '\n' => {}
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' | '\'' | '"' => value.push(escaped),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                Some(ch) if ch == quote => {
                    if !triple {
                        self.advance();
                        break;
                    }
                    if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                        self.advance();
                        self.advance();
                        self.advance();
                        break;
                    }
                    value.push(ch);
                    self.advance();
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        let span = self.span_from(start_line, start_col);
        self.push(TokenKind::Str(value), span);
    }

    fn scan_operator(&mut self, ch: char, start_line: u32, start_col: u32) {
        let next = self.peek_at(1);
        let third = self.peek_at(2);

        let (len, kind) = match ch {
            '+' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::Add)),
            '+' => (1, TokenKind::Plus),
            '-' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::Sub)),
            '-' if next == Some('>') => (2, TokenKind::Arrow),
            '-' => (1, TokenKind::Minus),
            '*' if next == Some('*') && third == Some('=') => (3, TokenKind::AugAssign(BinOp::Pow)),
            '*' if next == Some('*') => (2, TokenKind::DoubleStar),
            '*' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::Mul)),
            '*' => (1, TokenKind::Star),
            '/' if next == Some('/') && third == Some('=') => {
                (3, TokenKind::AugAssign(BinOp::FloorDiv))
            }
            '/' if next == Some('/') => (2, TokenKind::DoubleSlash),
            '/' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::Div)),
            '/' => (1, TokenKind::Slash),
            '%' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::Mod)),
            '%' => (1, TokenKind::Percent),
            '@' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::MatMul)),
            '@' => (1, TokenKind::At),
            '&' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::BitAnd)),
            '&' => (1, TokenKind::Amp),
            '|' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::BitOr)),
            '|' => (1, TokenKind::Pipe),
            '^' if next == Some('=') => (2, TokenKind::AugAssign(BinOp::BitXor)),
            '^' => (1, TokenKind::Caret),
            '~' => (1, TokenKind::Tilde),
            '<' if next == Some('<') && third == Some('=') => {
                (3, TokenKind::AugAssign(BinOp::LShift))
            }
            '<' if next == Some('<') => (2, TokenKind::LShift),
            '<' if next == Some('=') => (2, TokenKind::LessEq),
            '<' => (1, TokenKind::Less),
            '>' if next == Some('>') && third == Some('=') => {
                (3, TokenKind::AugAssign(BinOp::RShift))
            }
            '>' if next == Some('>') => (2, TokenKind::RShift),
            '>' if next == Some('=') => (2, TokenKind::GreaterEq),
            '>' => (1, TokenKind::Greater),
            '=' if next == Some('=') => (2, TokenKind::EqEq),
            '=' => (1, TokenKind::Eq),
            '!' if next == Some('=') => (2, TokenKind::BangEq),
            ':' if next == Some('=') => (2, TokenKind::ColonEq),
            ':' => (1, TokenKind::Colon),
            ',' => (1, TokenKind::Comma),
            ';' => (1, TokenKind::Semicolon),
            '.' => (1, TokenKind::Dot),
            '(' | '[' | '{' => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.brackets.push((ch, span));
                let kind = match ch {
                    '(' => TokenKind::LParen,
                    '[' => TokenKind::LBracket,
                    _ => TokenKind::LBrace,
                };
                self.push(kind, span);
                return;
            }
            ')' | ']' | '}' => {
                self.scan_closing_bracket(ch, start_line, start_col);
                return;
            }
            '!' => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.emit_error_with_suggestion(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    "unexpected character '!'",
                    span,
                    "use 'not' for boolean negation, or '!=' for inequality",
                );
                return;
            }
            other => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", other.escape_debug()),
                    span,
                );
                return;
            }
        };

        for _ in 0..len {
            self.advance();
        }
        let span = self.span_from(start_line, start_col);
        self.push(kind, span);
    }

    fn scan_closing_bracket(&mut self, close: char, start_line: u32, start_col: u32) {
        self.advance();
        let span = self.span_from(start_line, start_col);
        let expected_open = match close {
            ')' => '(',
            ']' => '[',
            _ => '{',
        };
        match self.brackets.pop() {
            Some((open, _)) if open == expected_open => {}
            Some((open, _)) => {
                self.emit_error(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("closing '{close}' does not match opening '{open}'"),
                    span,
                );
                return;
            }
            None => {
                self.emit_error(ErrorCode::UNEXPECTED_TOKEN, format!("unmatched '{close}'"), span);
                return;
            }
        }
        let kind = match close {
            ')' => TokenKind::RParen,
            ']' => TokenKind::RBracket,
            _ => TokenKind::RBrace,
        };
        self.push(kind, span);
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "r" | "b" | "u" | "f" | "br" | "rb" | "fr" | "rf"
    )
}

/// Parse digits in `radix`, saturating at `u64::MAX`.
fn saturating_parse(digits: &str, radix: u32) -> u64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .try_fold(0u64, |acc, d| {
            acc.checked_mul(u64::from(radix))?.checked_add(u64::from(d))
        })
        .unwrap_or(u64::MAX)
}
