//! Token types for the maze lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the Python-like surface
//! syntax (including the layout tokens `Newline`, `Indent` and `Dedent`) and
//! [`Token`], which pairs a kind with a source [`Span`].

use maze_types::ast::BinOp;
use maze_types::Span;
use std::fmt;

/// All reserved words recognised by the lexer.
///
/// Most of them are outside the maze language. They are still reserved so
/// the parser can build the corresponding node and the validator can reject
/// it with a precise message instead of a generic syntax error.
pub const ALL_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind of the surface syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Integer literal; saturates at `u64::MAX`.
    Int(u64),
    /// Float or imaginary literal: `1.5`, `2e3`, `3j`
    Float(f64),
    /// String or bytes literal, any quote style.
    Str(String),

    // ── Identifiers ──────────────────────────────────────────
    /// `move`, `steps`, `path_ahead`
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    False,
    None,
    True,
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,

    // ── Operators ────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    DoubleStar,
    /// `/`
    Slash,
    /// `//`
    DoubleSlash,
    /// `%`
    Percent,
    /// `@`
    At,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `:=`
    ColonEq,
    /// `+=`, `//=`, `<<=` ...
    AugAssign(BinOp),

    // ── Punctuation ──────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `->`
    Arrow,

    // ── Layout ───────────────────────────────────────────────
    /// End of a logical line.
    Newline,
    /// Indentation increased.
    Indent,
    /// Indentation decreased by one level.
    Dedent,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "False" => TokenKind::False,
            "None" => TokenKind::None,
            "True" => TokenKind::True,
            "and" => TokenKind::And,
            "as" => TokenKind::As,
            "assert" => TokenKind::Assert,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "break" => TokenKind::Break,
            "class" => TokenKind::Class,
            "continue" => TokenKind::Continue,
            "def" => TokenKind::Def,
            "del" => TokenKind::Del,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "except" => TokenKind::Except,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "from" => TokenKind::From,
            "global" => TokenKind::Global,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "is" => TokenKind::Is,
            "lambda" => TokenKind::Lambda,
            "nonlocal" => TokenKind::Nonlocal,
            "not" => TokenKind::Not,
            "or" => TokenKind::Or,
            "pass" => TokenKind::Pass,
            "raise" => TokenKind::Raise,
            "return" => TokenKind::Return,
            "try" => TokenKind::Try,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            "yield" => TokenKind::Yield,
            _ => return None,
        })
    }

    /// Returns `true` if this is a reserved word.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::False
                | TokenKind::None
                | TokenKind::True
                | TokenKind::And
                | TokenKind::As
                | TokenKind::Assert
                | TokenKind::Async
                | TokenKind::Await
                | TokenKind::Break
                | TokenKind::Class
                | TokenKind::Continue
                | TokenKind::Def
                | TokenKind::Del
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::Except
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::From
                | TokenKind::Global
                | TokenKind::If
                | TokenKind::Import
                | TokenKind::In
                | TokenKind::Is
                | TokenKind::Lambda
                | TokenKind::Nonlocal
                | TokenKind::Not
                | TokenKind::Or
                | TokenKind::Pass
                | TokenKind::Raise
                | TokenKind::Return
                | TokenKind::Try
                | TokenKind::While
                | TokenKind::With
                | TokenKind::Yield
        )
    }

    /// Layout tokens carry no source text.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Float(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "{s:?}"),
            TokenKind::Identifier(name) => f.write_str(name),

            TokenKind::False => f.write_str("False"),
            TokenKind::None => f.write_str("None"),
            TokenKind::True => f.write_str("True"),
            TokenKind::And => f.write_str("and"),
            TokenKind::As => f.write_str("as"),
            TokenKind::Assert => f.write_str("assert"),
            TokenKind::Async => f.write_str("async"),
            TokenKind::Await => f.write_str("await"),
            TokenKind::Break => f.write_str("break"),
            TokenKind::Class => f.write_str("class"),
            TokenKind::Continue => f.write_str("continue"),
            TokenKind::Def => f.write_str("def"),
            TokenKind::Del => f.write_str("del"),
            TokenKind::Elif => f.write_str("elif"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::Except => f.write_str("except"),
            TokenKind::Finally => f.write_str("finally"),
            TokenKind::For => f.write_str("for"),
            TokenKind::From => f.write_str("from"),
            TokenKind::Global => f.write_str("global"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Import => f.write_str("import"),
            TokenKind::In => f.write_str("in"),
            TokenKind::Is => f.write_str("is"),
            TokenKind::Lambda => f.write_str("lambda"),
            TokenKind::Nonlocal => f.write_str("nonlocal"),
            TokenKind::Not => f.write_str("not"),
            TokenKind::Or => f.write_str("or"),
            TokenKind::Pass => f.write_str("pass"),
            TokenKind::Raise => f.write_str("raise"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::Try => f.write_str("try"),
            TokenKind::While => f.write_str("while"),
            TokenKind::With => f.write_str("with"),
            TokenKind::Yield => f.write_str("yield"),

            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::DoubleStar => f.write_str("**"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::DoubleSlash => f.write_str("//"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::At => f.write_str("@"),
            TokenKind::LShift => f.write_str("<<"),
            TokenKind::RShift => f.write_str(">>"),
            TokenKind::Amp => f.write_str("&"),
            TokenKind::Pipe => f.write_str("|"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::Tilde => f.write_str("~"),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::ColonEq => f.write_str(":="),
            TokenKind::AugAssign(op) => write!(f, "{}=", op.as_str()),

            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Arrow => f.write_str("->"),

            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Indent => f.write_str("indent"),
            TokenKind::Dedent => f.write_str("dedent"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
