//! Maze lexer: normalises program text and converts it into a token stream.

pub mod lexer;
pub mod preprocess;
pub mod token;

pub use lexer::{LexResult, Lexer};
pub use preprocess::{format_line_list, normalize_source, SourceNote, INDENT_SPACES};
pub use token::{Token, TokenKind, ALL_KEYWORDS};
