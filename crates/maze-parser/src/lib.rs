//! Maze parser: converts a token stream into the raw syntax tree.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser, MAX_BLOCK_DEPTH, MAX_EXPR_DEPTH};

use maze_lexer::Lexer;
use maze_types::SourceFile;

/// Lex and parse `source_file` in one go. A lex error is reported as the
/// parse error and no tree is produced.
pub fn parse(source_file: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source_file).lex();
    if lexed.errors.has_errors() {
        return ParseResult {
            module: None,
            errors: lexed.errors,
        };
    }
    Parser::new(lexed.tokens, source_file).parse()
}
