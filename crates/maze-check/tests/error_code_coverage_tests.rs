//! Error code coverage: every code a program text can trigger has a test
//! asserting it is emitted through the public compile entry point.
//!
//! E205 is not listed: the parser always yields a module for text that
//! lexes and parses, so it cannot be reached from source.

use maze_check::{check, LanguageConfig};
use maze_types::{CompileErrors, ErrorCode};

fn classic(source: &str) -> CompileErrors {
    check(source, "test.py", &LanguageConfig::classic())
}

fn extended(source: &str) -> CompileErrors {
    check(source, "test.py", &LanguageConfig::extended())
}

fn assert_code(errors: CompileErrors, expected: ErrorCode) {
    assert!(
        errors.contains(expected),
        "expected {expected}, got: {:?}",
        errors
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// E1xx: syntax (lexer and parser)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e100_unexpected_token() {
    assert_code(classic("if path_ahead()\n    move()\n"), ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn e101_unterminated_string() {
    assert_code(classic("x = 'open\n"), ErrorCode::UNTERMINATED_STRING);
}

#[test]
fn e102_unexpected_character() {
    assert_code(classic("move() $\n"), ErrorCode::UNEXPECTED_CHARACTER);
}

#[test]
fn e103_inconsistent_dedent() {
    assert_code(
        classic("while True:\n        move()\n    turn_left()\n"),
        ErrorCode::INCONSISTENT_DEDENT,
    );
}

#[test]
fn e104_unexpected_indent() {
    assert_code(classic("move()\n    move()\n"), ErrorCode::UNEXPECTED_INDENT);
}

#[test]
fn e105_expected_indented_block() {
    assert_code(classic("while True:\nmove()\n"), ErrorCode::EXPECTED_INDENTED_BLOCK);
}

#[test]
fn e106_unclosed_bracket() {
    assert_code(classic("move(\n"), ErrorCode::UNCLOSED_BRACKET);
}

#[test]
fn e107_structural_limit() {
    let source = format!("x = {}1{}\n", "(".repeat(100), ")".repeat(100));
    assert_code(extended(&source), ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);
}

// ══════════════════════════════════════════════════════════════════════════════
// E2xx: statements
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e200_disallowed_statement() {
    assert_code(classic("import random\n"), ErrorCode::DISALLOWED_STATEMENT);
}

#[test]
fn e201_disallowed_expression() {
    assert_code(classic("if {1: 2}:\n    move()\n"), ErrorCode::DISALLOWED_EXPRESSION);
}

#[test]
fn e202_variables_disabled() {
    assert_code(classic("steps += 1\n"), ErrorCode::VARIABLES_DISABLED);
}

#[test]
fn e203_invalid_assignment_target() {
    assert_code(extended("robot.x = 1\n"), ErrorCode::INVALID_ASSIGNMENT_TARGET);
}

#[test]
fn e204_undefined_name() {
    assert_code(extended("if ghost:\n    move()\n"), ErrorCode::UNDEFINED_NAME);
}

// ══════════════════════════════════════════════════════════════════════════════
// E3xx: calls
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e300_unknown_function() {
    assert_code(classic("print('hi')\n"), ErrorCode::UNKNOWN_FUNCTION);
}

#[test]
fn e301_arguments_not_allowed() {
    assert_code(classic("turn_left(times=2)\n"), ErrorCode::ARGUMENTS_NOT_ALLOWED);
}

#[test]
fn e302_not_an_action() {
    assert_code(classic("at_goal()\n"), ErrorCode::NOT_AN_ACTION);
}

#[test]
fn e303_action_in_expression() {
    assert_code(
        classic("while not turn_left():\n    pass\n"),
        ErrorCode::ACTION_IN_EXPRESSION,
    );
}

#[test]
fn e304_range_outside_for() {
    assert_code(classic("if range(3):\n    move()\n"), ErrorCode::RANGE_OUTSIDE_FOR);
}

#[test]
fn e305_invalid_call_target() {
    assert_code(classic("robot.move()\n"), ErrorCode::INVALID_CALL_TARGET);
}

// ══════════════════════════════════════════════════════════════════════════════
// E4xx: loops
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e400_for_requires_range() {
    assert_code(classic("for c in 'abc':\n    move()\n"), ErrorCode::FOR_REQUIRES_RANGE);
}

#[test]
fn e401_invalid_range_arguments() {
    assert_code(
        extended("n = 3\nfor i in range(n):\n    move()\n"),
        ErrorCode::INVALID_RANGE_ARGUMENTS,
    );
}

#[test]
fn e402_invalid_loop_target() {
    assert_code(
        classic("for a.b in range(3):\n    move()\n"),
        ErrorCode::INVALID_LOOP_TARGET,
    );
}

#[test]
fn e403_for_else_not_allowed() {
    assert_code(
        classic("for i in range(3):\n    move()\nelse:\n    turn_left()\n"),
        ErrorCode::FOR_ELSE_NOT_ALLOWED,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// E5xx: expressions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e500_chained_comparison() {
    assert_code(
        extended("a = 1\nif 0 < a < 2:\n    move()\n"),
        ErrorCode::CHAINED_COMPARISON,
    );
}

#[test]
fn e501_disallowed_operator() {
    assert_code(extended("a = 2 ** 8\n"), ErrorCode::DISALLOWED_OPERATOR);
}

// ══════════════════════════════════════════════════════════════════════════════
// E6xx: literals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e600_disallowed_literal() {
    assert_code(extended("a = 'left'\n"), ErrorCode::DISALLOWED_LITERAL);
}

#[test]
fn e601_integer_too_large() {
    assert_code(
        extended("a = 99999999999999999999\n"),
        ErrorCode::INTEGER_TOO_LARGE,
    );
}
