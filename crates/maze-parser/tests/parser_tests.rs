//! Parser tests.
//!
//! Covers:
//! 1. The maze language proper: calls, if/elif/else, while/else, for,
//!    assignments, operator precedence
//! 2. The permissive superset the validator later rejects (def, class,
//!    import, try, with, comprehensions, attribute access, ...)
//! 3. Indentation diagnostics and structural limits
//! 4. 100-iteration determinism

use maze_parser::{ParseResult, Parser, MAX_BLOCK_DEPTH, MAX_EXPR_DEPTH};
use maze_types::ast::*;
use maze_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse source and return the result (module + errors).
fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.py", source);
    maze_parser::parse(&sf)
}

/// Parse source and return the module, panicking if there are errors.
fn parse_ok(source: &str) -> Module {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.module.expect("no module returned")
}

/// Parse source and return the single error.
fn parse_err(source: &str) -> maze_types::MazeError {
    let result = parse(source);
    assert!(result.module.is_none(), "expected no module for {source:?}");
    assert_eq!(result.errors.total_errors, 1, "parsing stops at the first error");
    result.errors.errors[0].clone()
}

/// Parse a single expression statement and return the expression.
fn expr(source: &str) -> Expr {
    let module = parse_ok(source);
    match module.body.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::Expr(e)) => e,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn stmt_kinds(module: &Module) -> Vec<&'static str> {
    module.body.iter().map(|s| s.kind.node_name()).collect()
}

// ─────────────────────────────────────────────────────────────────────
// The maze language
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_program() {
    assert!(parse_ok("").body.is_empty());
    assert!(parse_ok("# just a comment\n\n").body.is_empty());
}

#[test]
fn test_action_calls_in_order() {
    let module = parse_ok("move()\nturn_left()\nmove()\n");
    assert_eq!(module.body.len(), 3);
    let lines: Vec<u32> = module.body.iter().map(Stmt::line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
    let StmtKind::Expr(call) = &module.body[1].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Call { func, args, keywords } = &call.kind else {
        panic!("expected call");
    };
    assert_eq!(func.as_name(), Some("turn_left"));
    assert!(args.is_empty());
    assert!(keywords.is_empty());
}

#[test]
fn test_semicolon_separated_statements() {
    let module = parse_ok("move(); move(); pass\n");
    assert_eq!(stmt_kinds(&module), vec!["Expr", "Expr", "Pass"]);
}

#[test]
fn test_if_elif_else_nests() {
    let src = "\
if path_ahead():
    move()
elif path_left():
    turn_left()
else:
    turn_right()
";
    let module = parse_ok(src);
    assert_eq!(module.body.len(), 1);
    let StmtKind::If { body, orelse, .. } = &module.body[0].kind else {
        panic!("expected if");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
    assert_eq!(orelse[0].line(), 3);
    let StmtKind::If { orelse: inner_else, .. } = &orelse[0].kind else {
        panic!("elif should be a nested if");
    };
    assert_eq!(inner_else.len(), 1);
    assert_eq!(inner_else[0].line(), 6);
}

#[test]
fn test_single_line_suite() {
    let module = parse_ok("if at_goal(): pass\nelse: move()\n");
    let StmtKind::If { body, orelse, .. } = &module.body[0].kind else {
        panic!("expected if");
    };
    assert_eq!(body[0].kind, StmtKind::Pass);
    assert_eq!(orelse.len(), 1);
}

#[test]
fn test_while_with_else() {
    let src = "while path_ahead():\n    move()\nelse:\n    turn_left()\n";
    let module = parse_ok(src);
    let StmtKind::While { body, orelse, .. } = &module.body[0].kind else {
        panic!("expected while");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
}

#[test]
fn test_for_range() {
    let module = parse_ok("for i in range(2, 5):\n    move()\n");
    let StmtKind::For { target, iter, body, orelse } = &module.body[0].kind else {
        panic!("expected for");
    };
    assert_eq!(target.as_name(), Some("i"));
    let ExprKind::Call { func, args, .. } = &iter.kind else {
        panic!("expected call");
    };
    assert_eq!(func.as_name(), Some("range"));
    assert_eq!(args.len(), 2);
    assert_eq!(args[1].kind, ExprKind::Int(5));
    assert_eq!(body.len(), 1);
    assert!(orelse.is_empty());
}

#[test]
fn test_assignments() {
    let module = parse_ok("steps = 0\nsteps += 1\nx = y = 3\n");
    let StmtKind::Assign { targets, value } = &module.body[0].kind else {
        panic!("expected assign");
    };
    assert_eq!(targets.len(), 1);
    assert_eq!(value.kind, ExprKind::Int(0));

    let StmtKind::AugAssign { op, .. } = &module.body[1].kind else {
        panic!("expected augmented assign");
    };
    assert_eq!(*op, BinOp::Add);

    let StmtKind::Assign { targets, .. } = &module.body[2].kind else {
        panic!("expected chained assign");
    };
    let names: Vec<_> = targets.iter().filter_map(Expr::as_name).collect();
    assert_eq!(names, vec!["x", "y"]);
}

// ─────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_not_binds_looser_than_comparison() {
    // not (a == b)
    let e = expr("not a == b");
    let ExprKind::Unary { op: UnaryOp::Not, operand } = &e.kind else {
        panic!("expected not");
    };
    assert!(matches!(operand.kind, ExprKind::Compare { .. }));
}

#[test]
fn test_and_binds_tighter_than_or() {
    // a or (b and c)
    let e = expr("a or b and c");
    let ExprKind::BoolOp { op: BoolOp::Or, values } = &e.kind else {
        panic!("expected or");
    };
    assert_eq!(values.len(), 2);
    assert!(matches!(values[1].kind, ExprKind::BoolOp { op: BoolOp::And, .. }));
}

#[test]
fn test_bool_ops_flatten() {
    let e = expr("a and b and c");
    let ExprKind::BoolOp { values, .. } = &e.kind else {
        panic!("expected and");
    };
    assert_eq!(values.len(), 3);
}

#[test]
fn test_arithmetic_precedence() {
    // 1 + (2 * 3)
    let e = expr("1 + 2 * 3");
    let ExprKind::Binary { op: BinOp::Add, right, .. } = &e.kind else {
        panic!("expected +");
    };
    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn test_unary_minus_binds_tighter_than_mul() {
    let e = expr("-x // 2");
    let ExprKind::Binary { op: BinOp::FloorDiv, left, .. } = &e.kind else {
        panic!("expected //");
    };
    assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
}

#[test]
fn test_chained_comparison_kept_whole() {
    let e = expr("a < b <= c");
    let ExprKind::Compare { ops, comparators, .. } = &e.kind else {
        panic!("expected compare");
    };
    assert_eq!(ops, &vec![CmpOp::Lt, CmpOp::LtE]);
    assert_eq!(comparators.len(), 2);
}

#[test]
fn test_two_word_comparisons() {
    let e = expr("a is not b");
    let ExprKind::Compare { ops, .. } = &e.kind else {
        panic!("expected compare");
    };
    assert_eq!(ops, &vec![CmpOp::IsNot]);

    let e = expr("a not in b");
    let ExprKind::Compare { ops, .. } = &e.kind else {
        panic!("expected compare");
    };
    assert_eq!(ops, &vec![CmpOp::NotIn]);
}

#[test]
fn test_parentheses_override_precedence() {
    let e = expr("(1 + 2) * 3");
    let ExprKind::Binary { op: BinOp::Mul, left, .. } = &e.kind else {
        panic!("expected *");
    };
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Add, .. }));
}

// ─────────────────────────────────────────────────────────────────────
// The permissive superset
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_superset_statements_parse() {
    let src = "\
import os
from math import (floor, ceil,)
def helper(a, b=2, *args, **kw) -> int:
    return a
async def later():
    pass
@decorator
class Robot(Base):
    pass
try:
    move()
except ValueError as err:
    raise
else:
    pass
finally:
    pass
with open('f') as fh, other():
    pass
assert at_goal(), 'msg'
del x
global g
x: int = 3
";
    let module = parse_ok(src);
    assert_eq!(
        stmt_kinds(&module),
        vec![
            "Import",
            "Import",
            "FunctionDef",
            "AsyncFunctionDef",
            "ClassDef",
            "Try",
            "With",
            "Assert",
            "Delete",
            "Global",
            "AnnAssign",
        ]
    );
    let StmtKind::Import { module: name } = &module.body[0].kind else {
        panic!("expected import");
    };
    assert_eq!(name, "os");
}

#[test]
fn test_superset_expressions_parse() {
    let cases = [
        ("robot.move()", "Call"),
        ("grid[0]", "Subscript"),
        ("grid[1:2]", "Subscript"),
        ("[x for x in range(3)]", "ListComp"),
        ("{k: v for k in ks}", "DictComp"),
        ("{a for a in b}", "SetComp"),
        ("sum(x for x in xs)", "Call"),
        ("{1: 2}", "Dict"),
        ("{1, 2}", "Set"),
        ("[1, 2]", "List"),
        ("(1, 2)", "Tuple"),
        ("lambda x: x", "Lambda"),
        ("a if b else c", "IfExp"),
        ("(n := 10)", "NamedExpr"),
        ("'text'", "Constant"),
        ("1.5", "Constant"),
        ("None", "Constant"),
        ("2 ** 8", "BinOp"),
        ("print(*args, sep='')", "Call"),
    ];
    for (src, node) in cases {
        assert_eq!(expr(src).kind.node_name(), node, "source: {src}");
    }
}

#[test]
fn test_keyword_arguments_recorded() {
    let e = expr("move(steps=2)");
    let ExprKind::Call { args, keywords, .. } = &e.kind else {
        panic!("expected call");
    };
    assert!(args.is_empty());
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].name.as_ref().map(|n| n.name.as_str()), Some("steps"));
}

#[test]
fn test_adjacent_strings_concatenate() {
    assert_eq!(expr("'ab' 'cd'").kind, ExprKind::Str("abcd".into()));
}

// ─────────────────────────────────────────────────────────────────────
// Diagnostics
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_expected_indented_block() {
    let err = parse_err("move()\nwhile path_ahead():\nmove()\n");
    assert_eq!(err.code, ErrorCode::EXPECTED_INDENTED_BLOCK);
    assert_eq!(err.message, "expected an indented block after 'while' on line 2");
    assert_eq!(err.line(), 3);
}

#[test]
fn test_expected_indented_block_after_else() {
    let err = parse_err("if at_goal():\n    pass\nelse:\n");
    assert_eq!(err.code, ErrorCode::EXPECTED_INDENTED_BLOCK);
    assert!(err.message.contains("'else'"));
}

#[test]
fn test_unexpected_indent() {
    let err = parse_err("move()\n    move()\n");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_INDENT);
    assert_eq!(err.message, "unexpected indent");
    assert_eq!(err.line(), 2);
}

#[test]
fn test_unindent_mismatch_comes_from_lexer() {
    let err = parse_err("if at_goal():\n        move()\n    move()\n");
    assert_eq!(err.code, ErrorCode::INCONSISTENT_DEDENT);
    assert_eq!(err.line(), 3);
}

#[test]
fn test_missing_colon() {
    let err = parse_err("while True\n    move()\n");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.message, "expected ':', got newline");
    assert_eq!(err.line(), 1);
}

#[test]
fn test_trailing_garbage() {
    let err = parse_err("move() move()\n");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.message, "expected end of line, got 'move'");
}

#[test]
fn test_stray_else() {
    let err = parse_err("move()\nelse:\n    pass\n");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.line(), 2);
}

#[test]
fn test_missing_expression() {
    let err = parse_err("x = \n");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.message, "expected an expression, got newline");
}

#[test]
fn test_error_carries_source_line() {
    let err = parse_err("move()\nif True\n");
    assert_eq!(err.source_line, "if True");
}

// ─────────────────────────────────────────────────────────────────────
// Structural limits
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_expression_depth_limit() {
    let depth = MAX_EXPR_DEPTH as usize + 1;
    let src = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
    let err = parse_err(&src);
    assert_eq!(err.code, ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);
}

#[test]
fn test_unary_chain_depth_limit() {
    let src = format!("x = {}1\n", "not ".repeat(MAX_EXPR_DEPTH as usize + 1));
    let err = parse_err(&src);
    assert_eq!(err.code, ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);
}

#[test]
fn test_moderate_nesting_accepted() {
    let src = format!("x = {}1{}\n", "(".repeat(20), ")".repeat(20));
    parse_ok(&src);
}

#[test]
fn test_block_depth_limit() {
    let mut src = String::new();
    for level in 0..=MAX_BLOCK_DEPTH as usize {
        src.push_str(&" ".repeat(level * 4));
        src.push_str("if True:\n");
    }
    src.push_str(&" ".repeat((MAX_BLOCK_DEPTH as usize + 1) * 4));
    src.push_str("move()\n");
    let err = parse_err(&src);
    assert_eq!(err.code, ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);
}

#[test]
fn test_block_depth_at_limit_accepted() {
    let mut src = String::new();
    for level in 0..MAX_BLOCK_DEPTH as usize {
        src.push_str(&" ".repeat(level * 4));
        src.push_str("if True:\n");
    }
    src.push_str(&" ".repeat(MAX_BLOCK_DEPTH as usize * 4));
    src.push_str("move()\n");
    parse_ok(&src);
}

// ─────────────────────────────────────────────────────────────────────
// Direct construction
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parser_over_lexer_tokens() {
    let sf = SourceFile::new("test.py", "pass\n");
    let tokens = maze_lexer::Lexer::new(&sf).lex().tokens;
    let result = Parser::new(tokens, &sf).parse();
    assert!(!result.errors.has_errors());
    assert_eq!(result.module.map(|m| m.body.len()), Some(1));
}

// ─────────────────────────────────────────────────────────────────────
// 100-iteration determinism test
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parser_determinism_100_iterations() {
    let source = "\
steps = 0
while not at_goal():
    if path_right():
        turn_right()
    elif not path_ahead():
        turn_left()
    else:
        move()
    steps += 1
";
    let first = parse_ok(source);
    for _ in 0..100 {
        assert_eq!(parse_ok(source), first);
    }
}
