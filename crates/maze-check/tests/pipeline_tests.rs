//! End-to-end pipeline tests: source text → normalise → lex → parse →
//! validate.

use maze_check::{compile, validate, LanguageConfig};
use maze_lexer::SourceNote;
use maze_types::{ErrorCode, SourceFile};

const WALL_FOLLOWER: &str = "\
# Keep a hand on the right wall.
while not at_goal():
    if path_right():
        turn_right()
        move()
    elif path_ahead():
        move()
    else:
        turn_left()
";

const COUNTED: &str = "\
steps = 0
for i in range(20):
    if at_goal():
        pass
    elif path_ahead():
        move()
        steps += 1
    else:
        turn_right()
";

#[test]
fn test_canonical_programs_compile() {
    let classic = compile(WALL_FOLLOWER, "follower.py", &LanguageConfig::classic()).unwrap();
    assert_eq!(classic.program().statement_count(), 7);
    assert!(classic.notes().is_empty());
    assert_eq!(*classic.language(), LanguageConfig::classic());

    let extended = compile(COUNTED, "counted.py", &LanguageConfig::extended()).unwrap();
    assert_eq!(extended.program().body.len(), 2);
}

#[test]
fn test_extended_program_rejected_by_classic() {
    let errors = compile(COUNTED, "counted.py", &LanguageConfig::classic()).unwrap_err();
    // `steps = 0` and `steps += 1`
    assert_eq!(errors.total_errors, 2);
    assert!(errors
        .errors
        .iter()
        .all(|e| e.code == ErrorCode::VARIABLES_DISABLED));
    assert_eq!(errors.errors[0].file, "counted.py");
}

#[test]
fn test_syntax_error_stops_before_validation() {
    // Line 1 would be a validation error, but the syntax error wins and is
    // the only diagnostic.
    let errors = compile("jump()\nwhile True\n    move()\n", "t.py", &LanguageConfig::classic())
        .unwrap_err();
    assert_eq!(errors.total_errors, 1);
    let first = errors.first().unwrap();
    assert_eq!(first.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(first.line(), 2);
    assert_eq!(first.source_line, "while True");
}

#[test]
fn test_tabs_and_crlf_normalised() {
    let source = "while not at_goal():\r\n\tmove()\r\n";
    let program = compile(source, "t.py", &LanguageConfig::classic()).unwrap();
    assert_eq!(
        program.notes(),
        &[SourceNote::TabsConverted { lines: vec![2] }]
    );
    assert_eq!(
        program.notes()[0].to_string(),
        "Converted tabs to 4 spaces on lines 2."
    );
}

#[test]
fn test_irregular_indent_is_only_a_note() {
    let program = compile(
        "if path_ahead():\n  move()\n",
        "t.py",
        &LanguageConfig::classic(),
    )
    .unwrap();
    assert!(matches!(
        program.notes(),
        [SourceNote::IrregularIndent { lines }] if lines == &vec![2]
    ));
}

#[test]
fn test_fingerprint_stable_and_dialect_sensitive() {
    let a = compile(WALL_FOLLOWER, "a.py", &LanguageConfig::classic()).unwrap();
    let b = compile(WALL_FOLLOWER, "b.py", &LanguageConfig::classic()).unwrap();
    let c = compile(WALL_FOLLOWER, "a.py", &LanguageConfig::extended()).unwrap();
    assert_eq!(a.fingerprint().len(), 64);
    assert!(a.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_fingerprint_sees_through_line_endings() {
    let unix = compile("move()\nmove()\n", "t.py", &LanguageConfig::classic()).unwrap();
    let dos = compile("move()\r\nmove()\r\n", "t.py", &LanguageConfig::classic()).unwrap();
    assert_eq!(unix.fingerprint(), dos.fingerprint());
}

#[test]
fn test_validate_on_parsed_module() {
    let source = SourceFile::new("t.py", "move()\nturn_right()\n");
    let parsed = maze_parser::parse(&source);
    let module = parsed.module.unwrap();
    let program = validate(&module, &source, &LanguageConfig::classic()).unwrap();
    assert_eq!(program.program().body.len(), 2);
    assert!(validate(&module, &source, &LanguageConfig::extended()).is_ok());
}

#[test]
fn test_errors_serialize_to_json() {
    let errors = compile("jump()\n", "t.py", &LanguageConfig::classic()).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["total_errors"], 1);
    assert_eq!(json["errors"][0]["line"], 1);
    assert_eq!(json["errors"][0]["category"], "call");
    assert_eq!(json["errors"][0]["source_line"], "jump()");
}

#[test]
fn test_error_cap() {
    let source = "jump()\n".repeat(30);
    let errors = compile(&source, "t.py", &LanguageConfig::classic()).unwrap_err();
    assert_eq!(errors.errors.len(), maze_types::MAX_ERRORS);
    assert_eq!(errors.total_errors, 30);
}

#[test]
fn test_compile_deterministic() {
    let first = compile(COUNTED, "t.py", &LanguageConfig::extended()).unwrap();
    for _ in 0..100 {
        let again = compile(COUNTED, "t.py", &LanguageConfig::extended()).unwrap();
        assert_eq!(again.program(), first.program());
        assert_eq!(again.fingerprint(), first.fingerprint());
    }
}
