//! Validated program representation.
//!
//! This is the closed vocabulary the executor runs. Call targets are already
//! resolved to [`Action`] / [`Predicate`] tags, `range()` bounds are plain
//! integers, and there is no way to express a construct the validator did not
//! accept. Blocks are reference-counted slices so a suspended run can hold
//! cursors into them without borrowing the program.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Vocabulary
// ══════════════════════════════════════════════════════════════════════════════

/// A world-mutating call. The only statements that consume budget and the
/// only points at which a run suspends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "move")]
    Move,
    #[serde(rename = "turnLeft")]
    TurnLeft,
    #[serde(rename = "turnRight")]
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Move, Action::TurnLeft, Action::TurnRight];

    /// Resolve a source-level call name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move" => Some(Self::Move),
            "turn_left" => Some(Self::TurnLeft),
            "turn_right" => Some(Self::TurnRight),
            _ => None,
        }
    }

    /// The name used in source text.
    pub fn source_name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::TurnLeft => "turn_left",
            Self::TurnRight => "turn_right",
        }
    }

    /// The tag reported to hosts in action events.
    pub fn event_tag(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::TurnLeft => "turnLeft",
            Self::TurnRight => "turnRight",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.source_name())
    }
}

/// A zero-argument, side-effect-free world query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    AtGoal,
    PathAhead,
    PathLeft,
    PathRight,
    PathBehind,
}

impl Predicate {
    pub const ALL: [Predicate; 5] = [
        Predicate::AtGoal,
        Predicate::PathAhead,
        Predicate::PathLeft,
        Predicate::PathRight,
        Predicate::PathBehind,
    ];

    /// Resolve a source-level call name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "at_goal" => Some(Self::AtGoal),
            "path_ahead" => Some(Self::PathAhead),
            "path_left" => Some(Self::PathLeft),
            "path_right" => Some(Self::PathRight),
            "path_behind" => Some(Self::PathBehind),
            _ => None,
        }
    }

    /// The name used in source text.
    pub fn source_name(self) -> &'static str {
        match self {
            Self::AtGoal => "at_goal",
            Self::PathAhead => "path_ahead",
            Self::PathLeft => "path_left",
            Self::PathRight => "path_right",
            Self::PathBehind => "path_behind",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.source_name())
    }
}

/// Integer arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// Floor division (rounds toward negative infinity).
    FloorDiv,
    /// Modulo with the sign of the divisor, consistent with `FloorDiv`.
    Mod,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::FloorDiv => "//",
            ArithOp::Mod => "%",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A validated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Int(i64),
    /// Read of a local binding. Faults at run time if unbound.
    Var { name: String, line: u32 },
    Not(Box<Expr>),
    /// Integer negation.
    Neg { operand: Box<Expr>, line: u32 },
    /// Short-circuit conjunction over two or more operands.
    And(Vec<Expr>),
    /// Short-circuit disjunction over two or more operands.
    Or(Vec<Expr>),
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    Predicate(Predicate),
    Arith {
        left: Box<Expr>,
        op: ArithOp,
        right: Box<Expr>,
        line: u32,
    },
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A shared, immutable statement suite.
pub type Block = Arc<[Stmt]>;

/// A validated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `move()`, `turn_left()`, `turn_right()`
    Action { action: Action, line: u32 },
    If(IfStmt),
    While(Arc<WhileStmt>),
    For(Arc<ForStmt>),
    Pass { line: u32 },
    Assign { name: String, value: Expr, line: u32 },
    AugAssign {
        name: String,
        op: ArithOp,
        value: Expr,
        line: u32,
    },
}

impl Stmt {
    /// The 1-based source line of the statement header.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Action { line, .. }
            | Stmt::Pass { line }
            | Stmt::Assign { line, .. }
            | Stmt::AugAssign { line, .. } => *line,
            Stmt::If(stmt) => stmt.line,
            Stmt::While(stmt) => stmt.line,
            Stmt::For(stmt) => stmt.line,
        }
    }
}

/// `if test: then_body else: else_body`. `elif` chains are nested `If`
/// statements in `else_body`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Expr,
    pub then_body: Block,
    pub else_body: Block,
    pub line: u32,
}

/// `while test: body else: else_body`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub test: Expr,
    pub body: Block,
    /// Empty when the loop has no `else` clause.
    pub else_body: Block,
    pub line: u32,
}

/// `for var in range(start, stop): body`, bounds resolved at validation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Bound to the counter each iteration when present.
    pub var: Option<String>,
    pub start: i64,
    pub stop: i64,
    pub body: Block,
    pub line: u32,
}

impl ForStmt {
    /// Number of iterations the loop performs.
    pub fn iterations(&self) -> u64 {
        self.stop.saturating_sub(self.start).max(0) as u64
    }
}

/// A whole validated program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Block,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body: body.into() }
    }

    /// Count of statements at every nesting level.
    pub fn statement_count(&self) -> usize {
        fn count(block: &[Stmt]) -> usize {
            block
                .iter()
                .map(|stmt| {
                    1 + match stmt {
                        Stmt::If(s) => count(&s.then_body) + count(&s.else_body),
                        Stmt::While(s) => count(&s.body) + count(&s.else_body),
                        Stmt::For(s) => count(&s.body),
                        _ => 0,
                    }
                })
                .sum()
        }
        count(&self.body)
    }
}
