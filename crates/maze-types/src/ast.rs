//! Raw syntax tree produced by the parser.
//!
//! The parser accepts a permissive Python-like superset of the maze
//! language so that the validator can reject everything outside the allowed
//! grammar with a precise, line-numbered diagnostic. Nothing in this tree is
//! trusted: it is only ever consumed by the validator, which lowers it into
//! the closed [`crate::program`] representation.
//!
//! Every node carries a [`Span`]. Statement bodies preserve source order.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed source file: the top-level statement suite.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The 1-based line the statement starts on.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A bare expression used as a statement: `move()`
    Expr(Expr),
    /// `a = b = value` (one entry per `=` target)
    Assign { targets: Vec<Expr>, value: Expr },
    /// `a += value`
    AugAssign {
        target: Expr,
        op: BinOp,
        value: Expr,
    },
    /// `a: int = value`
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    /// `if test: ... elif ...: ... else: ...` (`elif` is a nested `If` in `orelse`)
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    /// `while test: ... else: ...`
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    /// `for target in iter: ... else: ...`
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    /// `pass`
    Pass,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `return [value]`
    Return(Option<Expr>),
    /// `[async] def name(...): ...`
    FunctionDef {
        name: Ident,
        is_async: bool,
        body: Vec<Stmt>,
    },
    /// `class Name(...): ...`
    ClassDef { name: Ident, body: Vec<Stmt> },
    /// `import a.b` / `from a import b`
    Import { module: String },
    /// `try: ... except ...: ... else: ... finally: ...`
    Try {
        body: Vec<Stmt>,
        handlers: Vec<Vec<Stmt>>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    /// `[async] with item [as name], ...: ...`
    With { items: Vec<Expr>, body: Vec<Stmt> },
    /// `raise [exc]`
    Raise(Option<Expr>),
    /// `assert test [, msg]`
    Assert { test: Expr, msg: Option<Expr> },
    /// `del a, b`
    Delete(Vec<Expr>),
    /// `global a, b`
    Global(Vec<Ident>),
    /// `nonlocal a, b`
    Nonlocal(Vec<Ident>),
}

impl StmtKind {
    /// Node name used in diagnostics.
    pub fn node_name(&self) -> &'static str {
        match self {
            Self::Expr(_) => "Expr",
            Self::Assign { .. } => "Assign",
            Self::AugAssign { .. } => "AugAssign",
            Self::AnnAssign { .. } => "AnnAssign",
            Self::If { .. } => "If",
            Self::While { .. } => "While",
            Self::For { .. } => "For",
            Self::Pass => "Pass",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::Return(_) => "Return",
            Self::FunctionDef { is_async: true, .. } => "AsyncFunctionDef",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::ClassDef { .. } => "ClassDef",
            Self::Import { .. } => "Import",
            Self::Try { .. } => "Try",
            Self::With { .. } => "With",
            Self::Raise(_) => "Raise",
            Self::Assert { .. } => "Assert",
            Self::Delete(_) => "Delete",
            Self::Global(_) => "Global",
            Self::Nonlocal(_) => "Nonlocal",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The 1-based line the expression starts on.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }

    /// The identifier if this expression is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42` (saturates at `u64::MAX`; sign is a separate unary node)
    Int(u64),
    /// `3.14`, `1e9`
    Float(f64),
    /// `"text"` / `'text'`
    Str(String),
    /// `True` / `False`
    Bool(bool),
    /// `None`
    NoneLit,

    // ── Names & access ──
    /// `name`
    Name(String),
    /// `value.attr`
    Attribute { value: Box<Expr>, attr: Ident },
    /// `value[index]`
    Subscript { value: Box<Expr>, index: Box<Expr> },
    /// `func(args..., key=value...)`
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },

    // ── Operators ──
    /// `not x`, `-x`, `+x`, `~x`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `a and b and c`: flattened operand list
    BoolOp { op: BoolOp, values: Vec<Expr> },
    /// `a + b`
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a < b <= c`: one entry in `ops`/`comparators` per operator
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },

    // ── Displays ──
    /// `[a, b]`
    List(Vec<Expr>),
    /// `(a, b)` / `a, b`
    Tuple(Vec<Expr>),
    /// `{a, b}`
    Set(Vec<Expr>),
    /// `{k: v}`
    Dict(Vec<(Expr, Expr)>),
    /// `[x for x in xs]`, `{...}`, `(...)`
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expr>,
    },

    // ── Other forms ──
    /// `lambda params: body`
    Lambda { body: Box<Expr> },
    /// `body if test else orelse`
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// `target := value`
    NamedExpr { target: Box<Expr>, value: Box<Expr> },
    /// `await value`
    Await(Box<Expr>),
    /// `*value`
    Starred(Box<Expr>),
}

impl ExprKind {
    /// Node name used in diagnostics.
    pub fn node_name(&self) -> &'static str {
        match self {
            Self::Int(_) | Self::Float(_) | Self::Str(_) | Self::Bool(_) | Self::NoneLit => {
                "Constant"
            }
            Self::Name(_) => "Name",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::Call { .. } => "Call",
            Self::Unary { .. } => "UnaryOp",
            Self::BoolOp { .. } => "BoolOp",
            Self::Binary { .. } => "BinOp",
            Self::Compare { .. } => "Compare",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Set(_) => "Set",
            Self::Dict(_) => "Dict",
            Self::Comprehension { kind, .. } => kind.node_name(),
            Self::Lambda { .. } => "Lambda",
            Self::IfExp { .. } => "IfExp",
            Self::NamedExpr { .. } => "NamedExpr",
            Self::Await(_) => "Await",
            Self::Starred(_) => "Starred",
        }
    }
}

/// A keyword argument: `key=value` or `**mapping` (`name` is `None`).
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: Option<Ident>,
    pub value: Expr,
    pub span: Span,
}

/// Which bracket a comprehension was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

impl ComprehensionKind {
    pub fn node_name(self) -> &'static str {
        match self {
            Self::List => "ListComp",
            Self::Set => "SetComp",
            Self::Dict => "DictComp",
            Self::Generator => "GeneratorExp",
        }
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Short-circuit boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `not x`
    Not,
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Invert => "~",
        }
    }
}

/// Binary (non-boolean, non-comparison) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::MatMul => "@",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}
