//! Maze Validator: walks the raw syntax tree and lowers it into a
//! [`Program`].
//!
//! Entry point: [`Validator::validate`].
//!
//! The validator is an allowlist. Every node kind is matched explicitly and
//! anything not accepted by the active [`LanguageConfig`] is reported with
//! the line it appears on. Traversal continues after an error so that one
//! pass reports every violation in source order.
//!
//! Error codes emitted:
//! - E200: statement kind outside the language
//! - E201: expression kind outside the language
//! - E202: variables used while the dialect disables them
//! - E203: assignment target is not a single plain name
//! - E204: name read but never assigned anywhere
//! - E300: unknown function
//! - E301: arguments passed to an action or predicate
//! - E302: predicate used as a statement
//! - E303: action used inside an expression
//! - E304: `range()` outside a `for` header
//! - E305: call target is not a plain name
//! - E400–E403: `for` loop shape
//! - E500: chained comparison
//! - E501: operator outside the dialect
//! - E600/E601: float, string or `None` literal; integer out of range

use std::collections::BTreeSet;

use maze_types::ast::{self, BinOp, CmpOp, ExprKind, Module, StmtKind, UnaryOp};
use maze_types::program::{
    Action, ArithOp, CompareOp, Expr, ForStmt, IfStmt, Predicate, Program, Stmt, WhileStmt,
};
use maze_types::{CompileErrors, ErrorCode, MazeError, SourceFile, Span};

use crate::dialect::LanguageConfig;

const ACTION_LIST: &str = "move, turn_left, turn_right";

// ══════════════════════════════════════════════════════════════════════════════
// Validator
// ══════════════════════════════════════════════════════════════════════════════

/// Validates a parsed [`Module`] against a [`LanguageConfig`].
pub struct Validator<'a> {
    config: LanguageConfig,
    errors: &'a mut CompileErrors,
    source: &'a SourceFile,
    /// Every name assigned somewhere in the program.
    assigned: BTreeSet<String>,
}

impl<'a> Validator<'a> {
    pub fn new(
        config: LanguageConfig,
        errors: &'a mut CompileErrors,
        source: &'a SourceFile,
    ) -> Self {
        Self {
            config,
            errors,
            source,
            assigned: BTreeSet::new(),
        }
    }

    /// Validate a whole module. The returned program is only meaningful when
    /// no errors were pushed.
    pub fn validate(&mut self, module: &Module) -> Program {
        if self.config.variables {
            collect_assigned(&module.body, &mut self.assigned);
        }
        let body = self.lower_block(&module.body);
        Program::new(body)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn lower_block(&mut self, stmts: &[ast::Stmt]) -> Vec<Stmt> {
        stmts
            .iter()
            .filter_map(|stmt| self.lower_stmt(stmt))
            .collect()
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Option<Stmt> {
        let line = stmt.line();
        match &stmt.kind {
            StmtKind::Expr(expr) => self.lower_action_stmt(expr),
            StmtKind::Pass => Some(Stmt::Pass { line }),

            StmtKind::If { test, body, orelse } => {
                let test = self.lower_expr(test);
                let then_body = self.lower_block(body);
                let else_body = self.lower_block(orelse);
                Some(Stmt::If(IfStmt {
                    test: test?,
                    then_body: then_body.into(),
                    else_body: else_body.into(),
                    line,
                }))
            }

            StmtKind::While { test, body, orelse } => {
                let test = self.lower_expr(test);
                let body = self.lower_block(body);
                let else_body = self.lower_block(orelse);
                Some(Stmt::While(
                    WhileStmt {
                        test: test?,
                        body: body.into(),
                        else_body: else_body.into(),
                        line,
                    }
                    .into(),
                ))
            }

            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => self.lower_for(stmt.span, target, iter, body, orelse),

            StmtKind::Assign { targets, value } => {
                if !self.require_variables(stmt.span, "assignment") {
                    return None;
                }
                let name = match targets.as_slice() {
                    [target] => self.assignment_target(target),
                    _ => {
                        self.error(
                            ErrorCode::INVALID_ASSIGNMENT_TARGET,
                            "chained assignment is not allowed; assign one name at a time",
                            stmt.span,
                        );
                        None
                    }
                };
                let value = self.lower_expr(value);
                Some(Stmt::Assign {
                    name: name?,
                    value: value?,
                    line,
                })
            }

            StmtKind::AugAssign { target, op, value } => {
                if !self.require_variables(stmt.span, "augmented assignment") {
                    return None;
                }
                let name = self.assignment_target(target);
                let op = self.arith_op(*op, stmt.span);
                let value = self.lower_expr(value);
                Some(Stmt::AugAssign {
                    name: name?,
                    op: op?,
                    value: value?,
                    line,
                })
            }

            other => {
                self.error_with(
                    ErrorCode::DISALLOWED_STATEMENT,
                    format!("{} not allowed", describe_statement(other)),
                    stmt.span,
                    "the language supports actions, if, while, for ... in range() and pass",
                );
                None
            }
        }
    }

    /// An expression statement must be a bare action call.
    fn lower_action_stmt(&mut self, expr: &ast::Expr) -> Option<Stmt> {
        let line = expr.line();
        let ExprKind::Call {
            func,
            args,
            keywords,
        } = &expr.kind
        else {
            self.error_with(
                ErrorCode::DISALLOWED_EXPRESSION,
                format!(
                    "'{}' cannot be used as a statement; only action calls can",
                    expr.kind.node_name()
                ),
                expr.span,
                format!("available actions: {ACTION_LIST}"),
            );
            return None;
        };

        let name = self.call_name(func)?;
        if let Some(action) = Action::from_name(name) {
            if !args.is_empty() || !keywords.is_empty() {
                self.error(
                    ErrorCode::ARGUMENTS_NOT_ALLOWED,
                    format!("'{action}' does not take arguments"),
                    expr.span,
                );
                return None;
            }
            return Some(Stmt::Action { action, line });
        }

        if let Some(predicate) = self.predicate(name) {
            self.error_with(
                ErrorCode::NOT_AN_ACTION,
                format!("'{predicate}' is a condition, not an action"),
                expr.span,
                format!("use it in a test, e.g. `if {predicate}:`"),
            );
        } else if name == "range" {
            self.range_outside_for(expr.span);
        } else {
            self.unknown_function(name, expr.span);
        }
        None
    }

    fn lower_for(
        &mut self,
        span: Span,
        target: &ast::Expr,
        iter: &ast::Expr,
        body: &[ast::Stmt],
        orelse: &[ast::Stmt],
    ) -> Option<Stmt> {
        let mut ok = true;
        if !orelse.is_empty() {
            self.error(
                ErrorCode::FOR_ELSE_NOT_ALLOWED,
                "'for' loops cannot have an 'else' clause",
                span,
            );
            ok = false;
        }

        let var = match &target.kind {
            ExprKind::Name(name) if self.config.variables && name != "_" => Some(name.clone()),
            ExprKind::Name(_) => None,
            _ => {
                self.error(
                    ErrorCode::INVALID_LOOP_TARGET,
                    format!(
                        "loop variable must be a simple name, got '{}'",
                        target.kind.node_name()
                    ),
                    target.span,
                );
                ok = false;
                None
            }
        };

        let bounds = self.range_bounds(iter);
        let body = self.lower_block(body);
        let (start, stop) = bounds?;
        if !ok {
            return None;
        }
        Some(Stmt::For(
            ForStmt {
                var,
                start,
                stop,
                body: body.into(),
                line: span.start_line,
            }
            .into(),
        ))
    }

    /// Resolve `range(stop)` or `range(start, stop)` with literal bounds.
    fn range_bounds(&mut self, iter: &ast::Expr) -> Option<(i64, i64)> {
        let (args, keywords) = match &iter.kind {
            ExprKind::Call {
                func,
                args,
                keywords,
            } if func.as_name() == Some("range") => (args, keywords),
            _ => {
                self.error_with(
                    ErrorCode::FOR_REQUIRES_RANGE,
                    "for loops must iterate over range()",
                    iter.span,
                    "write `for i in range(3):`",
                );
                return None;
            }
        };

        if !keywords.is_empty() {
            self.error(
                ErrorCode::INVALID_RANGE_ARGUMENTS,
                "range() does not take keyword arguments",
                iter.span,
            );
            return None;
        }

        match args.as_slice() {
            [stop] => Some((0, self.range_bound(stop)?)),
            [start, stop] => {
                let start = self.range_bound(start);
                let stop = self.range_bound(stop);
                Some((start?, stop?))
            }
            _ => {
                self.error(
                    ErrorCode::INVALID_RANGE_ARGUMENTS,
                    format!("range() takes one or two arguments, got {}", args.len()),
                    iter.span,
                );
                None
            }
        }
    }

    fn range_bound(&mut self, arg: &ast::Expr) -> Option<i64> {
        let max = self.config.max_range_bound;
        match arg.kind {
            ExprKind::Int(value) if value <= u64::from(max) => Some(value as i64),
            _ => {
                self.error(
                    ErrorCode::INVALID_RANGE_ARGUMENTS,
                    format!("range() arguments must be integer literals between 0 and {max}"),
                    arg.span,
                );
                None
            }
        }
    }

    fn assignment_target(&mut self, target: &ast::Expr) -> Option<String> {
        match &target.kind {
            ExprKind::Name(name) => Some(name.clone()),
            other => {
                self.error(
                    ErrorCode::INVALID_ASSIGNMENT_TARGET,
                    format!("cannot assign to '{}'; only plain names", other.node_name()),
                    target.span,
                );
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    fn lower_expr(&mut self, expr: &ast::Expr) -> Option<Expr> {
        let line = expr.line();
        match &expr.kind {
            ExprKind::Bool(value) => Some(Expr::Bool(*value)),

            ExprKind::Int(value) => match i64::try_from(*value) {
                Ok(value) => Some(Expr::Int(value)),
                Err(_) => {
                    self.integer_too_large(expr.span);
                    None
                }
            },

            ExprKind::Float(_) | ExprKind::Str(_) | ExprKind::NoneLit => {
                self.error(
                    ErrorCode::DISALLOWED_LITERAL,
                    format!("{} literals are not allowed", literal_kind(&expr.kind)),
                    expr.span,
                );
                None
            }

            ExprKind::Name(name) => self.lower_name(name, expr.span),

            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                let name = self.call_name(func)?;
                if let Some(predicate) = self.predicate(name) {
                    if !args.is_empty() || !keywords.is_empty() {
                        self.error(
                            ErrorCode::ARGUMENTS_NOT_ALLOWED,
                            format!("'{predicate}' does not take arguments"),
                            expr.span,
                        );
                        return None;
                    }
                    return Some(Expr::Predicate(predicate));
                }
                if let Some(action) = Action::from_name(name) {
                    self.error_with(
                        ErrorCode::ACTION_IN_EXPRESSION,
                        format!("action '{action}' cannot be used inside an expression"),
                        expr.span,
                        "call actions on their own line",
                    );
                } else if name == "range" {
                    self.range_outside_for(expr.span);
                } else {
                    self.unknown_function(name, expr.span);
                }
                None
            }

            ExprKind::Unary { op, operand } => self.lower_unary(*op, operand, expr.span),

            ExprKind::BoolOp { op, values } => {
                let lowered: Vec<Option<Expr>> =
                    values.iter().map(|value| self.lower_expr(value)).collect();
                let operands = lowered.into_iter().collect::<Option<Vec<_>>>()?;
                Some(match op {
                    ast::BoolOp::And => Expr::And(operands),
                    ast::BoolOp::Or => Expr::Or(operands),
                })
            }

            ExprKind::Binary { left, op, right } => {
                if !self.config.variables {
                    self.operator_not_allowed(op.as_str(), expr.span);
                    return None;
                }
                let op = self.arith_op(*op, expr.span);
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                Some(Expr::Arith {
                    left: Box::new(left?),
                    op: op?,
                    right: Box::new(right?),
                    line,
                })
            }

            ExprKind::Compare {
                left,
                ops,
                comparators,
            } => {
                let (op, right) = match (ops.as_slice(), comparators.as_slice()) {
                    ([op], [right]) => (*op, right),
                    _ => {
                        self.error_with(
                            ErrorCode::CHAINED_COMPARISON,
                            "chained comparisons are not allowed",
                            expr.span,
                            "split it into separate comparisons joined with 'and'",
                        );
                        return None;
                    }
                };
                let op = self.compare_op(op, expr.span);
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                Some(Expr::Compare {
                    left: Box::new(left?),
                    op: op?,
                    right: Box::new(right?),
                })
            }

            ExprKind::Attribute { .. } => {
                self.disallowed_expression("attribute access is not allowed", expr.span)
            }
            ExprKind::Subscript { .. } => {
                self.disallowed_expression("indexing and slicing are not allowed", expr.span)
            }
            ExprKind::Comprehension { .. } => self.disallowed_expression(
                format!("comprehensions ('{}') are not allowed", expr.kind.node_name()),
                expr.span,
            ),
            other => self.disallowed_expression(
                format!("'{}' expressions are not allowed", other.node_name()),
                expr.span,
            ),
        }
    }

    fn lower_name(&mut self, name: &str, span: Span) -> Option<Expr> {
        if Action::from_name(name).is_some() || self.predicate(name).is_some() {
            self.error_with(
                ErrorCode::DISALLOWED_EXPRESSION,
                format!("'{name}' must be called"),
                span,
                format!("write `{name}()`"),
            );
            return None;
        }
        if !self.require_variables(span, "variable") {
            return None;
        }
        if !self.assigned.contains(name) {
            self.error(
                ErrorCode::UNDEFINED_NAME,
                format!("name '{name}' is never assigned"),
                span,
            );
            return None;
        }
        Some(Expr::Var {
            name: name.to_string(),
            line: span.start_line,
        })
    }

    fn lower_unary(&mut self, op: UnaryOp, operand: &ast::Expr, span: Span) -> Option<Expr> {
        match op {
            UnaryOp::Not => Some(Expr::Not(Box::new(self.lower_expr(operand)?))),
            UnaryOp::Neg | UnaryOp::Pos if self.config.variables => {
                // Fold negative literals so `-9223372036854775808` is representable.
                if let (UnaryOp::Neg, ExprKind::Int(value)) = (op, &operand.kind) {
                    return match 0i128.checked_sub(i128::from(*value)).map(i64::try_from) {
                        Some(Ok(value)) => Some(Expr::Int(value)),
                        _ => {
                            self.integer_too_large(span);
                            None
                        }
                    };
                }
                let inner = self.lower_expr(operand)?;
                Some(match op {
                    UnaryOp::Neg => Expr::Neg {
                        operand: Box::new(inner),
                        line: span.start_line,
                    },
                    _ => inner,
                })
            }
            _ => {
                self.operator_not_allowed(op.as_str(), span);
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Vocabulary
    // ══════════════════════════════════════════════════════════════════════

    /// The plain name a call targets.
    fn call_name<'e>(&mut self, func: &'e ast::Expr) -> Option<&'e str> {
        match &func.kind {
            ExprKind::Name(name) => Some(name),
            ExprKind::Attribute { .. } => {
                self.error(
                    ErrorCode::INVALID_CALL_TARGET,
                    "attribute access is not allowed; call functions by name",
                    func.span,
                );
                None
            }
            other => {
                self.error(
                    ErrorCode::INVALID_CALL_TARGET,
                    format!("cannot call a '{}'", other.node_name()),
                    func.span,
                );
                None
            }
        }
    }

    /// A predicate available in this dialect.
    fn predicate(&self, name: &str) -> Option<Predicate> {
        Predicate::from_name(name)
            .filter(|predicate| *predicate != Predicate::PathBehind || self.config.path_behind)
    }

    fn arith_op(&mut self, op: BinOp, span: Span) -> Option<ArithOp> {
        match op {
            BinOp::Add => Some(ArithOp::Add),
            BinOp::Sub => Some(ArithOp::Sub),
            BinOp::Mul => Some(ArithOp::Mul),
            // No floats: `/` is floor division.
            BinOp::Div | BinOp::FloorDiv => Some(ArithOp::FloorDiv),
            BinOp::Mod => Some(ArithOp::Mod),
            other => {
                self.operator_not_allowed(other.as_str(), span);
                None
            }
        }
    }

    fn compare_op(&mut self, op: CmpOp, span: Span) -> Option<CompareOp> {
        let ordering = self.config.ordering_comparisons;
        match op {
            CmpOp::Eq => Some(CompareOp::Eq),
            CmpOp::NotEq => Some(CompareOp::NotEq),
            CmpOp::Lt if ordering => Some(CompareOp::Lt),
            CmpOp::LtE if ordering => Some(CompareOp::Le),
            CmpOp::Gt if ordering => Some(CompareOp::Gt),
            CmpOp::GtE if ordering => Some(CompareOp::Ge),
            other => {
                let allowed = if ordering {
                    "==, !=, <, <=, >, >="
                } else {
                    "== and !="
                };
                self.error_with(
                    ErrorCode::DISALLOWED_OPERATOR,
                    format!("comparison '{}' is not allowed", other.as_str()),
                    span,
                    format!("allowed comparisons: {allowed}"),
                );
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Error reporting
    // ══════════════════════════════════════════════════════════════════════

    fn require_variables(&mut self, span: Span, what: &str) -> bool {
        if self.config.variables {
            return true;
        }
        self.error_with(
            ErrorCode::VARIABLES_DISABLED,
            format!("{what} is not allowed: this dialect has no variables"),
            span,
            "use the extended dialect to work with variables",
        );
        false
    }

    fn unknown_function(&mut self, name: &str, span: Span) {
        let suggestion = if name == Predicate::PathBehind.source_name() {
            "path_behind() is only available in the extended dialect".to_string()
        } else {
            let conditions: Vec<&str> = Predicate::ALL
                .iter()
                .filter_map(|p| self.predicate(p.source_name()))
                .map(Predicate::source_name)
                .collect();
            format!(
                "available actions: {ACTION_LIST}; conditions: {}",
                conditions.join(", ")
            )
        };
        self.error_with(
            ErrorCode::UNKNOWN_FUNCTION,
            format!("unknown function '{name}()'"),
            span,
            suggestion,
        );
    }

    fn range_outside_for(&mut self, span: Span) {
        self.error_with(
            ErrorCode::RANGE_OUTSIDE_FOR,
            "range() can only be used in a for loop header",
            span,
            "write `for i in range(3):`",
        );
    }

    fn operator_not_allowed(&mut self, symbol: &str, span: Span) {
        let message = if self.config.variables {
            format!("operator '{symbol}' is not allowed")
        } else {
            format!("operator '{symbol}' is not allowed in this dialect")
        };
        self.error(ErrorCode::DISALLOWED_OPERATOR, message, span);
    }

    fn integer_too_large(&mut self, span: Span) {
        self.error(
            ErrorCode::INTEGER_TOO_LARGE,
            "integer literal does not fit in 64 bits",
            span,
        );
    }

    fn disallowed_expression(&mut self, message: impl Into<String>, span: Span) -> Option<Expr> {
        self.error(ErrorCode::DISALLOWED_EXPRESSION, message, span);
        None
    }

    fn make_error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> MazeError {
        let source_line = self.source.line(span.start_line).unwrap_or("").to_string();
        MazeError::new(&self.source.name, code, message, span, source_line)
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.make_error(code, message, span);
        self.errors.push_error(error);
    }

    fn error_with(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.make_error(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Names bound by assignment, augmented assignment or a `for` target,
/// anywhere in the accepted statement forms.
fn collect_assigned(stmts: &[ast::Stmt], out: &mut BTreeSet<String>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Assign { targets, .. } => {
                out.extend(targets.iter().filter_map(|t| t.as_name()).map(String::from));
            }
            StmtKind::AugAssign { target, .. } => {
                out.extend(target.as_name().map(String::from));
            }
            StmtKind::For { target, body, .. } => {
                out.extend(target.as_name().filter(|n| *n != "_").map(String::from));
                collect_assigned(body, out);
            }
            StmtKind::If { body, orelse, .. } | StmtKind::While { body, orelse, .. } => {
                collect_assigned(body, out);
                collect_assigned(orelse, out);
            }
            _ => {}
        }
    }
}

fn describe_statement(kind: &StmtKind) -> &'static str {
    match kind {
        StmtKind::FunctionDef { .. } => "function definitions are",
        StmtKind::ClassDef { .. } => "class definitions are",
        StmtKind::Import { .. } => "imports are",
        StmtKind::Try { .. } => "'try' blocks are",
        StmtKind::With { .. } => "'with' blocks are",
        StmtKind::Raise(_) => "'raise' is",
        StmtKind::Assert { .. } => "'assert' is",
        StmtKind::Delete(_) => "'del' is",
        StmtKind::Global(_) => "'global' is",
        StmtKind::Nonlocal(_) => "'nonlocal' is",
        StmtKind::Return(_) => "'return' is",
        StmtKind::Break => "'break' is",
        StmtKind::Continue => "'continue' is",
        StmtKind::AnnAssign { .. } => "annotated assignments are",
        _ => "this statement is",
    }
}

fn literal_kind(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::Float(_) => "float",
        ExprKind::Str(_) => "string",
        ExprKind::NoneLit => "None",
        _ => "this kind of",
    }
}
