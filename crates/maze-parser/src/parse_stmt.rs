//! Statement parsing: modules, suites, compound and simple statements.

use maze_lexer::token::TokenKind;
use maze_types::ast::*;
use maze_types::{ErrorCode, Span};

use crate::parser::{Parser, MAX_BLOCK_DEPTH};

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Module & Suites
    // ══════════════════════════════════════════════════════════════════════════

    /// `Module = { Statement } Eof`
    pub(crate) fn parse_module(&mut self) -> Option<Module> {
        let start = self.current_span();
        let mut body = Vec::new();
        while !self.at_end() {
            self.parse_statement(&mut body)?;
        }
        let span = match body.last() {
            Some(last) => start.merge(last.span),
            None => start,
        };
        Some(Module { body, span })
    }

    /// A suite after a header's `:`. Either simple statements on the same
    /// line, or `Newline Indent { Statement } Dedent`.
    fn parse_suite(&mut self, header: &str, header_span: Span) -> Option<Vec<Stmt>> {
        self.expect(&TokenKind::Colon)?;

        self.block_depth += 1;
        if self.block_depth > MAX_BLOCK_DEPTH {
            self.error_at(
                ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                format!("blocks are nested too deeply (limit is {MAX_BLOCK_DEPTH})"),
                header_span,
            );
            return None;
        }

        let mut body = Vec::new();
        if self.eat(&TokenKind::Newline) {
            if !self.eat(&TokenKind::Indent) {
                let error = self
                    .make_error(
                        ErrorCode::EXPECTED_INDENTED_BLOCK,
                        format!(
                            "expected an indented block after '{header}' on line {}",
                            header_span.start_line
                        ),
                        self.current_span(),
                    )
                    .with_suggestion("indent the body of the block by 4 spaces");
                self.push_error(error);
                return None;
            }
            while !self.eat(&TokenKind::Dedent) {
                if self.at_end() {
                    break;
                }
                self.parse_statement(&mut body)?;
            }
        } else {
            self.parse_simple_line(&mut body)?;
        }

        self.block_depth -= 1;
        Some(body)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse one statement line (compound, or `;`-separated simple statements)
    /// and append the result to `out`.
    pub(crate) fn parse_statement(&mut self, out: &mut Vec<Stmt>) -> Option<()> {
        let stmt = match self.peek_kind() {
            TokenKind::Indent => {
                let error = self
                    .make_error(
                        ErrorCode::UNEXPECTED_INDENT,
                        "unexpected indent",
                        self.current_span(),
                    )
                    .with_suggestion("line this statement up with the statements around it");
                self.push_error(error);
                return None;
            }
            TokenKind::If => self.parse_if("if")?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Def => self.parse_def(false)?,
            TokenKind::Async => {
                let start = self.advance();
                if !self.check(&TokenKind::Def) {
                    self.error_at_current(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("expected 'def' after 'async', got {}", self.describe_current()),
                    );
                    return None;
                }
                let mut stmt = self.parse_def(true)?;
                stmt.span = start.merge(stmt.span);
                stmt
            }
            TokenKind::Class => self.parse_class()?,
            TokenKind::Try => self.parse_try()?,
            TokenKind::With => self.parse_with()?,
            TokenKind::At => self.parse_decorated()?,
            TokenKind::Elif | TokenKind::Else | TokenKind::Except | TokenKind::Finally => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("{} without a matching block", self.describe_current()),
                );
                return None;
            }
            _ => return self.parse_simple_line(out),
        };
        out.push(stmt);
        Some(())
    }

    /// `SimpleLine = SimpleStmt { ";" SimpleStmt } [ ";" ] Newline`
    fn parse_simple_line(&mut self, out: &mut Vec<Stmt>) -> Option<()> {
        loop {
            let stmt = self.parse_simple_statement()?;
            out.push(stmt);
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
            if self.check(&TokenKind::Newline) || self.at_end() {
                break;
            }
        }
        self.expect_line_end()
    }

    fn parse_simple_statement(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::Pass => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at_line_end() {
                    None
                } else {
                    Some(self.parse_expression_list()?)
                };
                StmtKind::Return(value)
            }
            TokenKind::Raise => {
                self.advance();
                let value = if self.at_line_end() {
                    None
                } else {
                    let exc = self.parse_test()?;
                    if self.eat(&TokenKind::From) {
                        self.parse_test()?;
                    }
                    Some(exc)
                };
                StmtKind::Raise(value)
            }
            TokenKind::Assert => {
                self.advance();
                let test = self.parse_test()?;
                let msg = if self.eat(&TokenKind::Comma) {
                    Some(self.parse_test()?)
                } else {
                    None
                };
                StmtKind::Assert { test, msg }
            }
            TokenKind::Del => {
                self.advance();
                let mut targets = vec![self.parse_bitor()?];
                while self.eat(&TokenKind::Comma) && !self.at_line_end() {
                    targets.push(self.parse_bitor()?);
                }
                StmtKind::Delete(targets)
            }
            TokenKind::Global | TokenKind::Nonlocal => {
                let is_global = self.check(&TokenKind::Global);
                self.advance();
                let mut names = vec![self.expect_identifier()?];
                while self.eat(&TokenKind::Comma) {
                    names.push(self.expect_identifier()?);
                }
                if is_global {
                    StmtKind::Global(names)
                } else {
                    StmtKind::Nonlocal(names)
                }
            }
            TokenKind::Import => self.parse_import()?,
            TokenKind::From => self.parse_from_import()?,
            TokenKind::Yield => {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "'yield' outside function");
                return None;
            }
            _ => return self.parse_expression_statement(),
        };
        Some(Stmt::new(kind, start.merge(self.previous_span())))
    }

    /// Expression statements, assignments, augmented and annotated
    /// assignments.
    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let first = self.parse_expression_list()?;

        let kind = match self.peek_kind().clone() {
            TokenKind::Eq => {
                let mut targets = vec![first];
                let mut value = None;
                while self.eat(&TokenKind::Eq) {
                    let next = self.parse_expression_list()?;
                    if let Some(previous) = value.replace(next) {
                        targets.push(previous);
                    }
                }
                let value = value?;
                StmtKind::Assign { targets, value }
            }
            TokenKind::AugAssign(op) => {
                self.advance();
                let value = self.parse_expression_list()?;
                StmtKind::AugAssign {
                    target: first,
                    op,
                    value,
                }
            }
            TokenKind::Colon => {
                self.advance();
                let annotation = self.parse_test()?;
                let value = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_expression_list()?)
                } else {
                    None
                };
                StmtKind::AnnAssign {
                    target: first,
                    annotation,
                    value,
                }
            }
            _ => StmtKind::Expr(first),
        };
        Some(Stmt::new(kind, start.merge(self.previous_span())))
    }

    pub(crate) fn at_line_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    // ── Compound statements ───────────────────────────────────────────────────

    /// `if test: suite { elif test: suite } [ else: suite ]`
    ///
    /// `elif` arms become a nested `If` in `orelse`.
    fn parse_if(&mut self, keyword: &str) -> Option<Stmt> {
        let start = self.advance();
        let test = self.parse_named_test()?;
        let body = self.parse_suite(keyword, start)?;

        let orelse = if self.check(&TokenKind::Elif) {
            vec![self.parse_if("elif")?]
        } else if self.check(&TokenKind::Else) {
            let else_span = self.advance();
            self.parse_suite("else", else_span)?
        } else {
            Vec::new()
        };

        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::If { test, body, orelse }, span))
    }

    /// `while test: suite [ else: suite ]`
    fn parse_while(&mut self) -> Option<Stmt> {
        let start = self.advance();
        let test = self.parse_named_test()?;
        let body = self.parse_suite("while", start)?;
        let orelse = self.parse_else_suite()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::While { test, body, orelse }, span))
    }

    /// `for targets in expressions: suite [ else: suite ]`
    fn parse_for(&mut self) -> Option<Stmt> {
        let start = self.advance();
        let target = self.parse_target_list()?;
        self.expect(&TokenKind::In)?;
        let iter = self.parse_expression_list()?;
        let body = self.parse_suite("for", start)?;
        let orelse = self.parse_else_suite()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::new(
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            },
            span,
        ))
    }

    fn parse_else_suite(&mut self) -> Option<Vec<Stmt>> {
        if self.check(&TokenKind::Else) {
            let else_span = self.advance();
            self.parse_suite("else", else_span)
        } else {
            Some(Vec::new())
        }
    }

    /// `def name(params) [-> annotation]: suite`
    fn parse_def(&mut self, is_async: bool) -> Option<Stmt> {
        let start = self.advance();
        let name = self.expect_identifier()?;
        self.skip_parenthesized()?;
        if self.eat(&TokenKind::Arrow) {
            self.parse_test()?;
        }
        let body = self.parse_suite("def", start)?;
        let span = start.merge(self.previous_span());
        Some(Stmt::new(
            StmtKind::FunctionDef {
                name,
                is_async,
                body,
            },
            span,
        ))
    }

    /// `class Name[(bases)]: suite`
    fn parse_class(&mut self) -> Option<Stmt> {
        let start = self.advance();
        let name = self.expect_identifier()?;
        if self.check(&TokenKind::LParen) {
            self.skip_parenthesized()?;
        }
        let body = self.parse_suite("class", start)?;
        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::ClassDef { name, body }, span))
    }

    /// `@decorator Newline` followed by `def` or `class`.
    fn parse_decorated(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        while self.eat(&TokenKind::At) {
            self.parse_test()?;
            self.expect(&TokenKind::Newline)?;
        }
        let mut stmt = match self.peek_kind() {
            TokenKind::Def => self.parse_def(false)?,
            TokenKind::Class => self.parse_class()?,
            TokenKind::Async if self.look_ahead(1) == &TokenKind::Def => {
                self.advance();
                self.parse_def(true)?
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!(
                        "expected 'def' or 'class' after a decorator, got {}",
                        self.describe_current()
                    ),
                );
                return None;
            }
        };
        stmt.span = start.merge(stmt.span);
        Some(stmt)
    }

    /// `try: suite { except [test [as name]]: suite } [else: suite] [finally: suite]`
    fn parse_try(&mut self) -> Option<Stmt> {
        let start = self.advance();
        let body = self.parse_suite("try", start)?;

        let mut handlers = Vec::new();
        while self.check(&TokenKind::Except) {
            let except_span = self.advance();
            self.eat(&TokenKind::Star);
            if !self.check(&TokenKind::Colon) {
                self.parse_test()?;
                if self.eat(&TokenKind::As) {
                    self.expect_identifier()?;
                } else if self.eat(&TokenKind::Comma) {
                    self.parse_test()?;
                }
            }
            handlers.push(self.parse_suite("except", except_span)?);
        }

        let orelse = if !handlers.is_empty() {
            self.parse_else_suite()?
        } else {
            Vec::new()
        };

        let finalbody = if self.check(&TokenKind::Finally) {
            let finally_span = self.advance();
            self.parse_suite("finally", finally_span)?
        } else {
            Vec::new()
        };

        if handlers.is_empty() && finalbody.is_empty() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected 'except' or 'finally' block",
            );
            return None;
        }

        let span = start.merge(self.previous_span());
        Some(Stmt::new(
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            },
            span,
        ))
    }

    /// `with item [as target] { , item [as target] }: suite`
    fn parse_with(&mut self) -> Option<Stmt> {
        let start = self.advance();
        let mut items = Vec::new();
        loop {
            items.push(self.parse_test()?);
            if self.eat(&TokenKind::As) {
                self.parse_bitor()?;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let body = self.parse_suite("with", start)?;
        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::With { items, body }, span))
    }

    // ── Imports ───────────────────────────────────────────────────────────────

    /// `import a.b [as c] { , ... }`
    fn parse_import(&mut self) -> Option<StmtKind> {
        self.advance();
        let mut modules = vec![self.parse_dotted_name()?];
        if self.eat(&TokenKind::As) {
            self.expect_identifier()?;
        }
        while self.eat(&TokenKind::Comma) {
            modules.push(self.parse_dotted_name()?);
            if self.eat(&TokenKind::As) {
                self.expect_identifier()?;
            }
        }
        Some(StmtKind::Import {
            module: modules.join(", "),
        })
    }

    /// `from [.]* a.b import (* | names | (names))`
    fn parse_from_import(&mut self) -> Option<StmtKind> {
        self.advance();
        let mut module = String::new();
        while self.eat(&TokenKind::Dot) {
            module.push('.');
        }
        if !self.check(&TokenKind::Import) {
            module.push_str(&self.parse_dotted_name()?);
        }
        self.expect(&TokenKind::Import)?;

        if self.eat(&TokenKind::Star) {
            return Some(StmtKind::Import { module });
        }
        let parenthesized = self.eat(&TokenKind::LParen);
        loop {
            self.expect_identifier()?;
            if self.eat(&TokenKind::As) {
                self.expect_identifier()?;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            if parenthesized && self.check(&TokenKind::RParen) {
                break;
            }
        }
        if parenthesized {
            self.expect(&TokenKind::RParen)?;
        }
        Some(StmtKind::Import { module })
    }

    fn parse_dotted_name(&mut self) -> Option<String> {
        let mut name = self.expect_identifier()?.name;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_identifier()?.name);
        }
        Some(name)
    }

    /// Skip a balanced `( ... )` group (parameter lists, class bases).
    fn skip_parenthesized(&mut self) -> Option<()> {
        self.expect(&TokenKind::LParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    self.error_at_current(ErrorCode::UNCLOSED_BRACKET, "'(' was never closed");
                    return None;
                }
                _ => {}
            }
            self.advance();
        }
        Some(())
    }
}
