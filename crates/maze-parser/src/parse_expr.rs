//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 1. `lambda`, `x if c else y`
//! 2. `or`
//! 3. `and`
//! 4. `not`
//! 5. comparisons `== != < <= > >= in not-in is is-not` (chains are kept
//!    whole; the validator rejects them)
//! 6. `|`, `^`, `&`
//! 7. `<<`, `>>`
//! 8. `+`, `-`
//! 9. `*`, `/`, `//`, `%`, `@`
//! 10. unary `-`, `+`, `~`
//! 11. `**`, `await`
//! 12. call, subscript, attribute

use maze_lexer::token::TokenKind;
use maze_types::ast::*;
use maze_types::{ErrorCode, Span};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Points
    // ══════════════════════════════════════════════════════════════════════════

    /// `Test = Lambda | OrTest [ "if" OrTest "else" Test ]`
    pub(crate) fn parse_test(&mut self) -> Option<Expr> {
        self.enter_expr()?;
        let result = self.parse_test_inner();
        self.leave_expr();
        result
    }

    /// `NamedTest = [ Name ":=" ] Test`
    pub(crate) fn parse_named_test(&mut self) -> Option<Expr> {
        let is_walrus = matches!(self.peek_kind(), TokenKind::Identifier(_))
            && self.look_ahead(1) == &TokenKind::ColonEq;
        if !is_walrus {
            return self.parse_test();
        }
        let target = self.parse_atom()?;
        self.advance(); // eat `:=`
        let value = self.parse_test()?;
        let span = target.span.merge(value.span);
        Some(Expr::new(
            ExprKind::NamedExpr {
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// `ExprList = Item { "," Item } [ "," ]`, a `Tuple` when a comma appears.
    pub(crate) fn parse_expression_list(&mut self) -> Option<Expr> {
        self.parse_sequence(Self::parse_star_or_named)
    }

    /// Loop targets: like an expression list, but stops before `in`.
    pub(crate) fn parse_target_list(&mut self) -> Option<Expr> {
        self.parse_sequence(Self::parse_star_or_bitor)
    }

    fn parse_sequence(&mut self, element: fn(&mut Self) -> Option<Expr>) -> Option<Expr> {
        let first = element(self)?;
        if !self.check(&TokenKind::Comma) {
            return Some(first);
        }
        let start = first.span;
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.at_sequence_end() {
                break;
            }
            items.push(element(self)?);
        }
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Tuple(items), span))
    }

    fn at_sequence_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline
                | TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::Eq
                | TokenKind::AugAssign(_)
                | TokenKind::Colon
                | TokenKind::In
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    fn parse_star_or_named(&mut self) -> Option<Expr> {
        if self.check(&TokenKind::Star) {
            let start = self.advance();
            let value = self.parse_bitor()?;
            let span = start.merge(value.span);
            return Some(Expr::new(ExprKind::Starred(Box::new(value)), span));
        }
        self.parse_named_test()
    }

    fn parse_star_or_bitor(&mut self) -> Option<Expr> {
        if self.check(&TokenKind::Star) {
            let start = self.advance();
            let value = self.parse_bitor()?;
            let span = start.merge(value.span);
            return Some(Expr::new(ExprKind::Starred(Box::new(value)), span));
        }
        self.parse_bitor()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_test_inner(&mut self) -> Option<Expr> {
        if self.check(&TokenKind::Lambda) {
            return self.parse_lambda();
        }
        let body = self.parse_or_test()?;
        if !self.eat(&TokenKind::If) {
            return Some(body);
        }
        let test = self.parse_or_test()?;
        self.expect(&TokenKind::Else)?;
        let orelse = self.parse_test()?;
        let span = body.span.merge(orelse.span);
        Some(Expr::new(
            ExprKind::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            },
            span,
        ))
    }

    /// `lambda params: body`. Parameters are skipped.
    fn parse_lambda(&mut self) -> Option<Expr> {
        let start = self.advance();
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Colon if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Newline | TokenKind::Eof => {
                    self.error_at_current(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("expected ':' in lambda, got {}", self.describe_current()),
                    );
                    return None;
                }
                _ => {}
            }
            self.advance();
        }
        self.advance(); // eat `:`
        let body = self.parse_test()?;
        let span = start.merge(body.span);
        Some(Expr::new(
            ExprKind::Lambda {
                body: Box::new(body),
            },
            span,
        ))
    }

    /// `OrTest = AndTest { "or" AndTest }`
    pub(crate) fn parse_or_test(&mut self) -> Option<Expr> {
        self.parse_bool_op(&TokenKind::Or, BoolOp::Or, Self::parse_and_test)
    }

    /// `AndTest = NotTest { "and" NotTest }`
    fn parse_and_test(&mut self) -> Option<Expr> {
        self.parse_bool_op(&TokenKind::And, BoolOp::And, Self::parse_not_test)
    }

    /// Operands of a boolean operator are flattened into one node.
    fn parse_bool_op(
        &mut self,
        token: &TokenKind,
        op: BoolOp,
        operand: fn(&mut Self) -> Option<Expr>,
    ) -> Option<Expr> {
        let first = operand(self)?;
        if !self.check(token) {
            return Some(first);
        }
        let mut values = vec![first];
        while self.eat(token) {
            values.push(operand(self)?);
        }
        let span = values[0].span.merge(values[values.len() - 1].span);
        Some(Expr::new(ExprKind::BoolOp { op, values }, span))
    }

    /// `NotTest = "not" NotTest | Comparison`
    fn parse_not_test(&mut self) -> Option<Expr> {
        if !self.check(&TokenKind::Not) {
            return self.parse_comparison();
        }
        let start = self.advance();
        self.enter_expr()?;
        let operand = self.parse_not_test();
        self.leave_expr();
        let operand = operand?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `Comparison = BitOr { CompOp BitOr }`
    fn parse_comparison(&mut self) -> Option<Expr> {
        let left = self.parse_bitor()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.eat_comparison_op() {
            ops.push(op);
            comparators.push(self.parse_bitor()?);
        }
        let Some(last) = comparators.last() else {
            return Some(left);
        };
        let span = left.span.merge(last.span);
        Some(Expr::new(
            ExprKind::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
            span,
        ))
    }

    fn eat_comparison_op(&mut self) -> Option<CmpOp> {
        let (op, len) = match (self.peek_kind(), self.look_ahead(1)) {
            (TokenKind::EqEq, _) => (CmpOp::Eq, 1),
            (TokenKind::BangEq, _) => (CmpOp::NotEq, 1),
            (TokenKind::Less, _) => (CmpOp::Lt, 1),
            (TokenKind::LessEq, _) => (CmpOp::LtE, 1),
            (TokenKind::Greater, _) => (CmpOp::Gt, 1),
            (TokenKind::GreaterEq, _) => (CmpOp::GtE, 1),
            (TokenKind::In, _) => (CmpOp::In, 1),
            (TokenKind::Not, TokenKind::In) => (CmpOp::NotIn, 2),
            (TokenKind::Is, TokenKind::Not) => (CmpOp::IsNot, 2),
            (TokenKind::Is, _) => (CmpOp::Is, 1),
            _ => return None,
        };
        for _ in 0..len {
            self.advance();
        }
        Some(op)
    }

    /// `BitOr = BitXor { "|" BitXor }`
    pub(crate) fn parse_bitor(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_bitxor, |kind| match kind {
            TokenKind::Pipe => Some(BinOp::BitOr),
            _ => None,
        })
    }

    fn parse_bitxor(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_bitand, |kind| match kind {
            TokenKind::Caret => Some(BinOp::BitXor),
            _ => None,
        })
    }

    fn parse_bitand(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_shift, |kind| match kind {
            TokenKind::Amp => Some(BinOp::BitAnd),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_arith, |kind| match kind {
            TokenKind::LShift => Some(BinOp::LShift),
            TokenKind::RShift => Some(BinOp::RShift),
            _ => None,
        })
    }

    /// `Arith = Term { ("+" | "-") Term }`
    fn parse_arith(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_term, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    /// `Term = Factor { ("*" | "/" | "//" | "%" | "@") Factor }`
    fn parse_term(&mut self) -> Option<Expr> {
        self.parse_binary_level(Self::parse_factor, |kind| match kind {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::DoubleSlash => Some(BinOp::FloorDiv),
            TokenKind::Percent => Some(BinOp::Mod),
            TokenKind::At => Some(BinOp::MatMul),
            _ => None,
        })
    }

    /// One left-associative binary precedence level.
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> Option<Expr>,
        operator: fn(&TokenKind) -> Option<BinOp>,
    ) -> Option<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = operator(self.peek_kind()) {
            self.advance();
            let right = operand(self)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `Factor = ("-" | "+" | "~") Factor | Power`
    fn parse_factor(&mut self) -> Option<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        let start = self.advance();
        self.enter_expr()?;
        let operand = self.parse_factor();
        self.leave_expr();
        let operand = operand?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `Power = ["await"] Primary [ "**" Factor ]`
    fn parse_power(&mut self) -> Option<Expr> {
        let base = if self.check(&TokenKind::Await) {
            let start = self.advance();
            let value = self.parse_primary()?;
            let span = start.merge(value.span);
            Expr::new(ExprKind::Await(Box::new(value)), span)
        } else {
            self.parse_primary()?
        };

        if !self.eat(&TokenKind::DoubleStar) {
            return Some(base);
        }
        self.enter_expr()?;
        let exponent = self.parse_factor();
        self.leave_expr();
        let exponent = exponent?;
        let span = base.span.merge(exponent.span);
        Some(Expr::new(
            ExprKind::Binary {
                left: Box::new(base),
                op: BinOp::Pow,
                right: Box::new(exponent),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary & Trailers
    // ══════════════════════════════════════════════════════════════════════════

    /// `Primary = Atom { Call | Subscript | "." Name }`
    fn parse_primary(&mut self) -> Option<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let (args, keywords) = self.parse_call_args()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            func: Box::new(expr),
                            args,
                            keywords,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_subscript()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Subscript {
                            value: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let attr = self.expect_identifier()?;
                    let span = expr.span.merge(attr.span);
                    expr = Expr::new(
                        ExprKind::Attribute {
                            value: Box::new(expr),
                            attr,
                        },
                        span,
                    );
                }
                _ => return Some(expr),
            }
        }
    }

    /// Arguments after `(` up to and including `)`.
    fn parse_call_args(&mut self) -> Option<(Vec<Expr>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        loop {
            if self.eat(&TokenKind::RParen) {
                break;
            }
            match self.peek_kind() {
                TokenKind::Star => {
                    let start = self.advance();
                    let value = self.parse_test()?;
                    let span = start.merge(value.span);
                    args.push(Expr::new(ExprKind::Starred(Box::new(value)), span));
                }
                TokenKind::DoubleStar => {
                    let start = self.advance();
                    let value = self.parse_test()?;
                    let span = start.merge(value.span);
                    keywords.push(Keyword {
                        name: None,
                        value,
                        span,
                    });
                }
                TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::Eq => {
                    let name = self.expect_identifier()?;
                    self.advance(); // eat `=`
                    let value = self.parse_test()?;
                    let span = name.span.merge(value.span);
                    keywords.push(Keyword {
                        name: Some(name),
                        value,
                        span,
                    });
                }
                _ => {
                    let arg = self.parse_named_test()?;
                    let arg = self.maybe_comprehension(arg, ComprehensionKind::Generator)?;
                    args.push(arg);
                }
            }
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen)?;
                break;
            }
        }
        Some((args, keywords))
    }

    /// Subscript contents after `[` up to and including `]`.
    fn parse_subscript(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let mut items = vec![self.parse_slice()?];
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::RBracket) {
                break;
            }
            items.push(self.parse_slice()?);
        }
        self.expect(&TokenKind::RBracket)?;
        if items.len() == 1 {
            return items.pop();
        }
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Tuple(items), span))
    }

    /// `Slice = Test | [Test] ":" [Test] [":" [Test]]`. A slice is kept as a
    /// tuple of its present parts.
    fn parse_slice(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let lower = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_star_or_named()?)
        };
        if !self.check(&TokenKind::Colon) {
            return lower;
        }
        let mut parts: Vec<Expr> = lower.into_iter().collect();
        while self.eat(&TokenKind::Colon) {
            if !matches!(
                self.peek_kind(),
                TokenKind::Colon | TokenKind::Comma | TokenKind::RBracket
            ) {
                parts.push(self.parse_test()?);
            }
        }
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Tuple(parts), span))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Atoms
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_atom(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                ExprKind::Name(name)
            }
            TokenKind::Int(value) => {
                self.advance();
                ExprKind::Int(value)
            }
            TokenKind::Float(value) => {
                self.advance();
                ExprKind::Float(value)
            }
            TokenKind::Str(first) => {
                self.advance();
                let mut text = first;
                while let TokenKind::Str(next) = self.peek_kind() {
                    text.push_str(next);
                    self.advance();
                }
                ExprKind::Str(text)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::None => {
                self.advance();
                ExprKind::NoneLit
            }
            // `...`
            TokenKind::Dot
                if self.look_ahead(1) == &TokenKind::Dot
                    && self.look_ahead(2) == &TokenKind::Dot =>
            {
                self.advance();
                self.advance();
                self.advance();
                ExprKind::NoneLit
            }
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => return self.parse_list_display(),
            TokenKind::LBrace => return self.parse_brace_display(),
            TokenKind::Yield => {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "'yield' outside function");
                return None;
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected an expression, got {}", self.describe_current()),
                );
                return None;
            }
        };
        Some(Expr::new(kind, start.merge(self.previous_span())))
    }

    /// `( )`, `(expr)`, `(a, b)`, `(x for x in y)`
    fn parse_paren(&mut self) -> Option<Expr> {
        let start = self.advance();
        if self.eat(&TokenKind::RParen) {
            let span = start.merge(self.previous_span());
            return Some(Expr::new(ExprKind::Tuple(Vec::new()), span));
        }
        let first = self.parse_star_or_named()?;
        if self.is_comprehension_start() {
            let comp = self.maybe_comprehension(first, ComprehensionKind::Generator)?;
            self.expect(&TokenKind::RParen)?;
            return Some(Expr::new(comp.kind, start.merge(self.previous_span())));
        }
        if !self.check(&TokenKind::Comma) {
            self.expect(&TokenKind::RParen)?;
            return Some(first);
        }
        let items = self.parse_display_tail(first, &TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Tuple(items), span))
    }

    /// `[ ]`, `[a, b]`, `[x for x in y]`
    fn parse_list_display(&mut self) -> Option<Expr> {
        let start = self.advance();
        if self.eat(&TokenKind::RBracket) {
            let span = start.merge(self.previous_span());
            return Some(Expr::new(ExprKind::List(Vec::new()), span));
        }
        let first = self.parse_star_or_named()?;
        if self.is_comprehension_start() {
            let comp = self.maybe_comprehension(first, ComprehensionKind::List)?;
            self.expect(&TokenKind::RBracket)?;
            return Some(Expr::new(comp.kind, start.merge(self.previous_span())));
        }
        let items = self.parse_display_tail(first, &TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::List(items), span))
    }

    /// `{ }`, `{k: v}`, `{a, b}` and their comprehensions.
    fn parse_brace_display(&mut self) -> Option<Expr> {
        let start = self.advance();
        if self.eat(&TokenKind::RBrace) {
            let span = start.merge(self.previous_span());
            return Some(Expr::new(ExprKind::Dict(Vec::new()), span));
        }

        let is_dict = self.check(&TokenKind::DoubleStar) || {
            let first_is_entry_key = !self.check(&TokenKind::Star);
            first_is_entry_key && self.scan_for_dict_colon()
        };

        if !is_dict {
            let first = self.parse_star_or_named()?;
            if self.is_comprehension_start() {
                let comp = self.maybe_comprehension(first, ComprehensionKind::Set)?;
                self.expect(&TokenKind::RBrace)?;
                return Some(Expr::new(comp.kind, start.merge(self.previous_span())));
            }
            let items = self.parse_display_tail(first, &TokenKind::RBrace)?;
            let span = start.merge(self.previous_span());
            return Some(Expr::new(ExprKind::Set(items), span));
        }

        let mut entries = Vec::new();
        loop {
            let entry = self.parse_dict_entry()?;
            if entries.is_empty() && self.is_comprehension_start() {
                let (_, value) = entry;
                let comp = self.maybe_comprehension(value, ComprehensionKind::Dict)?;
                self.expect(&TokenKind::RBrace)?;
                return Some(Expr::new(comp.kind, start.merge(self.previous_span())));
            }
            entries.push(entry);
            if !self.eat(&TokenKind::Comma) || self.check(&TokenKind::RBrace) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Dict(entries), span))
    }

    /// `key: value` or `**mapping` (key is `None`).
    fn parse_dict_entry(&mut self) -> Option<(Expr, Expr)> {
        if self.check(&TokenKind::DoubleStar) {
            let start = self.advance();
            let value = self.parse_bitor()?;
            return Some((Expr::new(ExprKind::NoneLit, start), value));
        }
        let key = self.parse_test()?;
        self.expect(&TokenKind::Colon)?;
        let value = self.parse_test()?;
        Some((key, value))
    }

    /// Whether a top-level `:` follows before the next `,` or `}`.
    fn scan_for_dict_colon(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        loop {
            match self.look_ahead(offset) {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace if depth == 0 => return false,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Lambda if depth == 0 => return false,
                TokenKind::Colon if depth == 0 => return true,
                TokenKind::Comma if depth == 0 => return false,
                TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
    }

    /// Remaining comma-separated items of a display after `first`, up to and
    /// including `close`.
    fn parse_display_tail(&mut self, first: Expr, close: &TokenKind) -> Option<Vec<Expr>> {
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.check(close) {
                break;
            }
            items.push(self.parse_star_or_named()?);
        }
        self.expect(close)?;
        Some(items)
    }

    // ── Comprehensions ────────────────────────────────────────────────────────

    fn is_comprehension_start(&self) -> bool {
        self.check(&TokenKind::For)
            || (self.check(&TokenKind::Async) && self.look_ahead(1) == &TokenKind::For)
    }

    /// Wrap `element` in a comprehension if `for` clauses follow.
    fn maybe_comprehension(&mut self, element: Expr, kind: ComprehensionKind) -> Option<Expr> {
        if !self.is_comprehension_start() {
            return Some(element);
        }
        let start = element.span;
        while self.is_comprehension_start() {
            self.eat(&TokenKind::Async);
            self.advance(); // eat `for`
            self.parse_target_list()?;
            self.expect(&TokenKind::In)?;
            self.parse_or_test()?;
            while self.eat(&TokenKind::If) {
                self.parse_or_test()?;
            }
        }
        let span: Span = start.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Comprehension {
                kind,
                element: Box::new(element),
            },
            span,
        ))
    }
}
