//! Expressions
//!
//! Binary operators are parsed by precedence climbing. Whether an operator
//! is prefix, postfix or infix depends on the whitespace around it: glued on
//! both sides or on neither side means infix, glued only on the right means
//! prefix, glued only on the left means postfix.

use super::GrammarParser;
use crate::SyntaxKind;

/// Binding power of a binary operator, and whether it is right-associative
fn binary_precedence(text: &str) -> (u8, bool) {
    match text {
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" => (1, true),
        "||" => (2, false),
        "&&" => (3, false),
        "==" | "!=" | "===" | "!==" | "<" | ">" | "<=" | ">=" | "~=" => (4, false),
        "+" | "-" | "|" | "^" | "&+" | "&-" => (6, false),
        "*" | "/" | "%" | "&" | "&*" => (7, false),
        // ranges, `??` and operators we know nothing about
        _ => (5, false),
    }
}

impl GrammarParser<'_> {
    pub(super) fn expr(&mut self) {
        self.expr_bp(1);
    }

    fn expr_bp(&mut self, min_precedence: u8) {
        if !self.enter() {
            return;
        }

        let lhs = self.checkpoint();
        self.prefix_expr();

        while let Some((precedence, right_assoc)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.start_node_at(lhs, SyntaxKind::InfixOperatorExpr);
            self.bump();
            let next = if right_assoc { precedence } else { precedence + 1 };
            self.expr_bp(next);
            self.finish_node();
        }

        self.exit();
    }

    /// Precedence of the current token if it is used as an infix operator
    fn binary_operator(&self) -> Option<(u8, bool)> {
        let index = self.nth_index(0)?;
        let token = self.tokens[index];
        match token.kind {
            SyntaxKind::Equal => Some(binary_precedence("=")),
            SyntaxKind::Operator if self.left_bound(index) == self.right_bound(index) => {
                Some(binary_precedence(token.text))
            }
            _ => None,
        }
    }

    fn prefix_expr(&mut self) {
        let Some(index) = self.nth_index(0) else {
            self.postfix_expr();
            return;
        };
        if self.tokens[index].kind != SyntaxKind::Operator {
            self.postfix_expr();
            return;
        }
        if !self.enter() {
            return;
        }

        if !self.right_bound(index) {
            self.error_at(
                self.current_range(),
                "unary operator cannot be separated from its operand",
            );
        }
        self.start_node(SyntaxKind::PrefixOperatorExpr);
        self.bump();
        self.prefix_expr();
        self.finish_node();

        self.exit();
    }

    fn postfix_expr(&mut self) {
        let operand = self.checkpoint();
        self.primary_expr();

        while let Some(index) = self.nth_index(0) {
            match self.tokens[index].kind {
                SyntaxKind::Period => {
                    self.start_node_at(operand, SyntaxKind::MemberAccessExpr);
                    self.bump();
                    self.member_name();
                    self.finish_node();
                }
                SyntaxKind::LParen if !self.has_newline_before() => {
                    self.start_node_at(operand, SyntaxKind::FunctionCallExpr);
                    self.argument_list(SyntaxKind::LParen, SyntaxKind::RParen);
                    self.finish_node();
                }
                SyntaxKind::LBracket if !self.has_newline_before() => {
                    self.start_node_at(operand, SyntaxKind::SubscriptCallExpr);
                    self.argument_list(SyntaxKind::LBracket, SyntaxKind::RBracket);
                    self.finish_node();
                }
                SyntaxKind::QuestionMark if self.left_bound(index) => {
                    self.start_node_at(operand, SyntaxKind::PostfixOperatorExpr);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::Operator if self.left_bound(index) && !self.right_bound(index) => {
                    self.start_node_at(operand, SyntaxKind::PostfixOperatorExpr);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn member_name(&mut self) {
        if self.at(SyntaxKind::Ident) || self.at(SyntaxKind::IntegerLiteral) {
            self.bump();
        } else {
            self.error_missing("expected member name following '.'");
        }
    }

    fn primary_expr(&mut self) {
        match self.current() {
            SyntaxKind::Ident | SyntaxKind::Wildcard => {
                self.token_node(SyntaxKind::DeclReferenceExpr)
            }
            SyntaxKind::IntegerLiteral => self.token_node(SyntaxKind::IntegerLiteralExpr),
            SyntaxKind::FloatLiteral => self.token_node(SyntaxKind::FloatLiteralExpr),
            SyntaxKind::StringLiteral | SyntaxKind::MultilineStringLiteral => {
                self.token_node(SyntaxKind::StringLiteralExpr)
            }
            SyntaxKind::TrueKw | SyntaxKind::FalseKw => {
                self.token_node(SyntaxKind::BooleanLiteralExpr)
            }
            SyntaxKind::NilKw => self.token_node(SyntaxKind::NilLiteralExpr),
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::TupleExpr);
                self.argument_list(SyntaxKind::LParen, SyntaxKind::RParen);
                self.finish_node();
            }
            SyntaxKind::LBracket => self.array_expr(),
            SyntaxKind::Period => {
                // implicit member, `.none`
                self.start_node(SyntaxKind::MemberAccessExpr);
                self.bump();
                self.member_name();
                self.finish_node();
            }
            SyntaxKind::Eof
            | SyntaxKind::RBrace
            | SyntaxKind::LBrace
            | SyntaxKind::Semicolon
            | SyntaxKind::Comma => self.error_missing("expected expression"),
            _ => self.error_and_bump("expected expression"),
        }
    }

    fn array_expr(&mut self) {
        self.start_node(SyntaxKind::ArrayExpr);
        self.bump();
        while !self.at(SyntaxKind::RBracket) && !self.at(SyntaxKind::Eof) {
            self.expr();
            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_with(SyntaxKind::RBracket, "expected ']' to end array literal");
        self.finish_node();
    }

    /// `(a, label: b)` or `[i]`
    fn argument_list(&mut self, open: SyntaxKind, close: SyntaxKind) {
        self.bump_as(open);
        while !self.at(close) && !self.at(SyntaxKind::Eof) {
            if !self.labeled_expr() {
                break;
            }
        }
        let message = format!("expected {} to end argument list", close.describe());
        self.expect_with(close, &message);
    }

    /// Returns whether a `,` followed
    fn labeled_expr(&mut self) -> bool {
        self.start_node(SyntaxKind::LabeledExpr);
        if (self.at(SyntaxKind::Ident) || self.at(SyntaxKind::Wildcard))
            && self.nth(1) == SyntaxKind::Colon
        {
            self.bump();
            self.bump();
        }
        self.expr();
        let more = self.at(SyntaxKind::Comma);
        if more {
            self.bump();
        }
        self.finish_node();
        more
    }
}
