//! Statements, code blocks and condition lists

use super::GrammarParser;
use crate::SyntaxKind;

impl GrammarParser<'_> {
    /// One statement, declaration or expression
    pub(super) fn item(&mut self) {
        if !self.enter() {
            return;
        }
        match self.current() {
            SyntaxKind::LetKw | SyntaxKind::VarKw => self.variable_decl(),
            SyntaxKind::FuncKw => self.function_decl(),
            SyntaxKind::IfKw => self.if_stmt(),
            SyntaxKind::GuardKw => self.guard_stmt(),
            SyntaxKind::WhileKw => self.while_stmt(),
            SyntaxKind::RepeatKw => self.repeat_stmt(),
            SyntaxKind::ForKw => self.for_stmt(),
            SyntaxKind::ReturnKw => self.return_stmt(),
            SyntaxKind::ThrowKw => self.throw_stmt(),
            SyntaxKind::BreakKw => self.jump_stmt(SyntaxKind::BreakStmt),
            SyntaxKind::ContinueKw => self.jump_stmt(SyntaxKind::ContinueStmt),
            SyntaxKind::DeferKw => self.defer_stmt(),
            SyntaxKind::DoKw => self.do_stmt(),
            _ => self.expr(),
        }
        self.exit();
    }

    /// `{ items }`
    pub(super) fn code_block(&mut self) {
        if !self.at(SyntaxKind::LBrace) {
            self.error_missing("expected '{' to start code block");
            return;
        }
        self.start_node(SyntaxKind::CodeBlock);
        self.bump();
        self.start_node(SyntaxKind::CodeBlockItemList);
        self.item_list(true);
        self.finish_node();
        self.expect_with(SyntaxKind::RBrace, "expected '}' to end code block");
        self.finish_node();
    }

    /// Whether an optional expression follows on the same line
    fn at_trailing_expr(&self) -> bool {
        !self.has_newline_before()
            && !matches!(
                self.current(),
                SyntaxKind::Eof
                    | SyntaxKind::RBrace
                    | SyntaxKind::Semicolon
                    | SyntaxKind::RParen
                    | SyntaxKind::RBracket
                    | SyntaxKind::Comma
            )
    }

    fn condition_list(&mut self) {
        self.start_node(SyntaxKind::ConditionList);
        loop {
            match self.current() {
                SyntaxKind::LetKw | SyntaxKind::VarKw => self.optional_binding(),
                _ => self.expr(),
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// `let name: Type = value` inside a condition
    fn optional_binding(&mut self) {
        self.start_node(SyntaxKind::OptionalBindingCondition);
        self.bump();
        self.pattern();
        if self.at(SyntaxKind::Colon) {
            self.type_annotation();
        }
        if self.at(SyntaxKind::Equal) {
            self.initializer();
        }
        self.finish_node();
    }

    fn if_stmt(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.condition_list();
        self.code_block();
        if self.at(SyntaxKind::ElseKw) {
            self.bump();
            if self.at(SyntaxKind::IfKw) {
                if self.enter() {
                    self.if_stmt();
                    self.exit();
                }
            } else {
                self.code_block();
            }
        }
        self.finish_node();
    }

    fn guard_stmt(&mut self) {
        self.start_node(SyntaxKind::GuardStmt);
        self.bump();
        self.condition_list();
        self.expect_with(SyntaxKind::ElseKw, "expected 'else' after 'guard' condition");
        self.code_block();
        self.finish_node();
    }

    fn while_stmt(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        self.bump();
        self.condition_list();
        self.code_block();
        self.finish_node();
    }

    fn repeat_stmt(&mut self) {
        self.start_node(SyntaxKind::RepeatStmt);
        self.bump();
        self.code_block();
        if self.expect_with(SyntaxKind::WhileKw, "expected 'while' after 'repeat' body") {
            self.expr();
        }
        self.finish_node();
    }

    fn for_stmt(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump();
        self.pattern();
        self.expect_with(SyntaxKind::InKw, "expected 'in' after for-each pattern");
        self.expr();
        if self.at(SyntaxKind::WhereKw) {
            self.start_node(SyntaxKind::WhereClause);
            self.bump();
            self.expr();
            self.finish_node();
        }
        self.code_block();
        self.finish_node();
    }

    fn return_stmt(&mut self) {
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump();
        if self.at_trailing_expr() {
            self.expr();
        }
        self.finish_node();
    }

    fn throw_stmt(&mut self) {
        self.start_node(SyntaxKind::ThrowStmt);
        self.bump();
        self.expr();
        self.finish_node();
    }

    /// `break` / `continue` with an optional label
    fn jump_stmt(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.at(SyntaxKind::Ident) && !self.has_newline_before() {
            self.bump();
        }
        self.finish_node();
    }

    fn defer_stmt(&mut self) {
        self.start_node(SyntaxKind::DeferStmt);
        self.bump();
        self.code_block();
        self.finish_node();
    }

    fn do_stmt(&mut self) {
        self.start_node(SyntaxKind::DoStmt);
        self.bump();
        self.code_block();
        while self.at(SyntaxKind::CatchKw) {
            self.start_node(SyntaxKind::CatchClause);
            self.bump();
            if !self.at(SyntaxKind::LBrace) {
                self.pattern();
            }
            self.code_block();
            self.finish_node();
        }
        self.finish_node();
    }
}
