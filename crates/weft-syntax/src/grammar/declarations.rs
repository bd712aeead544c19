//! Declarations, patterns and types

use super::GrammarParser;
use crate::SyntaxKind;
use crate::keywords::Keyword;

impl GrammarParser<'_> {
    /// `let a = 1, b: Int`
    pub(super) fn variable_decl(&mut self) {
        self.start_node(SyntaxKind::VariableDecl);
        self.bump();
        while self.pattern_binding() {}
        self.finish_node();
    }

    /// Returns whether another binding follows
    fn pattern_binding(&mut self) -> bool {
        self.start_node(SyntaxKind::PatternBinding);
        self.pattern();
        if self.at(SyntaxKind::Colon) {
            self.type_annotation();
        }
        if self.at(SyntaxKind::Equal) {
            self.initializer();
        }
        let more = self.at(SyntaxKind::Comma);
        if more {
            self.bump();
        }
        self.finish_node();
        more
    }

    pub(super) fn type_annotation(&mut self) {
        self.start_node(SyntaxKind::TypeAnnotation);
        self.bump();
        self.type_();
        self.finish_node();
    }

    pub(super) fn initializer(&mut self) {
        self.start_node(SyntaxKind::InitializerClause);
        self.bump();
        self.expr();
        self.finish_node();
    }

    /// `func name(label param: Type) throws -> Type { ... }`
    pub(super) fn function_decl(&mut self) {
        self.start_node(SyntaxKind::FunctionDecl);
        self.bump();
        self.expect_with(SyntaxKind::Ident, "expected identifier in function declaration");
        self.parameter_clause();
        if self.at_contextual(Keyword::Throws.text()) {
            self.bump_as(SyntaxKind::ThrowsKw);
        }
        if self.at(SyntaxKind::Arrow) {
            self.start_node(SyntaxKind::ReturnClause);
            self.bump();
            self.type_();
            self.finish_node();
        }
        if self.at(SyntaxKind::LBrace) {
            self.code_block();
        }
        self.finish_node();
    }

    fn parameter_clause(&mut self) {
        if !self.at(SyntaxKind::LParen) {
            self.error_missing("expected '(' in function declaration");
            return;
        }
        self.start_node(SyntaxKind::ParameterClause);
        self.bump();
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            if !self.parameter() {
                break;
            }
        }
        self.expect_with(SyntaxKind::RParen, "expected ')' to end parameter clause");
        self.finish_node();
    }

    /// Returns whether another parameter follows
    fn parameter(&mut self) -> bool {
        self.start_node(SyntaxKind::FunctionParameter);
        let is_name = |kind: SyntaxKind| matches!(kind, SyntaxKind::Ident | SyntaxKind::Wildcard);
        if is_name(self.current()) {
            self.bump();
            if is_name(self.current()) {
                self.bump();
            }
        } else {
            self.error_missing("expected parameter name");
        }
        if self.expect_with(SyntaxKind::Colon, "expected ':' after parameter name") {
            self.type_();
        }
        if self.at(SyntaxKind::Equal) {
            self.initializer();
        }
        let more = self.at(SyntaxKind::Comma);
        if more {
            self.bump();
        }
        self.finish_node();
        more
    }

    pub(super) fn pattern(&mut self) {
        if !self.enter() {
            return;
        }
        match self.current() {
            SyntaxKind::Ident => self.token_node(SyntaxKind::IdentifierPattern),
            SyntaxKind::Wildcard => self.token_node(SyntaxKind::WildcardPattern),
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::TuplePattern);
                self.bump();
                while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                    self.pattern();
                    if self.at(SyntaxKind::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.expect_with(SyntaxKind::RParen, "expected ')' to end tuple pattern");
                self.finish_node();
            }
            _ => self.error_missing("expected pattern"),
        }
        self.exit();
    }

    pub(super) fn type_(&mut self) {
        if !self.enter() {
            return;
        }
        let base = self.checkpoint();
        match self.current() {
            SyntaxKind::Ident => self.token_node(SyntaxKind::IdentifierType),
            SyntaxKind::LBracket => {
                self.start_node(SyntaxKind::ArrayType);
                self.bump();
                self.type_();
                self.expect_with(SyntaxKind::RBracket, "expected ']' in array type");
                self.finish_node();
            }
            _ => {
                self.error_missing("expected type");
                self.exit();
                return;
            }
        }
        while let Some(index) = self.nth_index(0) {
            if self.tokens[index].kind != SyntaxKind::QuestionMark || !self.left_bound(index) {
                break;
            }
            self.start_node_at(base, SyntaxKind::OptionalType);
            self.bump();
            self.finish_node();
        }
        self.exit();
    }
}

#[cfg(test)]
mod tests {
    use crate::{EntryPoint, SyntaxKind, SyntaxNode, parse};

    fn parse_ok(source: &str, entry: EntryPoint) -> SyntaxNode {
        let result = parse(source, entry);
        assert!(
            !result.has_errors(),
            "unexpected diagnostics for {source:?}: {:?}",
            result.diagnostics
        );
        result.syntax_node()
    }

    #[test]
    fn test_variable_decl() {
        let root = parse_ok("var (a, _) = pair, b: Int = 2", EntryPoint::Decl);
        assert_eq!(root.kind(), SyntaxKind::VariableDecl);
        let bindings: Vec<_> = root.children().map(|n| n.text().to_string()).collect();
        assert_eq!(bindings, vec!["(a, _) = pair,", "b: Int = 2"]);
    }

    #[test]
    fn test_function_decl_with_throws() {
        let root = parse_ok(
            "func load(from path: String, _ retries: Int?) throws -> [Byte] {\n  return []\n}",
            EntryPoint::Decl,
        );
        assert_eq!(root.kind(), SyntaxKind::FunctionDecl);
        let throws = root
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == SyntaxKind::ThrowsKw);
        assert!(throws.is_some());
        let kinds: Vec<_> = root.children().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![SyntaxKind::ParameterClause, SyntaxKind::ReturnClause, SyntaxKind::CodeBlock]
        );
    }

    #[test]
    fn test_throws_is_an_identifier_elsewhere() {
        let root = parse_ok("throws", EntryPoint::Expr);
        assert_eq!(root.kind(), SyntaxKind::DeclReferenceExpr);
    }

    #[test]
    fn test_types() {
        assert_eq!(parse_ok("Int", EntryPoint::Type).kind(), SyntaxKind::IdentifierType);
        assert_eq!(parse_ok("[Int]", EntryPoint::Type).kind(), SyntaxKind::ArrayType);
        let optional = parse_ok("[Int?]?", EntryPoint::Type);
        assert_eq!(optional.kind(), SyntaxKind::OptionalType);
        assert_eq!(optional.first_child().unwrap().kind(), SyntaxKind::ArrayType);
    }

    #[test]
    fn test_patterns() {
        assert_eq!(parse_ok("x", EntryPoint::Pattern).kind(), SyntaxKind::IdentifierPattern);
        assert_eq!(parse_ok("_", EntryPoint::Pattern).kind(), SyntaxKind::WildcardPattern);
        assert_eq!(parse_ok("(x, (y, _))", EntryPoint::Pattern).kind(), SyntaxKind::TuplePattern);
    }
}
