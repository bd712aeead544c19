//! Typed AST layer over the CST
//!
//! Thin wrappers over [`SyntaxNode`]s of a known kind. A wrapper is only
//! ever a view: it owns a red node and reads everything from the tree.
//!
//! ```
//! use weft_syntax::ast::{AstNode, IfStmt};
//! use weft_syntax::{EntryPoint, parse};
//!
//! let result = parse("if ready { go() }", EntryPoint::Stmt);
//! let stmt = IfStmt::cast(result.syntax_node()).unwrap();
//! assert_eq!(stmt.condition().unwrap().to_string(), "ready");
//! ```

use crate::parser::EntryPoint;
use crate::{SyntaxKind, SyntaxNode, SyntaxToken};
use std::fmt;

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// A node type that can be parsed on its own
///
/// `ENTRY` is the production that yields it; `NAME` is used in messages.
pub trait SyntaxParse: AstNode {
    const ENTRY: EntryPoint;
    const NAME: &'static str;
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$name
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.syntax, f)
            }
        }
    };
}

macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($node:ident)),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($node),)*
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                $($node::can_cast(kind))||*
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                $(
                    if $node::can_cast(node.kind()) {
                        return $node::cast(node).map(Self::$variant);
                    }
                )*
                None
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => it.syntax(),)*
                }
            }
        }

        $(
            impl From<$node> for $name {
                fn from(node: $node) -> Self {
                    Self::$variant(node)
                }
            }
        )*

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.syntax(), f)
            }
        }
    };
}

macro_rules! syntax_parse {
    ($($name:ident => $entry:ident),* $(,)?) => {
        $(
            impl SyntaxParse for $name {
                const ENTRY: EntryPoint = EntryPoint::$entry;
                const NAME: &'static str = stringify!($name);
            }
        )*
    };
}

// ============================================================================
// Structure
// ============================================================================

ast_node!(
    /// A whole file
    SourceFile
);
ast_node!(
    /// `{ ... }`
    CodeBlock
);
ast_node!(CodeBlockItemList);

impl SourceFile {
    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        children(&self.syntax)
    }
}

impl CodeBlock {
    pub fn item_list(&self) -> Option<CodeBlockItemList> {
        child(&self.syntax)
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        self.item_list()
            .into_iter()
            .flat_map(|list| list.items())
    }
}

impl CodeBlockItemList {
    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        children(&self.syntax)
    }
}

ast_enum!(
    /// Anything that can stand on its own in a code block
    Item {
        Stmt(Stmt),
        Decl(Decl),
        Expr(Expr),
    }
);

// ============================================================================
// Expressions
// ============================================================================

ast_node!(DeclReferenceExpr);
ast_node!(IntegerLiteralExpr);
ast_node!(FloatLiteralExpr);
ast_node!(StringLiteralExpr);
ast_node!(BooleanLiteralExpr);
ast_node!(NilLiteralExpr);
ast_node!(
    /// `(a, b)`, also a parenthesized expression
    TupleExpr
);
ast_node!(ArrayExpr);
ast_node!(
    /// An element of a tuple or argument list, `label: value`
    LabeledExpr
);
ast_node!(MemberAccessExpr);
ast_node!(FunctionCallExpr);
ast_node!(SubscriptCallExpr);
ast_node!(PrefixOperatorExpr);
ast_node!(PostfixOperatorExpr);
ast_node!(InfixOperatorExpr);

ast_enum!(
    Expr {
        DeclReference(DeclReferenceExpr),
        IntegerLiteral(IntegerLiteralExpr),
        FloatLiteral(FloatLiteralExpr),
        StringLiteral(StringLiteralExpr),
        BooleanLiteral(BooleanLiteralExpr),
        NilLiteral(NilLiteralExpr),
        Tuple(TupleExpr),
        Array(ArrayExpr),
        MemberAccess(MemberAccessExpr),
        FunctionCall(FunctionCallExpr),
        SubscriptCall(SubscriptCallExpr),
        PrefixOperator(PrefixOperatorExpr),
        PostfixOperator(PostfixOperatorExpr),
        InfixOperator(InfixOperatorExpr),
    }
);

impl DeclReferenceExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
            .or_else(|| token_of_kind(&self.syntax, SyntaxKind::Wildcard))
    }
}

impl IntegerLiteralExpr {
    pub fn literal(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::IntegerLiteral)
    }
}

impl BooleanLiteralExpr {
    pub fn value(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::TrueKw).is_some()
    }
}

impl StringLiteralExpr {
    /// Contents without the quotes; escapes are left as written
    pub fn value(&self) -> Option<String> {
        let token = token_of_kind(&self.syntax, SyntaxKind::StringLiteral)
            .or_else(|| token_of_kind(&self.syntax, SyntaxKind::MultilineStringLiteral))?;
        let text = token.text();
        let quotes = if token.kind() == SyntaxKind::MultilineStringLiteral { 3 } else { 1 };
        if text.len() >= quotes * 2 && text.ends_with('"') {
            Some(text[quotes..text.len() - quotes].to_string())
        } else {
            None
        }
    }
}

impl TupleExpr {
    pub fn elements(&self) -> impl Iterator<Item = LabeledExpr> + use<> {
        children(&self.syntax)
    }
}

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + use<> {
        children(&self.syntax)
    }
}

impl LabeledExpr {
    pub fn label(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Colon)?;
        self.syntax.first_token()
    }

    pub fn expr(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl MemberAccessExpr {
    /// `None` for implicit members such as `.none`
    pub fn base(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| matches!(token.kind(), SyntaxKind::Ident | SyntaxKind::IntegerLiteral))
            .last()
    }
}

impl FunctionCallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn arguments(&self) -> impl Iterator<Item = LabeledExpr> + use<> {
        children(&self.syntax)
    }
}

impl SubscriptCallExpr {
    pub fn base(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn arguments(&self) -> impl Iterator<Item = LabeledExpr> + use<> {
        children(&self.syntax)
    }
}

impl PrefixOperatorExpr {
    pub fn operator(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Operator)
    }

    pub fn operand(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl PostfixOperatorExpr {
    pub fn operand(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| matches!(token.kind(), SyntaxKind::Operator | SyntaxKind::QuestionMark))
    }
}

impl InfixOperatorExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| matches!(token.kind(), SyntaxKind::Operator | SyntaxKind::Equal))
    }

    pub fn rhs(&self) -> Option<Expr> {
        children(&self.syntax).nth(1)
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(IfStmt);
ast_node!(GuardStmt);
ast_node!(WhileStmt);
ast_node!(RepeatStmt);
ast_node!(ForStmt);
ast_node!(WhereClause);
ast_node!(ReturnStmt);
ast_node!(ThrowStmt);
ast_node!(BreakStmt);
ast_node!(ContinueStmt);
ast_node!(DeferStmt);
ast_node!(DoStmt);
ast_node!(CatchClause);
ast_node!(ConditionList);
ast_node!(
    /// `let x = value` used as a condition
    OptionalBindingCondition
);

ast_enum!(
    Stmt {
        If(IfStmt),
        Guard(GuardStmt),
        While(WhileStmt),
        Repeat(RepeatStmt),
        For(ForStmt),
        Return(ReturnStmt),
        Throw(ThrowStmt),
        Break(BreakStmt),
        Continue(ContinueStmt),
        Defer(DeferStmt),
        Do(DoStmt),
    }
);

ast_enum!(
    Condition {
        OptionalBinding(OptionalBindingCondition),
        Expr(Expr),
    }
);

ast_enum!(
    /// What follows `else`
    ElseBranch {
        If(IfStmt),
        Block(CodeBlock),
    }
);

impl ConditionList {
    pub fn conditions(&self) -> impl Iterator<Item = Condition> + use<> {
        children(&self.syntax)
    }
}

impl IfStmt {
    pub fn conditions(&self) -> Option<ConditionList> {
        child(&self.syntax)
    }

    /// The first condition when it is a plain expression
    pub fn condition(&self) -> Option<Expr> {
        match self.conditions()?.conditions().next()? {
            Condition::Expr(expr) => Some(expr),
            Condition::OptionalBinding(_) => None,
        }
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }

    pub fn else_branch(&self) -> Option<ElseBranch> {
        let else_kw = token_of_kind(&self.syntax, SyntaxKind::ElseKw)?;
        let else_end = else_kw.text_range().end();
        self.syntax
            .children()
            .filter(|node| node.text_range().start() >= else_end)
            .find_map(ElseBranch::cast)
    }
}

impl GuardStmt {
    pub fn conditions(&self) -> Option<ConditionList> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl WhileStmt {
    pub fn conditions(&self) -> Option<ConditionList> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl RepeatStmt {
    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }

    pub fn condition(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl ForStmt {
    pub fn pattern(&self) -> Option<Pattern> {
        child(&self.syntax)
    }

    pub fn sequence(&self) -> Option<Expr> {
        child(&self.syntax)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl WhereClause {
    pub fn condition(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl ThrowStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl BreakStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }
}

impl ContinueStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }
}

impl DeferStmt {
    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl DoStmt {
    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }

    pub fn catch_clauses(&self) -> impl Iterator<Item = CatchClause> + use<> {
        children(&self.syntax)
    }
}

impl CatchClause {
    pub fn pattern(&self) -> Option<Pattern> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl OptionalBindingCondition {
    pub fn pattern(&self) -> Option<Pattern> {
        child(&self.syntax)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<InitializerClause> {
        child(&self.syntax)
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(VariableDecl);
ast_node!(PatternBinding);
ast_node!(TypeAnnotation);
ast_node!(InitializerClause);
ast_node!(FunctionDecl);
ast_node!(ParameterClause);
ast_node!(FunctionParameter);
ast_node!(ReturnClause);

ast_enum!(
    Decl {
        Variable(VariableDecl),
        Function(FunctionDecl),
    }
);

impl VariableDecl {
    /// `true` for `let`, `false` for `var`
    pub fn is_let(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::LetKw).is_some()
    }

    pub fn bindings(&self) -> impl Iterator<Item = PatternBinding> + use<> {
        children(&self.syntax)
    }
}

impl PatternBinding {
    pub fn pattern(&self) -> Option<Pattern> {
        child(&self.syntax)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.syntax)
    }

    pub fn initializer(&self) -> Option<InitializerClause> {
        child(&self.syntax)
    }
}

impl TypeAnnotation {
    pub fn ty(&self) -> Option<Type> {
        child(&self.syntax)
    }
}

impl InitializerClause {
    pub fn value(&self) -> Option<Expr> {
        child(&self.syntax)
    }
}

impl FunctionDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn parameters(&self) -> Option<ParameterClause> {
        child(&self.syntax)
    }

    pub fn throws(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::ThrowsKw).is_some()
    }

    pub fn return_clause(&self) -> Option<ReturnClause> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<CodeBlock> {
        child(&self.syntax)
    }
}

impl ParameterClause {
    pub fn parameters(&self) -> impl Iterator<Item = FunctionParameter> + use<> {
        children(&self.syntax)
    }
}

impl FunctionParameter {
    fn names(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .take_while(|token| token.kind() != SyntaxKind::Colon)
            .filter(|token| matches!(token.kind(), SyntaxKind::Ident | SyntaxKind::Wildcard))
    }

    /// Argument label, or the name when only one is given
    pub fn first_name(&self) -> Option<SyntaxToken> {
        self.names().next()
    }

    pub fn second_name(&self) -> Option<SyntaxToken> {
        self.names().nth(1)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.syntax)
    }

    pub fn default_value(&self) -> Option<InitializerClause> {
        child(&self.syntax)
    }
}

impl ReturnClause {
    pub fn ty(&self) -> Option<Type> {
        child(&self.syntax)
    }
}

// ============================================================================
// Patterns and types
// ============================================================================

ast_node!(IdentifierPattern);
ast_node!(WildcardPattern);
ast_node!(TuplePattern);

ast_enum!(
    Pattern {
        Identifier(IdentifierPattern),
        Wildcard(WildcardPattern),
        Tuple(TuplePattern),
    }
);

impl IdentifierPattern {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }
}

impl TuplePattern {
    pub fn elements(&self) -> impl Iterator<Item = Pattern> + use<> {
        children(&self.syntax)
    }
}

ast_node!(IdentifierType);
ast_node!(OptionalType);
ast_node!(ArrayType);

ast_enum!(
    Type {
        Identifier(IdentifierType),
        Optional(OptionalType),
        Array(ArrayType),
    }
);

impl IdentifierType {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }
}

impl OptionalType {
    pub fn wrapped(&self) -> Option<Type> {
        child(&self.syntax)
    }
}

impl ArrayType {
    pub fn element(&self) -> Option<Type> {
        child(&self.syntax)
    }
}

syntax_parse! {
    SourceFile => SourceFile,
    CodeBlock => CodeBlock,
    Item => Item,
    Stmt => Stmt,
    Decl => Decl,
    Expr => Expr,
    Type => Type,
    Pattern => Pattern,
    IfStmt => Stmt,
    GuardStmt => Stmt,
    WhileStmt => Stmt,
    RepeatStmt => Stmt,
    ForStmt => Stmt,
    ReturnStmt => Stmt,
    ThrowStmt => Stmt,
    BreakStmt => Stmt,
    ContinueStmt => Stmt,
    DeferStmt => Stmt,
    DoStmt => Stmt,
    VariableDecl => Decl,
    FunctionDecl => Decl,
    DeclReferenceExpr => Expr,
    IntegerLiteralExpr => Expr,
    FloatLiteralExpr => Expr,
    StringLiteralExpr => Expr,
    BooleanLiteralExpr => Expr,
    NilLiteralExpr => Expr,
    TupleExpr => Expr,
    ArrayExpr => Expr,
    MemberAccessExpr => Expr,
    FunctionCallExpr => Expr,
    SubscriptCallExpr => Expr,
    PrefixOperatorExpr => Expr,
    PostfixOperatorExpr => Expr,
    InfixOperatorExpr => Expr,
    IdentifierType => Type,
    OptionalType => Type,
    ArrayType => Type,
    IdentifierPattern => Pattern,
    WildcardPattern => Pattern,
    TuplePattern => Pattern,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn cast<N: SyntaxParse>(source: &str) -> N {
        let result = parse(source, N::ENTRY);
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
        N::cast(result.syntax_node()).unwrap()
    }

    #[test]
    fn test_if_stmt_accessors() {
        let stmt: IfStmt = cast("if x == 1 { a } else if y { b } else { c }");
        assert_eq!(stmt.condition().unwrap().to_string(), "x == 1");
        assert_eq!(stmt.body().unwrap().items().count(), 1);
        let Some(ElseBranch::If(nested)) = stmt.else_branch() else {
            panic!("expected else-if");
        };
        assert!(matches!(nested.else_branch(), Some(ElseBranch::Block(_))));
    }

    #[test]
    fn test_optional_binding_condition() {
        let stmt: IfStmt = cast("if let value = lookup(), value > 0 { }");
        let conditions: Vec<_> = stmt.conditions().unwrap().conditions().collect();
        assert_eq!(conditions.len(), 2);
        assert!(stmt.condition().is_none());
        let Condition::OptionalBinding(binding) = &conditions[0] else {
            panic!("expected binding");
        };
        assert_eq!(binding.pattern().unwrap().to_string(), "value");
    }

    #[test]
    fn test_variable_decl_accessors() {
        let decl: VariableDecl = cast("let x: Int = 1");
        assert!(decl.is_let());
        let binding = decl.bindings().next().unwrap();
        assert_eq!(binding.type_annotation().unwrap().ty().unwrap().to_string(), "Int");
        assert_eq!(binding.initializer().unwrap().value().unwrap().to_string(), "1");
    }

    #[test]
    fn test_function_decl_accessors() {
        let decl: FunctionDecl = cast("func greet(to name: String, _ times: Int = 1) { }");
        assert_eq!(decl.name().unwrap().text(), "greet");
        let params: Vec<_> = decl.parameters().unwrap().parameters().collect();
        assert_eq!(params[0].first_name().unwrap().text(), "to");
        assert_eq!(params[0].second_name().unwrap().text(), "name");
        assert_eq!(params[1].first_name().unwrap().text(), "_");
        assert!(params[1].default_value().is_some());
        assert!(!decl.throws());
    }

    #[test]
    fn test_expr_accessors() {
        let call: FunctionCallExpr = cast("point.move(by: 2)");
        let callee = call.callee().unwrap();
        let Expr::MemberAccess(member) = callee else {
            panic!("expected member access");
        };
        assert_eq!(member.name().unwrap().text(), "move");
        let argument = call.arguments().next().unwrap();
        assert_eq!(argument.label().unwrap().text(), "by");

        let infix: InfixOperatorExpr = cast("a = b");
        assert_eq!(infix.operator().unwrap().text(), "=");
        assert_eq!(infix.rhs().unwrap().to_string(), "b");

        let string: StringLiteralExpr = cast("\"hi\"");
        assert_eq!(string.value().as_deref(), Some("hi"));
    }

    #[test]
    fn test_item_enum() {
        let item: Item = cast("var x = 1");
        assert!(matches!(item, Item::Decl(Decl::Variable(_))));
        let item: Item = cast("f()");
        assert!(matches!(item, Item::Expr(Expr::FunctionCall(_))));
    }

    #[test]
    fn test_names() {
        assert_eq!(<IfStmt as SyntaxParse>::NAME, "IfStmt");
        assert_eq!(<Expr as SyntaxParse>::NAME, "Expr");
    }
}
