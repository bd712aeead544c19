//! Syntax kind enumeration for the weft CST
//!
//! Every token and node of the tree carries one of these kinds. The
//! discriminants are dense (declaration order), which lets
//! [`SyntaxKind::from_raw`] convert rowan's raw kinds back without a lookup
//! table.

use std::fmt;

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $name:ident,)*) => {
        /// Syntax kind for weft language elements
        ///
        /// Covers trivia, tokens (keywords, punctuation, literals) and the
        /// structural nodes produced by the parser.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$meta])* $name,)*
        }

        impl SyntaxKind {
            /// All kinds, indexed by discriminant.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name,)*];
        }
    };
}

syntax_kinds! {
    // Trivia
    /// Spaces and tabs
    Whitespace,
    /// `\n`, `\r\n` or `\r`
    Newline,
    /// `// ...` up to (not including) the line break
    LineComment,
    /// `/* ... */`, nesting
    BlockComment,

    // Literals & identifiers
    Ident,
    /// `_`
    Wildcard,
    IntegerLiteral,
    FloatLiteral,
    /// `"..."`
    StringLiteral,
    /// `"""..."""`, may span lines
    MultilineStringLiteral,

    // Keywords
    BreakKw,
    CatchKw,
    ContinueKw,
    DeferKw,
    DoKw,
    ElseKw,
    FalseKw,
    ForKw,
    FuncKw,
    GuardKw,
    IfKw,
    InKw,
    LetKw,
    NilKw,
    RepeatKw,
    ReturnKw,
    ThrowKw,
    /// Contextual: only a keyword after a function's parameter clause
    ThrowsKw,
    TrueKw,
    VarKw,
    WhereKw,
    WhileKw,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Period,
    Arrow,
    Equal,
    QuestionMark,
    /// Any run of operator characters that is not `=`, `->` or `?`
    Operator,

    // Special tokens
    /// Character the lexer could not classify
    Unknown,
    /// End of input (never stored in a tree)
    Eof,

    // Structure
    SourceFile,
    CodeBlock,
    CodeBlockItemList,
    /// Tokens the parser could not fit into the grammar
    Error,

    // Expressions
    DeclReferenceExpr,
    IntegerLiteralExpr,
    FloatLiteralExpr,
    StringLiteralExpr,
    BooleanLiteralExpr,
    NilLiteralExpr,
    TupleExpr,
    ArrayExpr,
    LabeledExpr,
    MemberAccessExpr,
    FunctionCallExpr,
    SubscriptCallExpr,
    PrefixOperatorExpr,
    PostfixOperatorExpr,
    InfixOperatorExpr,

    // Statements
    IfStmt,
    GuardStmt,
    WhileStmt,
    RepeatStmt,
    ForStmt,
    WhereClause,
    ReturnStmt,
    ThrowStmt,
    BreakStmt,
    ContinueStmt,
    DeferStmt,
    DoStmt,
    CatchClause,
    ConditionList,
    OptionalBindingCondition,

    // Declarations
    VariableDecl,
    PatternBinding,
    TypeAnnotation,
    InitializerClause,
    FunctionDecl,
    ParameterClause,
    FunctionParameter,
    ReturnClause,

    // Patterns
    IdentifierPattern,
    WildcardPattern,
    TuplePattern,

    // Types
    IdentifierType,
    OptionalType,
    ArrayType,
}

impl SyntaxKind {
    /// Convert a raw rowan kind back into a `SyntaxKind`
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Check if this is trivia (whitespace, comments, line breaks)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    /// Check if this is a keyword token, reserved or contextual
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BreakKw as u16) && (self as u16) <= (Self::WhileKw as u16)
    }

    /// Check if this is a structural node kind rather than a token kind
    pub const fn is_node(self) -> bool {
        (self as u16) >= (Self::SourceFile as u16)
    }

    /// Check if this node kind is an expression (argument labels are not)
    pub const fn is_expr(self) -> bool {
        (self as u16) >= (Self::DeclReferenceExpr as u16)
            && (self as u16) <= (Self::InfixOperatorExpr as u16)
            && !matches!(self, Self::LabeledExpr)
    }

    /// Human readable description used in parser diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::IntegerLiteral => "integer literal",
            Self::FloatLiteral => "floating-point literal",
            Self::StringLiteral | Self::MultilineStringLiteral => "string literal",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Period => "'.'",
            Self::Arrow => "'->'",
            Self::Equal => "'='",
            Self::QuestionMark => "'?'",
            Self::Operator => "operator",
            Self::Eof => "end of input",
            Self::InKw => "'in'",
            Self::ElseKw => "'else'",
            Self::WhileKw => "'while'",
            _ => "token",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
