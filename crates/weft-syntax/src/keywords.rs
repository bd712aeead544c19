//! Keyword classification data
//!
//! Maps identifier text to reserved or contextual keywords together with the
//! spacing a keyword needs when it is spliced into source text. Reserved
//! keywords are classified by the lexer; contextual keywords lex as
//! identifiers and are only remapped by the parser where the grammar expects
//! them.

use crate::SyntaxKind;

/// Static description of a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordSpec {
    pub name: &'static str,
    /// Classified by the lexer rather than by the parser in context
    pub reserved: bool,
    pub requires_leading_space: bool,
    pub requires_trailing_space: bool,
}

impl KeywordSpec {
    const fn new(name: &'static str, reserved: bool, leading: bool, trailing: bool) -> Self {
        Self {
            name,
            reserved,
            requires_leading_space: leading,
            requires_trailing_space: trailing,
        }
    }

    /// Name usable as an identifier (reserved keywords need back-ticks)
    pub fn escaped_name(&self) -> String {
        if self.reserved {
            format!("`{}`", self.name)
        } else {
            self.name.to_string()
        }
    }
}

/// All keywords, sorted alphabetically
pub const KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec::new("break", true, false, true),
    KeywordSpec::new("catch", true, true, false),
    KeywordSpec::new("continue", true, false, true),
    KeywordSpec::new("defer", true, false, true),
    KeywordSpec::new("do", true, false, false),
    KeywordSpec::new("else", true, false, true),
    KeywordSpec::new("false", true, false, false),
    KeywordSpec::new("for", true, false, true),
    KeywordSpec::new("func", true, false, true),
    KeywordSpec::new("guard", true, false, true),
    KeywordSpec::new("if", true, false, true),
    KeywordSpec::new("in", true, true, true),
    KeywordSpec::new("let", true, false, true),
    KeywordSpec::new("nil", true, false, false),
    KeywordSpec::new("repeat", true, false, true),
    KeywordSpec::new("return", true, false, true),
    KeywordSpec::new("throw", true, false, true),
    KeywordSpec::new("throws", false, true, true),
    KeywordSpec::new("true", true, false, false),
    KeywordSpec::new("var", true, false, true),
    KeywordSpec::new("where", true, true, true),
    KeywordSpec::new("while", true, false, true),
];

/// A weft keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Break,
    Catch,
    Continue,
    Defer,
    Do,
    Else,
    False,
    For,
    Func,
    Guard,
    If,
    In,
    Let,
    Nil,
    Repeat,
    Return,
    Throw,
    Throws,
    True,
    Var,
    Where,
    While,
}

impl Keyword {
    /// Look up a keyword by its source text
    pub fn from_text(text: &str) -> Option<Self> {
        let keyword = match text {
            "break" => Self::Break,
            "catch" => Self::Catch,
            "continue" => Self::Continue,
            "defer" => Self::Defer,
            "do" => Self::Do,
            "else" => Self::Else,
            "false" => Self::False,
            "for" => Self::For,
            "func" => Self::Func,
            "guard" => Self::Guard,
            "if" => Self::If,
            "in" => Self::In,
            "let" => Self::Let,
            "nil" => Self::Nil,
            "repeat" => Self::Repeat,
            "return" => Self::Return,
            "throw" => Self::Throw,
            "throws" => Self::Throws,
            "true" => Self::True,
            "var" => Self::Var,
            "where" => Self::Where,
            "while" => Self::While,
            _ => return None,
        };
        Some(keyword)
    }

    /// Reserved keyword for `text`, if the lexer must classify it
    pub fn reserved(text: &str) -> Option<Self> {
        Self::from_text(text).filter(|keyword| keyword.spec().reserved)
    }

    pub fn spec(self) -> &'static KeywordSpec {
        // KEYWORDS shares the declaration order of the enum
        &KEYWORDS[self as usize]
    }

    pub fn text(self) -> &'static str {
        self.spec().name
    }

    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Break => SyntaxKind::BreakKw,
            Self::Catch => SyntaxKind::CatchKw,
            Self::Continue => SyntaxKind::ContinueKw,
            Self::Defer => SyntaxKind::DeferKw,
            Self::Do => SyntaxKind::DoKw,
            Self::Else => SyntaxKind::ElseKw,
            Self::False => SyntaxKind::FalseKw,
            Self::For => SyntaxKind::ForKw,
            Self::Func => SyntaxKind::FuncKw,
            Self::Guard => SyntaxKind::GuardKw,
            Self::If => SyntaxKind::IfKw,
            Self::In => SyntaxKind::InKw,
            Self::Let => SyntaxKind::LetKw,
            Self::Nil => SyntaxKind::NilKw,
            Self::Repeat => SyntaxKind::RepeatKw,
            Self::Return => SyntaxKind::ReturnKw,
            Self::Throw => SyntaxKind::ThrowKw,
            Self::Throws => SyntaxKind::ThrowsKw,
            Self::True => SyntaxKind::TrueKw,
            Self::Var => SyntaxKind::VarKw,
            Self::Where => SyntaxKind::WhereKw,
            Self::While => SyntaxKind::WhileKw,
        }
    }

    /// Keyword text surrounded by the spacing it requires
    pub fn spaced_text(self) -> String {
        let spec = self.spec();
        let mut text = String::with_capacity(spec.name.len() + 2);
        if spec.requires_leading_space {
            text.push(' ');
        }
        text.push_str(spec.name);
        if spec.requires_trailing_space {
            text.push(' ');
        }
        text
    }
}
