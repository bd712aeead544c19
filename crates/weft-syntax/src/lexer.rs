//! Trivia-preserving lexer
//!
//! Unlike a lexer that feeds a compiler, this one keeps every byte of the
//! input: whitespace, line breaks and comments become tokens of their own so
//! that the tree built from them round-trips exactly.

use crate::SyntaxKind;
use crate::keywords::Keyword;
use std::ops::Range;

/// Simple span representing a byte range in the source
pub type Span = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: Span,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and source slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn span(&self) -> Span {
        self.offset..self.offset + self.text.len()
    }
}

/// Result returned by the lexer
pub type LexResult<'a> = (Vec<Token<'a>>, Vec<LexerError>);

/// Lex input preserving ALL trivia
///
/// Concatenating the text of the returned tokens reproduces `input`.
pub fn lex_with_trivia(input: &str) -> LexResult<'_> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut offset = 0usize;

    while let Some(current) = input[offset..].chars().next() {
        let rest = &input[offset..];
        let (kind, len) = match current {
            '\n' => (SyntaxKind::Newline, 1),
            '\r' => {
                if rest[1..].starts_with('\n') {
                    (SyntaxKind::Newline, 2)
                } else {
                    (SyntaxKind::Newline, 1)
                }
            }
            c if c.is_whitespace() => {
                let len = rest
                    .find(|c: char| !c.is_whitespace() || c == '\n' || c == '\r')
                    .unwrap_or(rest.len());
                (SyntaxKind::Whitespace, len)
            }
            '/' if rest.starts_with("//") => {
                let len = rest.find(['\n', '\r']).unwrap_or(rest.len());
                (SyntaxKind::LineComment, len)
            }
            '/' if rest.starts_with("/*") => {
                let (len, terminated) = block_comment_len(rest);
                if !terminated {
                    errors.push(LexerError::new(
                        "unterminated '/*' comment",
                        offset..offset + len,
                    ));
                }
                (SyntaxKind::BlockComment, len)
            }
            '"' if rest.starts_with("\"\"\"") => {
                let (len, terminated) = multiline_string_len(rest);
                if !terminated {
                    errors.push(LexerError::new(
                        "unterminated multi-line string literal",
                        offset..offset + len,
                    ));
                }
                (SyntaxKind::MultilineStringLiteral, len)
            }
            '"' => {
                let (len, terminated) = string_len(rest);
                if !terminated {
                    errors.push(LexerError::new(
                        "unterminated string literal",
                        offset..offset + len,
                    ));
                }
                (SyntaxKind::StringLiteral, len)
            }
            '`' => match backtick_ident_len(rest) {
                Some(len) => (SyntaxKind::Ident, len),
                None => {
                    errors.push(LexerError::new(
                        "expected identifier after '`'",
                        offset..offset + 1,
                    ));
                    (SyntaxKind::Unknown, 1)
                }
            },
            c if is_ident_start(c) => {
                let len = rest
                    .find(|c: char| !is_ident_continue(c))
                    .unwrap_or(rest.len());
                let text = &rest[..len];
                let kind = if text == "_" {
                    SyntaxKind::Wildcard
                } else {
                    Keyword::reserved(text)
                        .map(Keyword::syntax_kind)
                        .unwrap_or(SyntaxKind::Ident)
                };
                (kind, len)
            }
            c if c.is_ascii_digit() => number(rest),
            '(' => (SyntaxKind::LParen, 1),
            ')' => (SyntaxKind::RParen, 1),
            '{' => (SyntaxKind::LBrace, 1),
            '}' => (SyntaxKind::RBrace, 1),
            '[' => (SyntaxKind::LBracket, 1),
            ']' => (SyntaxKind::RBracket, 1),
            ',' => (SyntaxKind::Comma, 1),
            ':' => (SyntaxKind::Colon, 1),
            ';' => (SyntaxKind::Semicolon, 1),
            '.' if rest.starts_with("...") || rest.starts_with("..<") => (SyntaxKind::Operator, 3),
            '.' => (SyntaxKind::Period, 1),
            c if is_operator_char(c) => {
                let len = operator_len(rest);
                let kind = match &rest[..len] {
                    "=" => SyntaxKind::Equal,
                    "->" => SyntaxKind::Arrow,
                    "?" => SyntaxKind::QuestionMark,
                    _ => SyntaxKind::Operator,
                };
                (kind, len)
            }
            other => {
                let len = other.len_utf8();
                errors.push(LexerError::new(
                    format!("unexpected character '{other}'"),
                    offset..offset + len,
                ));
                (SyntaxKind::Unknown, len)
            }
        };

        tokens.push(Token {
            kind,
            text: &rest[..len],
            offset,
        });
        offset += len;
    }

    (tokens, errors)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '!' | '*' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '?'
    )
}

/// Length of an operator run; a run never swallows the start of a comment
fn operator_len(rest: &str) -> usize {
    let mut len = 0;
    for c in rest.chars() {
        if !is_operator_char(c) {
            break;
        }
        if len > 0 && (rest[len..].starts_with("//") || rest[len..].starts_with("/*")) {
            break;
        }
        len += c.len_utf8();
    }
    len
}

/// Returns the comment length and whether it was closed
fn block_comment_len(rest: &str) -> (usize, bool) {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return (i, true);
                }
            }
            _ => i += 1,
        }
    }
    (rest.len(), false)
}

fn string_len(rest: &str) -> (usize, bool) {
    let mut chars = rest.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return (index + 1, true),
            '\n' | '\r' => return (index, false),
            _ => {}
        }
    }
    (rest.len(), false)
}

fn multiline_string_len(rest: &str) -> (usize, bool) {
    let mut index = 3;
    while index < rest.len() {
        let tail = &rest[index..];
        if tail.starts_with("\"\"\"") {
            return (index + 3, true);
        }
        let mut chars = tail.chars();
        match chars.next() {
            Some('\\') => {
                index += 1 + chars.next().map(char::len_utf8).unwrap_or(0);
            }
            Some(c) => index += c.len_utf8(),
            None => break,
        }
    }
    (rest.len(), false)
}

fn backtick_ident_len(rest: &str) -> Option<usize> {
    let body = &rest[1..];
    let ident_len = body.find(|c: char| !is_ident_continue(c)).unwrap_or(body.len());
    let starts_ok = body.chars().next().is_some_and(is_ident_start);
    if starts_ok && body[ident_len..].starts_with('`') {
        Some(ident_len + 2)
    } else {
        None
    }
}

fn number(rest: &str) -> (SyntaxKind, usize) {
    let digits = |s: &str, radix: u32| {
        s.find(|c: char| !(c.is_digit(radix) || c == '_'))
            .unwrap_or(s.len())
    };

    if rest.starts_with("0x") || rest.starts_with("0X") {
        return (SyntaxKind::IntegerLiteral, 2 + digits(&rest[2..], 16));
    }

    let mut len = digits(rest, 10);
    let mut kind = SyntaxKind::IntegerLiteral;

    let tail = &rest[len..];
    if tail.starts_with('.') && tail[1..].starts_with(|c: char| c.is_ascii_digit()) {
        len += 1 + digits(&tail[1..], 10);
        kind = SyntaxKind::FloatLiteral;
    }

    let tail = &rest[len..];
    if tail.starts_with(['e', 'E']) {
        let sign = usize::from(tail[1..].starts_with(['+', '-']));
        let exponent = &tail[1 + sign..];
        if exponent.starts_with(|c: char| c.is_ascii_digit()) {
            len += 1 + sign + digits(exponent, 10);
            kind = SyntaxKind::FloatLiteral;
        }
    }

    (kind, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex_with_trivia(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lossless() {
        let input = "let x = 1 // note\r\n\tif x >= 2 { /* a /* nested */ b */ }\n";
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty());
        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("let _ = `if` throws"),
            vec![LetKw, Whitespace, Wildcard, Whitespace, Equal, Whitespace, Ident, Whitespace, Ident]
        );
    }

    #[test]
    fn test_newlines() {
        use SyntaxKind::*;
        assert_eq!(kinds("a\r\nb\rc\n"), vec![Ident, Newline, Ident, Newline, Ident, Newline]);
        let (tokens, _) = lex_with_trivia("a\r\nb");
        assert_eq!(tokens[1].text, "\r\n");
    }

    #[test]
    fn test_operators_and_punctuation() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("a==b->c?.d"),
            vec![Ident, Operator, Ident, Arrow, Ident, QuestionMark, Period, Ident]
        );
        assert_eq!(kinds("0..<n"), vec![IntegerLiteral, Operator, Ident]);
        assert_eq!(kinds("x+//c"), vec![Ident, Operator, LineComment]);
    }

    #[test]
    fn test_numbers() {
        use SyntaxKind::*;
        assert_eq!(kinds("1_000"), vec![IntegerLiteral]);
        assert_eq!(kinds("0xFF"), vec![IntegerLiteral]);
        assert_eq!(kinds("3.14"), vec![FloatLiteral]);
        assert_eq!(kinds("1e-3"), vec![FloatLiteral]);
        assert_eq!(kinds("1.foo"), vec![IntegerLiteral, Period, Ident]);
    }

    #[test]
    fn test_strings() {
        use SyntaxKind::*;
        assert_eq!(kinds(r#""a \" b""#), vec![StringLiteral]);
        let multiline = "\"\"\"\nline one\n  line two\n\"\"\"";
        assert_eq!(kinds(multiline), vec![MultilineStringLiteral]);
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, errors) = lex_with_trivia("\"abc\nx");
        assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 0..4);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, errors) = lex_with_trivia("/* /* */ x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(errors[0].message, "unterminated '/*' comment");
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = lex_with_trivia("a @ b");
        assert_eq!(tokens[2].kind, SyntaxKind::Unknown);
        assert_eq!(errors[0].span, 2..3);
    }
}
