//! Token definitions for the tinyc lexer.

use std::fmt;

use crate::runtime::value::{Value, Variable};

/// A span in the source code, representing a range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The different kinds of tokens in tinyc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Integer literal
    Number(Value),
    /// Single-letter variable name
    Identifier(Variable),

    // Keywords
    /// if
    If,
    /// else
    Else,
    /// while
    While,
    /// do
    Do,

    // Punctuation
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// +
    Plus,
    /// -
    Minus,
    /// <
    LessThan,
    /// =
    Equal,
    /// ;
    Semicolon,

    /// End of program (the `%` sentinel, or end of input)
    Eof,
}

impl TokenKind {
    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::Else | TokenKind::While | TokenKind::Do
        )
    }

    /// Returns the keyword token for a lower-cased word, if it is one.
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "do" => Some(TokenKind::Do),
            _ => None,
        }
    }

    /// Maps a single punctuation character to its token.
    pub fn symbol(ch: char) -> Option<Self> {
        let kind = match ch {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '<' => TokenKind::LessThan,
            '=' => TokenKind::Equal,
            ';' => TokenKind::Semicolon,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Identifier(var) => write!(f, "identifier '{}'", var),
            TokenKind::If => f.write_str("'if'"),
            TokenKind::Else => f.write_str("'else'"),
            TokenKind::While => f.write_str("'while'"),
            TokenKind::Do => f.write_str("'do'"),
            TokenKind::LeftBrace => f.write_str("'{'"),
            TokenKind::RightBrace => f.write_str("'}'"),
            TokenKind::LeftParen => f.write_str("'('"),
            TokenKind::RightParen => f.write_str("')'"),
            TokenKind::Plus => f.write_str("'+'"),
            TokenKind::Minus => f.write_str("'-'"),
            TokenKind::LessThan => f.write_str("'<'"),
            TokenKind::Equal => f.write_str("'='"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Eof => f.write_str("end of program"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(3, 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("if"), Some(TokenKind::If));
        assert_eq!(TokenKind::keyword("else"), Some(TokenKind::Else));
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("do"), Some(TokenKind::Do));
        assert_eq!(TokenKind::keyword("for"), None);
        assert_eq!(TokenKind::keyword("i"), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::If.is_keyword());
        assert!(TokenKind::Do.is_keyword());
        assert!(!TokenKind::Semicolon.is_keyword());
        assert!(!TokenKind::Number(1).is_keyword());
    }

    #[test]
    fn test_all_symbols() {
        let symbols = [
            ('{', TokenKind::LeftBrace),
            ('}', TokenKind::RightBrace),
            ('(', TokenKind::LeftParen),
            (')', TokenKind::RightParen),
            ('+', TokenKind::Plus),
            ('-', TokenKind::Minus),
            ('<', TokenKind::LessThan),
            ('=', TokenKind::Equal),
            (';', TokenKind::Semicolon),
        ];
        for (ch, kind) in symbols {
            assert_eq!(TokenKind::symbol(ch), Some(kind));
        }
        assert_eq!(TokenKind::symbol('*'), None);
        assert_eq!(TokenKind::symbol('%'), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
        assert_eq!(TokenKind::Number(42).to_string(), "number 42");
        let var = Variable::from_letter('q').unwrap();
        assert_eq!(TokenKind::Identifier(var).to_string(), "identifier 'q'");
        assert_eq!(TokenKind::Eof.to_string(), "end of program");
    }
}
