//! The scanner that produces tokens from source text.

use tracing::trace;

use super::{Span, Token, TokenKind};
use crate::Error;
use crate::runtime::value::{Value, Variable};

/// The character that marks the logical end of a program.
pub const SENTINEL: char = '%';

/// A scanner that tokenizes tinyc source code.
///
/// The peeked character is the scanner's one-character lookahead. The
/// sentinel is never consumed, so once it is reached every further call
/// yields [`TokenKind::Eof`] again.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    failed: bool,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            failed: false,
            done: false,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace();

        let start = self.current_pos;

        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        let kind = match ch {
            SENTINEL => TokenKind::Eof,
            '0'..='9' => self.scan_number()?,
            _ if ch.is_alphabetic() => self.scan_word()?,
            _ => {
                self.advance();
                match TokenKind::symbol(ch) {
                    Some(kind) => kind,
                    None => {
                        return Err(Error::lexical(
                            format!("unknown character '{}'", ch.escape_default()),
                            Span::new(start, self.current_pos),
                        ));
                    }
                }
            }
        };

        let token = Token::new(kind, Span::new(start, self.current_pos));
        trace!(kind = ?token.kind, span = %token.span, "token");
        Ok(token)
    }

    /// Returns the source text covered by a span.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn scan_number(&mut self) -> Result<TokenKind, Error> {
        let start = self.current_pos;
        let mut value: Option<Value> = Some(0);

        while let Some(ch) = self.peek() {
            let Some(digit) = ch.to_digit(10) else {
                break;
            };
            self.advance();
            value = value
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(Value::from(digit)));
        }

        let span = Span::new(start, self.current_pos);
        match value {
            Some(n) => Ok(TokenKind::Number(n)),
            None => Err(Error::lexical(
                format!("integer literal out of range: {}", self.slice(span)),
                span,
            )),
        }
    }

    fn scan_word(&mut self) -> Result<TokenKind, Error> {
        let start = self.current_pos;

        while let Some(ch) = self.peek() {
            if !ch.is_alphabetic() {
                break;
            }
            self.advance();
        }

        let span = Span::new(start, self.current_pos);
        let word = self.slice(span).to_lowercase();

        if let Some(keyword) = TokenKind::keyword(&word) {
            return Ok(keyword);
        }

        let mut chars = word.chars();
        match (chars.next().and_then(Variable::from_letter), chars.next()) {
            (Some(var), None) => Ok(TokenKind::Identifier(var)),
            _ => Err(Error::lexical(format!("unknown word '{}'", word), span)),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, Error>;

    /// Yields tokens up to and excluding EOF, stopping after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.done {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
