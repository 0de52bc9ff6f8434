//! Lexical analysis (tokenization) for tinyc source code.
//!
//! The lexer transforms source text into a stream of tokens that can be
//! consumed by the parser.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token` and `TokenKind` definitions
//!
//! ## Lexical Rules
//!
//! | Input | Token |
//! |-------|-------|
//! | whitespace | skipped |
//! | `%` | `Eof` (logical end of program) |
//! | `{ } ( ) + - < = ;` | punctuation |
//! | run of digits | `Number` |
//! | `if` `else` `while` `do` (any case) | keyword |
//! | a single letter | `Identifier` (`a` = 0 .. `z` = 25) |
//!
//! Any other word or character is a lexical error.
//!
//! ## Usage
//!
//! ```rust
//! use tinyc_engine::lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("i = i + 1; %");
//!
//! loop {
//!     let token = scanner.next_token().expect("valid input");
//!     if matches!(token.kind, TokenKind::Eof) {
//!         break;
//!     }
//!     println!("{:?}", token.kind);
//! }
//! ```

mod scanner;
mod token;

pub use scanner::{SENTINEL, Scanner};
pub use token::{Span, Token, TokenKind};
