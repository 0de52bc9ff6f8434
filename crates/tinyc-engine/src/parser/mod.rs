//! Parser for tinyc source code.
//!
//! Transforms a stream of tokens into an Abstract Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - Main recursive descent parser implementation
//!
//! ## Documentation Submodules
//!
//! The following submodules provide documentation and additional tests
//! for specific parsing areas:
//!
//! - `statements` - Statement parsing (if, while, do, blocks)
//! - `expressions` - Expression parsing (assignment, `<`, `+`, `-`)
//!
//! ## Usage
//!
//! ```rust
//! use tinyc_engine::parser::Parser;
//!
//! let mut parser = Parser::new("i = 1; while (i < 5) i = i + 1; %");
//! let program = parser.parse_program().expect("Should parse");
//! ```

mod parser;

// Documentation and test submodules
pub mod expressions;
pub mod statements;

pub use parser::Parser;
