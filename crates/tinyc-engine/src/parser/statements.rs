//! Statement parsing documentation.
//!
//! This module documents the statement parsing logic found in `parser.rs`.
//!
//! ## Statement Types
//!
//! | Statement | Method | AST |
//! |-----------|--------|-----|
//! | If | `parse_if_statement` | `Statement::If` |
//! | If-Else | `parse_if_statement` | `Statement::IfElse` |
//! | While | `parse_while_statement` | `Statement::While` |
//! | Do-While | `parse_do_while_statement` | `Statement::DoWhile` |
//! | Block | `parse_block_statement` | nested `Statement::Sequence` |
//! | Empty | inline in `parse_statement` | `Statement::Empty` |
//! | Expression | `parse_expression_statement` | `Statement::Expression` |
//!
//! ## Grammar
//!
//! ```text
//! program    := statement* EOF
//! statement  := "if" paren_expr statement ("else" statement)?
//!             | "while" paren_expr statement
//!             | "do" statement "while" paren_expr ";"
//!             | "{" statement* "}"
//!             | expr ";"
//!             | ";"
//! ```
//!
//! An `else` always binds to the nearest unmatched `if`.
//!
//! ## Example
//!
//! ```text
//! i = 1; s = 0;
//! while (i < 10) { s = s + i; i = i + 1; }
//! do { s = s - 1; } while (0 < s);
//! %
//! ```
