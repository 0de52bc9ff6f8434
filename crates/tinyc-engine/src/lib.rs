// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # tinyc-engine
//!
//! A compiler and stack virtual machine for a tiny imperative language.
//!
//! ## Overview
//!
//! This crate provides the whole execution pipeline:
//! - Lexer and recursive descent parser
//! - Bytecode compiler with backpatched jumps
//! - Stack-based interpreter with 26 integer variables
//! - Optional async file front end (`async` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use tinyc_engine::Engine;
//!
//! let engine = Engine::new();
//! let report = engine.eval("i = 1; while (i < 5) i = i + 1; %").unwrap();
//! assert_eq!(report.value_of('i'), Some(5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod vm;

#[cfg(feature = "async")]
mod async_engine;

use std::path::Path;

use tracing::debug;

// Re-exports for convenience
#[cfg(feature = "async")]
pub use async_engine::AsyncEngine;
pub use compiler::{Bytecode, Compiler};
pub use lexer::Span;
pub use parser::Parser;
pub use runtime::{Report, Value, Variable};
pub use vm::VM;

/// Default maximum nesting depth accepted by the parser.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth of statements and expressions
    pub max_depth: usize,
    /// Optional cap on the number of executed instructions
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: None,
        }
    }
}

/// The main tinyc engine.
///
/// Every call runs a fresh compiler and a fresh VM; nothing carries over
/// between programs.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Creates a new engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lexes, parses and compiles `source` without running it.
    pub fn compile(&self, source: &str) -> Result<Bytecode, Error> {
        let mut parser = Parser::with_max_depth(source, self.config.max_depth);
        let program = parser.parse_program()?;

        let mut compiler = Compiler::new();
        compiler.compile(&program)
    }

    /// Compiles and runs `source`, returning the final variable state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let engine = tinyc_engine::Engine::new();
    /// let report = engine.eval("a = b = 5; %").unwrap();
    /// assert_eq!(report.to_string(), "a = 5\nb = 5\n");
    /// ```
    pub fn eval(&self, source: &str) -> Result<Report, Error> {
        let bytecode = self.compile(source)?;
        let mut vm = VM::with_step_limit(self.config.max_steps);
        let report = vm.run(&bytecode)?;
        debug!(steps = vm.steps(), "program executed");
        Ok(report)
    }

    /// Reads a program from a file and runs it.
    pub fn eval_file(&self, path: impl AsRef<Path>) -> Result<Report, Error> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        self.eval(&source)
    }
}

/// Errors that can occur while compiling or running a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Unrecognised character, unknown word or out-of-range literal
    #[error("LexicalError: {message} (at {span})")]
    Lexical {
        /// What went wrong
        message: String,
        /// Where in the source
        span: Span,
    },

    /// Unexpected or missing token
    #[error("SyntaxError: {message} (at {span})")]
    Syntax {
        /// What went wrong
        message: String,
        /// Where in the source
        span: Span,
    },

    /// The configured step limit was exceeded
    #[error("RuntimeError: {0}")]
    Runtime(String),

    /// I/O error
    #[error("IOError: {0}")]
    Io(String),

    /// Internal engine error
    #[error("InternalError: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a lexical error.
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Error::Lexical {
            message: message.into(),
            span,
        }
    }

    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Error::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Returns true for lexical errors.
    pub fn is_lexical(&self) -> bool {
        matches!(self, Error::Lexical { .. })
    }

    /// Returns true for syntax errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// The source span of a lexical or syntax error.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lexical { span, .. } | Error::Syntax { span, .. } => Some(*span),
            _ => None,
        }
    }
}
