//! Asynchronous engine APIs.
//!
//! This module provides async/await compatible APIs for loading program
//! files with non-blocking I/O. The `tinyc` binary reads every program file
//! through it.
//!
//! Compilation and execution themselves are CPU-bound and run on the calling
//! task.
//!
//! # Example
//!
//! ```no_run
//! use tinyc_engine::AsyncEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = AsyncEngine::new();
//!     let report = engine.eval_file("count.tc").await.unwrap();
//!     print!("{}", report);
//! }
//! ```

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::compiler::Bytecode;
use crate::runtime::Report;
use crate::{Config, Engine, Error};

/// An asynchronous tinyc engine.
///
/// This engine wraps the synchronous [`Engine`] and provides async APIs
/// for file I/O.
#[derive(Debug, Clone, Default)]
pub struct AsyncEngine {
    engine: Engine,
}

impl AsyncEngine {
    /// Creates a new async engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an async engine with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            engine: Engine::with_config(config),
        }
    }

    /// The configuration programs are compiled and run with.
    pub fn config(&self) -> &Config {
        self.engine.config()
    }

    /// Compiles `source` without running it.
    pub fn compile(&self, source: &str) -> Result<Bytecode, Error> {
        self.engine.compile(source)
    }

    /// Compiles and runs `source`.
    pub async fn eval(&self, source: &str) -> Result<Report, Error> {
        self.engine.eval(source)
    }

    /// Evaluates a program file asynchronously.
    pub async fn eval_file(&self, path: impl AsRef<Path>) -> Result<Report, Error> {
        let source = read_source(path.as_ref()).await?;
        self.eval(&source).await
    }

    /// Reads and compiles a program file without running it.
    pub async fn compile_file(&self, path: impl AsRef<Path>) -> Result<Bytecode, Error> {
        let source = read_source(path.as_ref()).await?;
        self.compile(&source)
    }
}

async fn read_source(path: &Path) -> Result<String, Error> {
    let source = fs::read_to_string(path)
        .await
        .map_err(|e| Error::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = source.len(), "loaded program");
    Ok(source)
}
