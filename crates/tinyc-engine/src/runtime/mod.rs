//! Runtime types shared by the lexer, compiler and VM.

pub mod environment;
pub mod value;

pub use environment::{Environment, Report};
pub use value::{Value, Variable};
