//! Bytecode compiler for tinyc.
//!
//! Transforms AST into bytecode that can be executed by the VM.
//!
//! # Module Structure
//!
//! - `bytecode`: Bytecode definitions, instructions and the listing format
//! - `codegen`: Code generation from AST with jump backpatching

pub mod bytecode;
pub mod codegen;

pub use bytecode::{Bytecode, Instruction, OpCode, Operand};
pub use codegen::Compiler;
