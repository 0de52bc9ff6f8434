//! The bytecode virtual machine.
//!
//! This module contains the VM that executes compiled bytecode.
//!
//! ## Structure
//!
//! - `interpreter` - Fetch-decode-execute loop over an operand stack and the
//!   26 variable slots

mod interpreter;

// Re-export public API
pub use interpreter::VM;
