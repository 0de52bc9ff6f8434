//! The bytecode interpreter.

use tracing::{debug, trace};

use crate::Error;
use crate::compiler::{Bytecode, Instruction, OpCode, Operand};
use crate::runtime::environment::{Environment, Report};
use crate::runtime::value::{self, Value, Variable};

/// The virtual machine.
///
/// Each [`VM::run`] starts from a clean state: an empty stack, every
/// variable at zero and `ip` at the first instruction.
#[derive(Debug, Clone, Default)]
pub struct VM {
    /// The value stack
    stack: Vec<Value>,
    /// Variable slots `a`..`z`
    env: Environment,
    /// Instruction pointer
    ip: usize,
    /// Instructions executed by the last run
    steps: u64,
    /// Optional cap on `steps`
    max_steps: Option<u64>,
}

impl VM {
    /// Creates a new VM with no step limit.
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(64),
            ..Self::default()
        }
    }

    /// Creates a VM that fails once `max_steps` instructions have run.
    pub fn with_step_limit(max_steps: Option<u64>) -> Self {
        Self {
            max_steps,
            ..Self::new()
        }
    }

    /// Number of instructions executed by the last run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current operand stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Executes bytecode until `HALT` and returns the final variable state.
    ///
    /// Stack underflow, a missing or mistyped operand and running off the
    /// end of the program all mean the bytecode is malformed; they are
    /// reported as [`Error::Internal`].
    pub fn run(&mut self, bytecode: &Bytecode) -> Result<Report, Error> {
        self.ip = 0;
        self.steps = 0;
        self.stack.clear();
        self.env = Environment::new();

        loop {
            let Some(instruction) = bytecode.instructions.get(self.ip) else {
                return Err(Error::Internal(format!(
                    "instruction pointer {} out of range",
                    self.ip
                )));
            };

            if let Some(limit) = self.max_steps {
                if self.steps >= limit {
                    return Err(Error::Runtime(format!(
                        "step limit of {} instructions exceeded",
                        limit
                    )));
                }
            }
            self.steps += 1;

            trace!(ip = self.ip, op = %instruction, stack = self.stack.len(), "exec");
            self.ip += 1;

            match instruction.opcode {
                OpCode::Halt => break,

                OpCode::Fetch => {
                    let var = variable_operand(instruction)?;
                    self.stack.push(self.env.get(var));
                }

                // The stored value stays on the stack as the value of the
                // assignment expression.
                OpCode::Store => {
                    let var = variable_operand(instruction)?;
                    let value = self.peek()?;
                    self.env.set(var, value);
                }

                OpCode::Push => match instruction.operand {
                    Some(Operand::Value(n)) => self.stack.push(n),
                    _ => return Err(malformed(instruction)),
                },

                OpCode::Pop => {
                    self.pop()?;
                }

                OpCode::Add => self.binary_op(value::add)?,
                OpCode::Sub => self.binary_op(value::sub)?,
                OpCode::Lt => self.binary_op(value::less_than)?,

                OpCode::JumpIfZero => {
                    let target = jump_operand(instruction)?;
                    if self.pop()? == 0 {
                        self.ip = target;
                    }
                }

                OpCode::JumpIfNotZero => {
                    let target = jump_operand(instruction)?;
                    if self.pop()? != 0 {
                        self.ip = target;
                    }
                }

                OpCode::Jump => {
                    self.ip = jump_operand(instruction)?;
                }
            }
        }

        debug!(steps = self.steps, "halted");
        Ok(std::mem::take(&mut self.env).into_report())
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn peek(&self) -> Result<Value, Error> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| Error::Internal("Stack underflow".into()))
    }

    fn pop(&mut self) -> Result<Value, Error> {
        self.stack
            .pop()
            .ok_or_else(|| Error::Internal("Stack underflow".into()))
    }

    /// Pops `b` then `a` and pushes `op(a, b)`.
    fn binary_op(&mut self, op: fn(Value, Value) -> Value) -> Result<(), Error> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(op(a, b));
        Ok(())
    }
}

fn variable_operand(instruction: &Instruction) -> Result<Variable, Error> {
    match instruction.operand {
        Some(Operand::Variable(var)) => Ok(var),
        _ => Err(malformed(instruction)),
    }
}

fn jump_operand(instruction: &Instruction) -> Result<usize, Error> {
    match instruction.operand {
        Some(Operand::Jump(target)) => Ok(target),
        _ => Err(malformed(instruction)),
    }
}

fn malformed(instruction: &Instruction) -> Error {
    Error::Internal(format!("malformed instruction: {}", instruction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use crate::parser::Parser;

    fn compile(src: &str) -> Bytecode {
        let program = Parser::new(src).parse_program().unwrap();
        Compiler::new().compile(&program).unwrap()
    }

    fn run(src: &str) -> Report {
        VM::new().run(&compile(src)).unwrap()
    }

    fn var(letter: char) -> Variable {
        Variable::from_letter(letter).unwrap()
    }

    #[test]
    fn test_vm_new() {
        let vm = VM::new();
        assert_eq!(vm.steps(), 0);
        assert_eq!(vm.stack_depth(), 0);
    }

    #[test]
    fn test_halt_only() {
        let report = run("%");
        assert!(report.is_empty());
    }

    #[test]
    fn test_assignment_and_arithmetic() {
        let report = run("a = 7; b = a - 10; c = a + b + 1;");
        assert_eq!(report.get(var('a')), 7);
        assert_eq!(report.get(var('b')), -3);
        assert_eq!(report.get(var('c')), 5);
    }

    #[test]
    fn test_less_than_yields_zero_or_one() {
        let report = run("a = 1 < 2; b = 2 < 1; c = 2 < 2;");
        assert_eq!(report.get(var('a')), 1);
        assert_eq!(report.get(var('b')), 0);
        assert_eq!(report.get(var('c')), 0);
    }

    #[test]
    fn test_arithmetic_wraps() {
        let report = run("a = 9223372036854775807 + 1; b = 0 - 9223372036854775807 - 2;");
        assert_eq!(report.get(var('a')), i64::MIN);
        assert_eq!(report.get(var('b')), i64::MAX);
    }

    #[test]
    fn test_expression_statements_leave_stack_empty() {
        let mut vm = VM::new();
        vm.run(&compile("a = 1; a + 2; 3; a < 4; while (a < 3) a = a + 1;"))
            .unwrap();
        assert_eq!(vm.stack_depth(), 0);
    }

    #[test]
    fn test_store_keeps_value_on_stack() {
        let bytecode = Bytecode {
            instructions: vec![
                Instruction::with_operand(OpCode::Push, Operand::Value(5)),
                Instruction::with_operand(OpCode::Store, Operand::Variable(var('b'))),
                Instruction::with_operand(OpCode::Store, Operand::Variable(var('a'))),
                Instruction::simple(OpCode::Halt),
            ],
        };
        let mut vm = VM::new();
        let report = vm.run(&bytecode).unwrap();
        assert_eq!(vm.stack_depth(), 1);
        assert_eq!(report.get(var('a')), 5);
        assert_eq!(report.get(var('b')), 5);
    }

    #[test]
    fn test_chained_assignment_leaves_stack_balanced() {
        let mut vm = VM::new();
        let mut source = String::new();
        for stmt in ["a = b = 5;", "c = a + b;", "a = b = c = 0 - 1;", "d = (e = 2) + e;"] {
            source.push_str(stmt);
            vm.run(&compile(&source)).unwrap();
            assert_eq!(vm.stack_depth(), 0, "after {}", stmt);
        }
        let report = vm.run(&compile(&source)).unwrap();
        assert_eq!(report.to_string(), "a = -1\nb = -1\nc = -1\nd = 4\ne = 2\n");
    }

    #[test]
    fn test_store_on_empty_stack_is_internal() {
        let bytecode = Bytecode {
            instructions: vec![
                Instruction::with_operand(OpCode::Store, Operand::Variable(var('a'))),
                Instruction::simple(OpCode::Halt),
            ],
        };
        let err = VM::new().run(&bytecode).unwrap_err();
        assert_eq!(err, Error::Internal("Stack underflow".into()));
    }

    #[test]
    fn test_while_runs_zero_times() {
        let report = run("a = 5; while (a < 3) b = 1;");
        assert_eq!(report.get(var('b')), 0);
    }

    #[test]
    fn test_do_while_runs_at_least_once() {
        let report = run("a = 5; do b = b + 1; while (a < 3);");
        assert_eq!(report.get(var('b')), 1);
    }

    #[test]
    fn test_steps_counted() {
        let mut vm = VM::new();
        vm.run(&compile("a = 1;")).unwrap();
        // IPUSH, ISTORE, IPOP, HALT
        assert_eq!(vm.steps(), 4);
    }

    #[test]
    fn test_step_limit() {
        let mut vm = VM::with_step_limit(Some(50));
        let err = vm.run(&compile("while (1) a = a + 1;")).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
        assert_eq!(vm.steps(), 50);
    }

    #[test]
    fn test_stack_underflow_is_internal() {
        let bytecode = Bytecode {
            instructions: vec![
                Instruction::simple(OpCode::Add),
                Instruction::simple(OpCode::Halt),
            ],
        };
        let err = VM::new().run(&bytecode).unwrap_err();
        assert_eq!(err, Error::Internal("Stack underflow".into()));
    }

    #[test]
    fn test_missing_halt_is_internal() {
        let bytecode = Bytecode {
            instructions: vec![Instruction::with_operand(OpCode::Push, Operand::Value(1))],
        };
        assert!(matches!(VM::new().run(&bytecode), Err(Error::Internal(_))));
    }

    #[test]
    fn test_wrong_operand_is_internal() {
        let bytecode = Bytecode {
            instructions: vec![
                Instruction::with_operand(OpCode::Store, Operand::Value(1)),
                Instruction::simple(OpCode::Halt),
            ],
        };
        assert!(matches!(VM::new().run(&bytecode), Err(Error::Internal(_))));
    }

    #[test]
    fn test_runs_are_independent() {
        let mut vm = VM::new();
        let first = vm.run(&compile("a = a + 1;")).unwrap();
        let second = vm.run(&compile("a = a + 1;")).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.get(var('a')), 1);
    }
}
