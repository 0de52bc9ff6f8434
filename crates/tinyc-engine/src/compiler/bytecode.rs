//! Bytecode definitions.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::Error;
use crate::runtime::value::{Value, Variable};

/// A compiled bytecode program.
///
/// Jump operands are absolute indices into `instructions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    /// The instructions
    pub instructions: Vec<Instruction>,
}

impl Bytecode {
    /// Creates a new empty bytecode program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instruction and returns its index.
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        let index = self.instructions.len();
        self.instructions.push(instruction);
        index
    }

    /// The index the next emitted instruction will get.
    pub fn next_index(&self) -> usize {
        self.instructions.len()
    }

    /// Points the jump at `index` to `target`.
    pub fn patch_jump(&mut self, index: usize, target: usize) -> Result<(), Error> {
        match self.instructions.get_mut(index) {
            Some(instruction) if instruction.opcode.is_jump() => {
                instruction.operand = Some(Operand::Jump(target));
                Ok(())
            }
            _ => Err(Error::Internal(format!(
                "no jump instruction at {} to patch",
                index
            ))),
        }
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if no instruction has been emitted.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Checks that the program is well formed: every operand matches its
    /// opcode, every jump lands inside the program and the program ends
    /// in `Halt`.
    pub fn validate(&self) -> Result<(), Error> {
        for (index, instruction) in self.instructions.iter().enumerate() {
            let ok = match (instruction.opcode, &instruction.operand) {
                (OpCode::Fetch | OpCode::Store, Some(Operand::Variable(_))) => true,
                (OpCode::Push, Some(Operand::Value(_))) => true,
                (_, Some(Operand::Jump(target))) if instruction.opcode.is_jump() => {
                    *target < self.instructions.len()
                }
                (opcode, None) => !opcode.has_operand(),
                _ => false,
            };
            if !ok {
                return Err(Error::Internal(format!(
                    "malformed instruction at {}: {}",
                    index, instruction
                )));
            }
        }

        match self.instructions.last() {
            Some(last) if last.opcode == OpCode::Halt => Ok(()),
            _ => Err(Error::Internal("program does not end in HALT".into())),
        }
    }
}

impl fmt::Display for Bytecode {
    /// Renders an assembly listing. Jump targets get `Ln:` labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels: FxHashMap<usize, usize> = FxHashMap::default();
        for instruction in &self.instructions {
            if let Some(Operand::Jump(target)) = instruction.operand {
                let next = labels.len();
                labels.entry(target).or_insert(next);
            }
        }

        for (index, instruction) in self.instructions.iter().enumerate() {
            match labels.get(&index) {
                Some(label) => write!(f, "{:>4}:", format!("L{}", label))?,
                None => write!(f, "     ")?,
            }
            write!(f, " {:04}  {:<6}", index, instruction.opcode.mnemonic())?;
            match instruction.operand {
                Some(Operand::Jump(target)) => match labels.get(&target) {
                    Some(label) => write!(f, " {} (L{})", target, label)?,
                    None => write!(f, " {}", target)?,
                },
                Some(operand) => write!(f, " {}", operand)?,
                None => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A single bytecode instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation code
    pub opcode: OpCode,
    /// Optional operand
    pub operand: Option<Operand>,
}

impl Instruction {
    /// Creates a new instruction with no operand.
    pub fn simple(opcode: OpCode) -> Self {
        Self {
            opcode,
            operand: None,
        }
    }

    /// Creates a new instruction with an operand.
    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Self {
            opcode,
            operand: Some(operand),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(operand) => write!(f, "{} {}", self.opcode.mnemonic(), operand),
            None => f.write_str(self.opcode.mnemonic()),
        }
    }
}

/// Instruction operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Variable slot
    Variable(Variable),
    /// Literal value
    Value(Value),
    /// Absolute jump target
    Jump(usize),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Variable(var) => write!(f, "{}", var),
            Operand::Value(n) => write!(f, "{}", n),
            Operand::Jump(target) => write!(f, "{}", target),
        }
    }
}

/// Operation codes for the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // Variable operations
    /// Push a variable's value
    Fetch,
    /// Copy the top value into a variable, leaving it on the stack
    Store,

    // Stack operations
    /// Push a literal
    Push,
    /// Pop the top value
    Pop,

    // Arithmetic operations
    /// Add top two values
    Add,
    /// Subtract
    Sub,

    // Comparison operations
    /// Less than (pushes 1 or 0)
    Lt,

    // Control flow
    /// Jump if the popped value is zero
    JumpIfZero,
    /// Jump if the popped value is non-zero
    JumpIfNotZero,
    /// Unconditional jump
    Jump,

    // Special
    /// Halt execution
    Halt,
}

impl OpCode {
    /// Assembly mnemonic used in listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Fetch => "IFETCH",
            OpCode::Store => "ISTORE",
            OpCode::Push => "IPUSH",
            OpCode::Pop => "IPOP",
            OpCode::Add => "IADD",
            OpCode::Sub => "ISUB",
            OpCode::Lt => "ILT",
            OpCode::JumpIfZero => "JZ",
            OpCode::JumpIfNotZero => "JNZ",
            OpCode::Jump => "JMP",
            OpCode::Halt => "HALT",
        }
    }

    /// Returns true for the three jump instructions.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            OpCode::JumpIfZero | OpCode::JumpIfNotZero | OpCode::Jump
        )
    }

    /// Returns true if the instruction carries an operand.
    pub fn has_operand(self) -> bool {
        self.is_jump() || matches!(self, OpCode::Fetch | OpCode::Store | OpCode::Push)
    }
}
