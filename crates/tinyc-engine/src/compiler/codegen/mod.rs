//! Code generation from AST to bytecode.
//!
//! This module contains the `Compiler` which walks a parsed tinyc AST in
//! post order and emits a flat instruction list. Forward jumps are emitted
//! with a placeholder target of `0` and backpatched once the target index is
//! known.


use tracing::debug;

use crate::Error;
use crate::ast::*;
use crate::compiler::bytecode::{Bytecode, Instruction, OpCode, Operand};

/// Compiles AST to bytecode.
///
/// All state lives in the compiler value, so separate compilations never
/// observe each other.
pub struct Compiler {
    /// The bytecode being generated
    pub bytecode: Bytecode,
}

impl Compiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        Self {
            bytecode: Bytecode::new(),
        }
    }

    /// Compiles a program, appending the final `HALT`.
    pub fn compile(&mut self, program: &Program) -> Result<Bytecode, Error> {
        self.bytecode = Bytecode::new();

        self.compile_statement(&program.body)?;
        self.emit(Instruction::simple(OpCode::Halt));

        let bytecode = std::mem::take(&mut self.bytecode);
        bytecode.validate()?;

        debug!(instructions = bytecode.len(), "compiled program");
        Ok(bytecode)
    }

    // ========================================================================
    // Statement Compilation
    // ========================================================================

    fn compile_statement(&mut self, stmt: &Statement) -> Result<(), Error> {
        match stmt {
            Statement::If(if_stmt) => self.compile_if_statement(if_stmt),
            Statement::IfElse(if_else) => self.compile_if_else_statement(if_else),
            Statement::While(while_stmt) => self.compile_while_statement(while_stmt),
            Statement::DoWhile(do_while) => self.compile_do_while_statement(do_while),
            Statement::Sequence(seq) => self.compile_sequence(seq),
            Statement::Expression(expr) => {
                self.compile_expression(expr)?;
                self.emit(Instruction::simple(OpCode::Pop));
                Ok(())
            }
            Statement::Empty => Ok(()),
        }
    }

    fn compile_if_statement(&mut self, if_stmt: &IfStatement) -> Result<(), Error> {
        self.compile_expression(&if_stmt.test)?;

        // Jump past the branch if false
        let jump_to_end = self.emit_jump(OpCode::JumpIfZero);
        self.compile_statement(&if_stmt.consequent)?;
        self.patch_here(jump_to_end)
    }

    fn compile_if_else_statement(&mut self, if_else: &IfElseStatement) -> Result<(), Error> {
        self.compile_expression(&if_else.test)?;

        let jump_to_else = self.emit_jump(OpCode::JumpIfZero);
        self.compile_statement(&if_else.consequent)?;

        // Jump over else branch
        let jump_to_end = self.emit_jump(OpCode::Jump);
        self.patch_here(jump_to_else)?;

        self.compile_statement(&if_else.alternate)?;
        self.patch_here(jump_to_end)
    }

    fn compile_while_statement(&mut self, while_stmt: &WhileStatement) -> Result<(), Error> {
        let loop_start = self.bytecode.next_index();

        self.compile_expression(&while_stmt.test)?;
        let jump_to_end = self.emit_jump(OpCode::JumpIfZero);

        self.compile_statement(&while_stmt.body)?;

        // Jump back to start
        self.emit(Instruction::with_operand(
            OpCode::Jump,
            Operand::Jump(loop_start),
        ));

        self.patch_here(jump_to_end)
    }

    fn compile_do_while_statement(&mut self, do_while: &DoWhileStatement) -> Result<(), Error> {
        let loop_start = self.bytecode.next_index();

        self.compile_statement(&do_while.body)?;
        self.compile_expression(&do_while.test)?;

        self.emit(Instruction::with_operand(
            OpCode::JumpIfNotZero,
            Operand::Jump(loop_start),
        ));
        Ok(())
    }

    /// Statement lists are left-nested, so the `first` spine is walked with
    /// a loop and the `second` children are compiled in source order.
    fn compile_sequence(&mut self, seq: &SequenceStatement) -> Result<(), Error> {
        let mut seconds = vec![&*seq.second];
        let mut first = &*seq.first;

        while let Statement::Sequence(inner) = first {
            seconds.push(&*inner.second);
            first = &*inner.first;
        }

        self.compile_statement(first)?;
        for stmt in seconds.into_iter().rev() {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    // ========================================================================
    // Expression Compilation
    // ========================================================================

    fn compile_expression(&mut self, expr: &Expression) -> Result<(), Error> {
        match expr {
            Expression::Variable(var) => {
                self.emit(Instruction::with_operand(
                    OpCode::Fetch,
                    Operand::Variable(*var),
                ));
            }
            Expression::Constant(n) => {
                self.emit(Instruction::with_operand(OpCode::Push, Operand::Value(*n)));
            }
            Expression::Binary(binary) => self.compile_binary_expression(binary)?,
            Expression::Assignment(assign) => {
                self.compile_expression(&assign.value)?;
                self.emit(Instruction::with_operand(
                    OpCode::Store,
                    Operand::Variable(assign.target),
                ));
            }
        }
        Ok(())
    }

    /// `a + b - c` is a left spine of binary nodes; it is flattened into
    /// operand, (operand, operator)* order without recursing down the left.
    fn compile_binary_expression(&mut self, binary: &BinaryExpression) -> Result<(), Error> {
        let mut pending = vec![(binary.operator, &*binary.right)];
        let mut left = &*binary.left;

        while let Expression::Binary(inner) = left {
            pending.push((inner.operator, &*inner.right));
            left = &*inner.left;
        }

        self.compile_expression(left)?;
        for (operator, right) in pending.into_iter().rev() {
            self.compile_expression(right)?;
            self.emit(Instruction::simple(match operator {
                BinaryOperator::Add => OpCode::Add,
                BinaryOperator::Subtract => OpCode::Sub,
                BinaryOperator::LessThan => OpCode::Lt,
            }));
        }
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn emit(&mut self, instruction: Instruction) -> usize {
        self.bytecode.emit(instruction)
    }

    /// Emits a jump with a placeholder target and returns its index.
    fn emit_jump(&mut self, opcode: OpCode) -> usize {
        self.emit(Instruction::with_operand(opcode, Operand::Jump(0)))
    }

    /// Points the jump at `index` to the next instruction to be emitted.
    fn patch_here(&mut self, index: usize) -> Result<(), Error> {
        let target = self.bytecode.next_index();
        self.bytecode.patch_jump(index, target)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
