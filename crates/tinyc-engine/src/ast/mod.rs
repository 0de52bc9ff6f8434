//! Abstract Syntax Tree (AST) definitions for tinyc.
//!
//! Every node owns its children exclusively through `Box`, so the tree is
//! finite and acyclic. Each variant carries exactly the children its
//! construct needs.

use crate::runtime::value::{Value, Variable};

/// A complete tinyc program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The top-level statement (a sequence for multi-statement programs)
    pub body: Statement,
}

/// A tinyc statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `if (test) consequent` with no else branch
    If(IfStatement),
    /// `if (test) consequent else alternate`
    IfElse(IfElseStatement),
    /// `while (test) body`
    While(WhileStatement),
    /// `do body while (test);`
    DoWhile(DoWhileStatement),
    /// Two statements executed in order
    Sequence(SequenceStatement),
    /// Expression evaluated for its effect
    Expression(Expression),
    /// Empty statement (`;` or `{}`)
    Empty,
}

/// An if statement without an else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// Executed when the condition is non-zero
    pub consequent: Box<Statement>,
}

/// An if statement with an else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElseStatement {
    /// The condition
    pub test: Expression,
    /// Executed when the condition is non-zero
    pub consequent: Box<Statement>,
    /// Executed when the condition is zero
    pub alternate: Box<Statement>,
}

/// A while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The condition, checked before every iteration
    pub test: Expression,
    /// The loop body
    pub body: Box<Statement>,
}

/// A do-while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    /// The loop body, executed at least once
    pub body: Box<Statement>,
    /// The condition, checked after every iteration
    pub test: Expression,
}

/// Two statements run one after the other.
///
/// Blocks are built as left-nested sequences: `{ s1 s2 }` becomes
/// `Sequence(Sequence(Empty, s1), s2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceStatement {
    /// Runs first
    pub first: Box<Statement>,
    /// Runs second
    pub second: Box<Statement>,
}

// Long programs and long `+`/`-` chains build deep left spines. Dropping
// them recursively could exhaust the stack, so both spines are unlinked
// iteratively.
impl Drop for SequenceStatement {
    fn drop(&mut self) {
        let mut first = std::mem::replace(&mut self.first, Box::new(Statement::Empty));
        while let Statement::Sequence(mut inner) = *first {
            first = std::mem::replace(&mut inner.first, Box::new(Statement::Empty));
        }
    }
}

impl Statement {
    /// Builds `Sequence(first, second)`.
    pub fn sequence(first: Statement, second: Statement) -> Self {
        Statement::Sequence(SequenceStatement {
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}

/// A tinyc expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Variable reference
    Variable(Variable),
    /// Integer constant
    Constant(Value),
    /// Binary operation (`+`, `-`, `<`)
    Binary(BinaryExpression),
    /// Assignment `target = value`
    Assignment(AssignmentExpression),
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand
    pub left: Box<Expression>,
    /// Right operand
    pub right: Box<Expression>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Subtract,
    /// <
    LessThan,
}

/// An assignment expression. Its value is the assigned value.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The variable written to
    pub target: Variable,
    /// The assigned expression
    pub value: Box<Expression>,
}

impl Drop for BinaryExpression {
    fn drop(&mut self) {
        let mut left = std::mem::replace(&mut self.left, Box::new(Expression::Constant(0)));
        while let Expression::Binary(mut inner) = *left {
            left = std::mem::replace(&mut inner.left, Box::new(Expression::Constant(0)));
        }
    }
}

impl Expression {
    /// Builds a binary expression.
    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Builds `target = value`.
    pub fn assign(target: Variable, value: Expression) -> Self {
        Expression::Assignment(AssignmentExpression {
            target,
            value: Box::new(value),
        })
    }
}
