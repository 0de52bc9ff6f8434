//! The main parser implementation.

use tracing::debug;

use crate::Error;
use crate::ast::*;
use crate::lexer::{Scanner, Span, Token, TokenKind};

/// A recursive descent parser for tinyc with one token of lookahead.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_max_depth(source, crate::DEFAULT_MAX_DEPTH)
    }

    /// Creates a parser that rejects programs nested deeper than `max_depth`.
    pub fn with_max_depth(source: &'a str, max_depth: usize) -> Self {
        Self {
            scanner: Scanner::new(source),
            current: Token::new(TokenKind::Eof, Span::default()),
            depth: 0,
            max_depth,
        }
    }

    /// Parses the source code into a Program AST node.
    ///
    /// Top-level statements are chained exactly like the statements of a
    /// block.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        self.advance()?;

        let mut body = Statement::Empty;
        let mut count = 0usize;
        while !self.is_at_end() {
            body = Statement::sequence(body, self.parse_statement()?);
            count += 1;
        }

        debug!(statements = count, "parsed program");
        Ok(Program { body })
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        self.enter()?;
        let statement = match self.current.kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::LeftBrace => self.parse_block_statement(),
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Statement::Empty)
            }
            _ => self.parse_expression_statement(),
        }?;
        self.leave();
        Ok(statement)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, Error> {
        self.advance()?; // consume 'if'
        let test = self.parse_paren_expression()?;
        let consequent = Box::new(self.parse_statement()?);

        if self.check(TokenKind::Else) {
            self.advance()?;
            let alternate = Box::new(self.parse_statement()?);
            return Ok(Statement::IfElse(IfElseStatement {
                test,
                consequent,
                alternate,
            }));
        }

        Ok(Statement::If(IfStatement { test, consequent }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, Error> {
        self.advance()?; // consume 'while'
        let test = self.parse_paren_expression()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While(WhileStatement { test, body }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, Error> {
        self.advance()?; // consume 'do'
        let body = Box::new(self.parse_statement()?);
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::DoWhile(DoWhileStatement { body, test }))
    }

    fn parse_block_statement(&mut self) -> Result<Statement, Error> {
        self.advance()?; // consume '{'
        let mut block = Statement::Empty;

        while !self.check(TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(self.unexpected("'}'"));
            }
            block = Statement::sequence(block, self.parse_statement()?);
        }

        self.advance()?; // consume '}'
        Ok(block)
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, Error> {
        let expression = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Expression(expression))
    }

    /// Parses `( expr )`.
    fn parse_paren_expression(&mut self) -> Result<Expression, Error> {
        self.expect(TokenKind::LeftParen)?;
        let expression = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(expression)
    }

    /// Parses an expression: a comparison, or an assignment whose target is
    /// the identifier the expression starts with.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        self.enter()?;
        let starts_with_identifier = matches!(self.current.kind, TokenKind::Identifier(_));
        let left = self.parse_comparison()?;

        let expression = match left {
            Expression::Variable(target)
                if starts_with_identifier && self.check(TokenKind::Equal) =>
            {
                self.advance()?;
                let value = self.parse_expression()?;
                Expression::assign(target, value)
            }
            other => other,
        };

        self.leave();
        Ok(expression)
    }

    /// At most one `<`; a second one is left for the caller to reject.
    fn parse_comparison(&mut self) -> Result<Expression, Error> {
        let left = self.parse_additive()?;

        if self.check(TokenKind::LessThan) {
            self.advance()?;
            let right = self.parse_additive()?;
            return Ok(Expression::binary(BinaryOperator::LessThan, left, right));
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_primary()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_primary()?;
            left = Expression::binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        match self.current.kind {
            TokenKind::Identifier(var) => {
                self.advance()?;
                Ok(Expression::Variable(var))
            }
            TokenKind::Number(n) => {
                self.advance()?;
                Ok(Expression::Constant(n))
            }
            _ => self.parse_paren_expression(),
        }
    }

    // Helper methods

    fn advance(&mut self) -> Result<(), Error> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(&kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), Error> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::syntax(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::syntax(
                format!("nesting too deep (limit is {})", self.max_depth),
                self.current.span,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }
}
