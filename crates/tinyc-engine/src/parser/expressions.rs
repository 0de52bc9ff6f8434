//! Expression parsing documentation.
//!
//! This module documents the expression parsing logic found in `parser.rs`.
//! Expression parsing uses recursive descent with operator precedence.
//!
//! ## Precedence Table (lowest to highest)
//!
//! | Precedence | Operators | Method |
//! |------------|-----------|--------|
//! | 1 | `=` (right associative) | `parse_expression` |
//! | 2 | `<` (non-chaining) | `parse_comparison` |
//! | 3 | `+` `-` (left associative) | `parse_additive` |
//! | 4 | primary | `parse_primary` |
//!
//! ## Primary Expressions
//!
//! - Variables: `a` .. `z`
//! - Integer literals: `0`, `42`
//! - Parenthesized: `(a + b)`
//!
//! There is no unary minus; write `0 - x`.
//!
//! ## Grammar
//!
//! ```text
//! paren_expr := "(" expr ")"
//! expr       := test | IDENT "=" expr
//! test       := sum ("<" sum)?
//! sum        := term (("+"|"-") term)*
//! term       := IDENT | NUMBER | paren_expr
//! ```
//!
//! An assignment is only recognised when the expression starts with an
//! identifier token and that identifier is the whole left side, so `(a) = 1`
//! is rejected. `a < b < c` is rejected: the second `<` is left unconsumed and
//! the enclosing statement fails to find its terminator.

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOperator, Expression, Statement};
    use crate::parser::Parser;

    fn parse_expr(src: &str) -> Expression {
        let source = format!("{};", src);
        let mut parser = Parser::new(&source);
        let program = parser.parse_program().expect("Should parse");
        match program.body {
            Statement::Sequence(seq) => match &*seq.second {
                Statement::Expression(expr) => expr.clone(),
                other => panic!("expected expression statement, got {:?}", other),
            },
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    fn parse_fails(src: &str) -> bool {
        let source = format!("{};", src);
        Parser::new(&source).parse_program().is_err()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expr("42"), Expression::Constant(42));
    }

    #[test]
    fn test_parse_variable() {
        assert!(matches!(parse_expr("q"), Expression::Variable(v) if v.letter() == 'q'));
    }

    #[test]
    fn test_parse_grouping() {
        let expr = parse_expr("a - (b - c)");
        let Expression::Binary(bin) = expr else {
            panic!("expected binary");
        };
        assert_eq!(bin.operator, BinaryOperator::Subtract);
        assert!(matches!(*bin.right, Expression::Binary(_)));
    }

    #[test]
    fn test_comparison_binds_looser_than_sum() {
        let Expression::Binary(bin) = parse_expr("a + 1 < b - 1") else {
            panic!("expected binary");
        };
        assert_eq!(bin.operator, BinaryOperator::LessThan);
        assert!(matches!(&*bin.left, Expression::Binary(l) if l.operator == BinaryOperator::Add));
        assert!(
            matches!(&*bin.right, Expression::Binary(r) if r.operator == BinaryOperator::Subtract)
        );
    }

    #[test]
    fn test_assignment_of_comparison() {
        let Expression::Assignment(assign) = parse_expr("f = a < b") else {
            panic!("expected assignment");
        };
        assert_eq!(assign.target.letter(), 'f');
        assert!(matches!(*assign.value, Expression::Binary(_)));
    }

    #[test]
    fn test_parenthesized_chained_comparison() {
        assert!(matches!(parse_expr("(a < b) < c"), Expression::Binary(_)));
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(parse_fails("a < b < c"));
        assert!(parse_fails("1 = a"));
        assert!(parse_fails("-a"));
        assert!(parse_fails("a +"));
        assert!(parse_fails("()"));
        assert!(parse_fails("(a) = 1"));
    }
}
