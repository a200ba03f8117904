pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod template;

pub use ast::{BinaryOp, Expr, ExprKind, IncDecOp, SelectionKind, UnaryOp};
pub use error::{ErrorCode, ParseError};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use template::{
    parse_expression, parse_template, parse_template_with, Expression, Fragment, TemplateContext,
};

/// Parse a single expression (non-template mode) into its AST.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new(input)?.parse()
}

/// Tokenize a source string into the full token sequence.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::tokenize(input)
}

/// Serialize an AST to JSON, e.g. for inspection tooling.
pub fn ast_to_json(expr: &Expr) -> serde_json::Result<String> {
    serde_json::to_string(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_precedence() {
        let expr = parse("2 + 3 * 4").unwrap();
        match &expr.kind {
            ExprKind::Binary(lhs, BinaryOp::Add, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::Int(2)));
                assert!(matches!(rhs.kind, ExprKind::Binary(_, BinaryOp::Mul, _)));
            }
            other => panic!("expected sum, got {:?}", other),
        }
    }

    #[test]
    fn template_round_trip_display() {
        let expr = parse_template("Hello #{name}!").unwrap();
        assert_eq!(expr.to_string(), "Hello #{name}!");
        assert_eq!(expr.fragments().unwrap().len(), 3);
    }

    #[test]
    fn empty_input_is_out_of_data() {
        let err = parse("").unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfData);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn ast_json_is_stable() {
        let expr = parse("1 + 2").unwrap();
        let json = ast_to_json(&expr).unwrap();
        assert!(json.contains("Binary"));
        assert_eq!(json, ast_to_json(&parse("1 + 2").unwrap()).unwrap());
    }
}
