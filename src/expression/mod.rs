pub mod ast;
pub mod parser;

pub use ast::{Expression, SyntaxNode};
pub use parser::{ExpressionParser, ParseError, ParseResult, MAX_NESTING_DEPTH};
