use std::fmt;

use crate::tokenizer::Operator;

use super::parser::{ExpressionParser, ParseError, ParseResult};

/// Syntax tree of a fully parenthesized arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Constant(f64),
    Variable(String),
    BinaryOp {
        op: Operator,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
}

impl SyntaxNode {
    pub fn binary(op: Operator, left: SyntaxNode, right: SyntaxNode) -> Self {
        SyntaxNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// Renders the canonical whitespace-free form, e.g. `((x+1)/2)`.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxNode::Constant(value) => write!(f, "{}", value),
            SyntaxNode::Variable(name) => write!(f, "{}", name),
            SyntaxNode::BinaryOp { op, left, right } => write!(f, "({}{}{})", left, op, right),
        }
    }
}

/// A parsed expression together with the text it came from.
///
/// The source is kept verbatim (whitespace included) so errors can quote
/// exactly what the client sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: SyntaxNode,
    source: String,
}

impl Expression {
    /// Strips whitespace, parses, and rejects any input left after a valid
    /// prefix.
    pub fn parse(source: &str) -> ParseResult<Self> {
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        let mut parser = ExpressionParser::new(&stripped);
        let root = parser.parse()?;
        if !parser.is_at_end() {
            return Err(ParseError::InvalidFormat {
                position: parser.position(),
                found: parser.peek().unwrap_or_default(),
            });
        }
        Ok(Self {
            root,
            source: source.to_string(),
        })
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
