//! Recursive-descent parser for the expression grammar:
//!
//! ```text
//! expr       := number | identifier | "(" expr operator expr ")"
//! operator   := "+" | "-" | "*" | "/" | "^"
//! number     := [0-9]+ ("." [0-9]+)?
//! identifier := [a-z][a-z0-9]*
//! ```
//!
//! Every binary operation is bracketed, so there is no precedence or
//! associativity to resolve. The parser owns one forward-only cursor and at
//! each position commits to the first of constant, variable or bracketed
//! operation that matches.

use thiserror::Error;

use crate::tokenizer::{
    parse_delimiter, parse_identifier, parse_number, parse_symbol, Delimiter, Operator, Span,
    Token,
};

use super::ast::SyntaxNode;

/// Nesting limit for bracketed operations. Both parsing and evaluation
/// recurse once per level, so this bounds stack use on hostile input.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of expression at {position}")]
    UnexpectedEnd { position: usize },
    #[error("Unexpected char at {position}: '{found}'")]
    UnexpectedChar { position: usize, found: char },
    #[error("Unexpected char at {position} instead of '{expected}': '{found}'")]
    Expected {
        position: usize,
        expected: Delimiter,
        found: char,
    },
    #[error("Unexpected char at {position} instead of operator: '{found}'")]
    ExpectedOperator { position: usize, found: char },
    #[error("Unknown operator at {position}: '{found}'")]
    UnknownOperator { position: usize, found: char },
    #[error("Expression nested deeper than {limit} levels at {position}")]
    TooDeep { position: usize, limit: usize },
    #[error("Invalid expression format: unexpected trailing input at {position}: '{found}'")]
    InvalidFormat { position: usize, found: char },
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ExpressionParser<'a> {
    remaining: Span<'a>,
}

impl<'a> ExpressionParser<'a> {
    /// `input` must already be stripped of whitespace.
    pub fn new(input: &'a str) -> Self {
        Self {
            remaining: Span::new(input),
        }
    }

    /// Parses one expression starting at the cursor. Trailing input is left
    /// in place; callers check [`Self::is_at_end`].
    pub fn parse(&mut self) -> ParseResult<SyntaxNode> {
        self.parse_node(0)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining.fragment().is_empty()
    }

    pub fn position(&self) -> usize {
        self.remaining.location_offset()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining.fragment().chars().next()
    }

    fn parse_node(&mut self, depth: usize) -> ParseResult<SyntaxNode> {
        if self.is_at_end() {
            return Err(self.unexpected_end());
        }

        if let Ok((rest, Token::Number(value))) = parse_number(self.remaining) {
            self.remaining = rest;
            return Ok(SyntaxNode::Constant(value));
        }

        if let Ok((rest, Token::Identifier(name))) = parse_identifier(self.remaining) {
            self.remaining = rest;
            return Ok(SyntaxNode::Variable(name));
        }

        if let Ok((rest, Token::Delimiter(Delimiter::OpenParen))) = parse_delimiter(self.remaining)
        {
            if depth >= MAX_NESTING_DEPTH {
                return Err(ParseError::TooDeep {
                    position: self.position(),
                    limit: MAX_NESTING_DEPTH,
                });
            }
            self.remaining = rest;
            let left = self.parse_node(depth + 1)?;
            let op = self.expect_operator()?;
            let right = self.parse_node(depth + 1)?;
            self.expect_delimiter(Delimiter::CloseParen)?;
            return Ok(SyntaxNode::binary(op, left, right));
        }

        Err(self.unexpected_char())
    }

    fn expect_operator(&mut self) -> ParseResult<Operator> {
        let position = self.position();
        match parse_symbol(self.remaining) {
            Ok((rest, Token::Symbol(symbol))) => {
                let op = Operator::from_symbol(symbol).ok_or(ParseError::UnknownOperator {
                    position,
                    found: symbol,
                })?;
                self.remaining = rest;
                Ok(op)
            }
            _ => match self.peek() {
                Some(found) => Err(ParseError::ExpectedOperator { position, found }),
                None => Err(self.unexpected_end()),
            },
        }
    }

    fn expect_delimiter(&mut self, expected: Delimiter) -> ParseResult<()> {
        match parse_delimiter(self.remaining) {
            Ok((rest, Token::Delimiter(found))) if found == expected => {
                self.remaining = rest;
                Ok(())
            }
            _ => match self.peek() {
                Some(found) => Err(ParseError::Expected {
                    position: self.position(),
                    expected,
                    found,
                }),
                None => Err(self.unexpected_end()),
            },
        }
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::UnexpectedEnd {
            position: self.position(),
        }
    }

    fn unexpected_char(&self) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedChar {
                position: self.position(),
                found,
            },
            None => self.unexpected_end(),
        }
    }
}
