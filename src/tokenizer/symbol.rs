//! # Symbol Token Handling
//!
//! Expressions know two kinds of symbols: the five binary [`Operator`]s and
//! the round-bracket [`Delimiter`]s that wrap every binary operation.
//!
//! [`parse_symbol`] accepts any ASCII punctuation that is not a bracket. Mapping the raw character to an [`Operator`] happens in the
//! parser, so an unsupported operator such as `%` is reported as an unknown
//! operator at its position rather than as a generic unexpected character.

use std::str::FromStr;

use nom::{
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{map, value},
    error::context,
};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::token::{ParserResult, Span, Token};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
pub enum Operator {
    /// Addition (`+`)
    #[strum(serialize = "+")]
    Add,
    /// Subtraction (`-`)
    #[strum(serialize = "-")]
    Subtract,
    /// Multiplication (`*`)
    #[strum(serialize = "*")]
    Multiply,
    /// Division (`/`)
    #[strum(serialize = "/")]
    Divide,
    /// Exponentiation (`^`)
    #[strum(serialize = "^")]
    Power,
}

impl Operator {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let mut buf = [0u8; 4];
        Self::from_str(symbol.encode_utf8(&mut buf)).ok()
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    /// Opening parenthesis (`(`)
    #[strum(serialize = "(")]
    OpenParen,
    /// Closing parenthesis (`)`)
    #[strum(serialize = ")")]
    CloseParen,
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_punctuation() && c != '(' && c != ')'
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_symbol(input: Span) -> ParserResult<Token> {
    context("symbol", map(satisfy(is_symbol_char), Token::Symbol))(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_delimiter(input: Span) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, char('(')),
                value(Delimiter::CloseParen, char(')')),
            )),
            Token::Delimiter,
        ),
    )(input)
}
