use nom::{
    bytes::complete::take_while,
    character::complete::satisfy,
    combinator::{map, recognize},
    error::context,
    sequence::pair,
    IResult,
};
use nom_locate::LocatedSpan;

use super::symbol::Delimiter;

/// Input type shared by every recognizer. The span keeps the byte offset of
/// each fragment relative to the start of the expression, which is what
/// parse errors report.
pub type Span<'a> = LocatedSpan<&'a str>;

pub type ParserResult<'a, T> = IResult<Span<'a>, T>;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    /// Any operator-like punctuation; mapped to an [`super::Operator`] by the parser.
    Symbol(char),
    Delimiter(Delimiter),
}

/// `[a-z][a-z0-9]*`
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_identifier(input: Span) -> ParserResult<Token> {
    context(
        "identifier",
        map(
            recognize(pair(
                satisfy(|c| c.is_ascii_lowercase()),
                take_while(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()),
            )),
            |name: Span| Token::Identifier(name.fragment().to_string()),
        ),
    )(input)
}
