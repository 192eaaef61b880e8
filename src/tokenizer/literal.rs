use nom::{
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    error::context,
    sequence::pair,
};

use super::token::{ParserResult, Span, Token};

/// Non-negative decimal literal: `[0-9]+(\.[0-9]+)?`.
///
/// A trailing dot without fraction digits is not consumed, so `1.` yields
/// `1` and leaves `.` in the input.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_number(input: Span) -> ParserResult<Token> {
    context(
        "number literal",
        map_res(
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            |s: Span| s.fragment().parse::<f64>().map(Token::Number),
        ),
    )(input)
}
