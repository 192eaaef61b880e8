//! Token recognizers for the expression grammar.
//!
//! The expression parser does not tokenize up front. It keeps a single
//! forward-only [`Span`] and tries these recognizers at the current position,
//! so each recognizer only needs to succeed or fail on the next token.

pub mod literal;
pub mod symbol;
pub mod token;

pub use literal::parse_number;
pub use symbol::{parse_delimiter, parse_symbol, Delimiter, Operator};
pub use token::{parse_identifier, ParserResult, Span, Token};
