//! Variable domains and tuple generation.
//!
//! A request declares variables as `name:lower:step:upper`. Each one becomes
//! an ordered value sequence ([`VariableDomain::values`]); a [`DomainSet`]
//! keeps them in declaration order and combines them into tuples either as
//! a cartesian product ([`TupleMode::Grid`]) or as a zip ([`TupleMode::List`]).

pub mod error;
pub mod tuples;
pub mod variable;

pub use error::{DomainError, DomainResult};
pub use tuples::{DomainSet, TupleMode, Tuples, VariableLookup};
pub use variable::{parse_domain_spec, round_to_precision, VariableDomain, DOMAIN_PRECISION};
