//! Tree-walking evaluation and aggregation over generated tuples.

pub mod aggregate;
pub mod evaluator;

pub use aggregate::{aggregate, AggregateError, AggregateResult, AggregationKind};
pub use evaluator::{EvalError, EvalResult, Evaluator};
