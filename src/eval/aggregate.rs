use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Tuples, VariableLookup};
use crate::expression::Expression;
use crate::runtime::{CancelFlag, Cancelled};

use super::evaluator::{EvalError, Evaluator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum AggregationKind {
    Min,
    Max,
    Avg,
    Count,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Error while evaluating the expression '{expression}' : {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvalError,
    },
    #[error("An error occurred while computing AVG for the first expression : {0}")]
    FirstExpression(#[source] EvalError),
    #[error("No tuples to aggregate for {0}")]
    NoTuples(AggregationKind),
    #[error("No expressions to aggregate")]
    NoExpressions,
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Drives the evaluator over `tuples` and folds the results into one scalar.
///
/// * `MIN`/`MAX` evaluate every expression on every tuple.
/// * `AVG` evaluates only the first expression.
/// * `COUNT` returns the tuple count and never evaluates anything.
///
/// Zero tuples is an error for every kind except `COUNT`.
pub fn aggregate<L: VariableLookup + ?Sized>(
    kind: AggregationKind,
    mut tuples: Tuples<'_>,
    expressions: &[Expression],
    lookup: &L,
    cancel: &CancelFlag,
) -> AggregateResult<f64> {
    let evaluator = Evaluator::new(lookup);
    match kind {
        AggregationKind::Count => Ok(tuples.len() as f64),
        AggregationKind::Min | AggregationKind::Max => {
            ensure_input(kind, &tuples, expressions)?;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            while let Some(tuple) = tuples.next_checked(cancel)? {
                for expression in expressions {
                    let value = evaluator.evaluate(expression.root(), tuple).map_err(|source| {
                        AggregateError::Evaluation {
                            expression: expression.source().to_string(),
                            source,
                        }
                    })?;
                    min = min.min(value);
                    max = max.max(value);
                }
            }
            Ok(if kind == AggregationKind::Min { min } else { max })
        }
        AggregationKind::Avg => {
            ensure_input(kind, &tuples, expressions)?;
            let first = &expressions[0];
            let count = tuples.len();
            let mut sum = 0.0;
            while let Some(tuple) = tuples.next_checked(cancel)? {
                sum += evaluator
                    .evaluate(first.root(), tuple)
                    .map_err(AggregateError::FirstExpression)?;
            }
            Ok(sum / count as f64)
        }
    }
}

fn ensure_input(
    kind: AggregationKind,
    tuples: &Tuples<'_>,
    expressions: &[Expression],
) -> AggregateResult<()> {
    if expressions.is_empty() {
        return Err(AggregateError::NoExpressions);
    }
    if tuples.is_empty() {
        return Err(AggregateError::NoTuples(kind));
    }
    debug!(
        %kind,
        tuples = tuples.len(),
        expressions = expressions.len(),
        "aggregating"
    );
    Ok(())
}
