use std::time::Duration;

use thiserror::Error;

use crate::domain::DomainError;
use crate::eval::AggregateError;
use crate::expression::ParseError;
use crate::runtime::Cancelled;

/// Malformed top-level request shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid request format")]
    InvalidFormat,
    #[error("Invalid computation request format: request parts < 3")]
    TooFewParts,
    #[error("Invalid computation kind '{0}'")]
    UnknownAggregation(String),
    #[error("Invalid values kind '{0}'")]
    UnknownMode(String),
}

/// Everything that can turn a request into an `ERR;` response. The
/// parenthesized tag lets a client classify the failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    #[error("(FormatError) {0}")]
    Request(#[from] RequestError),
    #[error("(BuildError) {0}")]
    Domain(DomainError),
    #[error("(ParseError) Parsing error for expression '{expression}' : {source}")]
    Parse {
        expression: String,
        #[source]
        source: ParseError,
    },
    #[error("(EvaluationError) {0}")]
    Aggregate(AggregateError),
    #[error(
        "(ComputationTimeout) The computation took longer than {} seconds.",
        .0.as_secs_f64()
    )]
    ComputationTimeout(Duration),
    #[error(
        "(QueueTimeout) The computation request stayed in the queue for more than {} seconds.",
        .0.as_secs_f64()
    )]
    QueueTimeout(Duration),
    #[error("(Cancelled) {0}")]
    Cancelled(#[from] Cancelled),
    #[error("Cannot compute due to {0}")]
    Worker(String),
}

pub type ComputeResult<T> = Result<T, ComputeError>;

impl From<DomainError> for ComputeError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Cancelled(cancelled) => ComputeError::Cancelled(cancelled),
            other => ComputeError::Domain(other),
        }
    }
}

impl From<AggregateError> for ComputeError {
    fn from(error: AggregateError) -> Self {
        match error {
            AggregateError::Cancelled(cancelled) => ComputeError::Cancelled(cancelled),
            other => ComputeError::Aggregate(other),
        }
    }
}
