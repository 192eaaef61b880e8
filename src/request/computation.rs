use std::str::FromStr;

use tracing::debug;

use crate::domain::{parse_domain_spec, DomainSet, TupleMode};
use crate::eval::{aggregate, AggregationKind};
use crate::expression::Expression;
use crate::runtime::CancelFlag;

use super::error::{ComputeError, ComputeResult, RequestError};

/// `<AGGREGATION>_<TUPLEMODE>;<domain-spec>;<expr1>;<expr2>;...`, split but
/// not yet parsed any further.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationRequest {
    aggregation: AggregationKind,
    mode: TupleMode,
    domain_spec: String,
    expressions: Vec<String>,
}

impl ComputationRequest {
    pub fn new(
        aggregation: AggregationKind,
        mode: TupleMode,
        domain_spec: impl Into<String>,
        expressions: Vec<String>,
    ) -> Self {
        Self {
            aggregation,
            mode,
            domain_spec: domain_spec.into(),
            expressions,
        }
    }

    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let mut parts: Vec<&str> = line.split(';').collect();
        // trailing separators do not count as parts
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
        if parts.len() < 3 {
            return Err(RequestError::TooFewParts);
        }

        let (aggregation, mode) = parts[0]
            .split_once('_')
            .ok_or(RequestError::InvalidFormat)?;
        let aggregation = AggregationKind::from_str(aggregation)
            .map_err(|_| RequestError::UnknownAggregation(aggregation.to_string()))?;
        let mode =
            TupleMode::from_str(mode).map_err(|_| RequestError::UnknownMode(mode.to_string()))?;

        Ok(Self::new(
            aggregation,
            mode,
            parts[1],
            parts[2..].iter().map(|part| part.to_string()).collect(),
        ))
    }

    pub fn aggregation(&self) -> AggregationKind {
        self.aggregation
    }

    pub fn mode(&self) -> TupleMode {
        self.mode
    }

    pub fn domain_spec(&self) -> &str {
        &self.domain_spec
    }

    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// Runs the whole pipeline synchronously: domain spec, tuples,
    /// expressions, aggregation. Expressions are parsed for every kind,
    /// `COUNT` included.
    pub fn run(&self, max_domain_len: usize, cancel: &CancelFlag) -> ComputeResult<f64> {
        let domains = parse_domain_spec(&self.domain_spec)?;
        let set = DomainSet::build(&domains, max_domain_len, cancel)?;
        let tuples = set.tuples(self.mode)?;
        debug!(
            variables = set.len(),
            tuples = tuples.len(),
            mode = %self.mode,
            "tuples ready"
        );

        let expressions = self
            .expressions
            .iter()
            .map(|source| {
                Expression::parse(source).map_err(|error| ComputeError::Parse {
                    expression: source.clone(),
                    source: error,
                })
            })
            .collect::<ComputeResult<Vec<_>>>()?;

        let value = aggregate(self.aggregation, tuples, &expressions, &set, cancel)?;
        debug!(aggregation = %self.aggregation, value, "aggregated");
        Ok(value)
    }
}
