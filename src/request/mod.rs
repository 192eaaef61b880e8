//! Request line classification and the computation request pipeline.
//!
//! A line is either a stat query (`STAT_REQS`, `STAT_AVG_TIME`,
//! `STAT_MAX_TIME`) or a computation request whose header is
//! `<AGGREGATION>_<TUPLEMODE>;`. Anything else is a format error.

pub mod computation;
pub mod error;
pub mod response;
pub mod stat;

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::domain::TupleMode;
use crate::eval::AggregationKind;

pub use computation::ComputationRequest;
pub use error::{ComputeError, ComputeResult, RequestError};
pub use response::Response;
pub use stat::StatKind;

fn alternatives<I: Iterator<Item = T>, T: AsRef<str>>(items: I) -> String {
    items
        .map(|item| regex::escape(item.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

lazy_static! {
    static ref STAT_PATTERN: Regex = Regex::new(&format!(
        "^({})$",
        alternatives(StatKind::iter())
    ))
    .expect("stat pattern is valid");
    static ref COMPUTATION_PATTERN: Regex = Regex::new(&format!(
        "^({})_({});",
        alternatives(AggregationKind::iter()),
        alternatives(TupleMode::iter())
    ))
    .expect("computation pattern is valid");
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Stat(StatKind),
    Computation(ComputationRequest),
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        if STAT_PATTERN.is_match(line) {
            StatKind::from_str(line)
                .map(Request::Stat)
                .map_err(|_| RequestError::InvalidFormat)
        } else if COMPUTATION_PATTERN.is_match(line) {
            ComputationRequest::parse(line).map(Request::Computation)
        } else {
            Err(RequestError::InvalidFormat)
        }
    }
}
