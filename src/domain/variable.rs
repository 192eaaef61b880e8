use crate::runtime::CancelFlag;
use crate::tokenizer::{parse_identifier, Span};

use super::error::{DomainError, DomainResult};

/// Number of decimal digits kept after every step, so that repeated
/// additions such as `0.1 + 0.1 + 0.1` land on `0.3` instead of drifting.
pub const DOMAIN_PRECISION: i32 = 12;

pub fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(DOMAIN_PRECISION);
    let scaled = value * factor;
    // past 2^53 an f64 has no fractional digits left to round
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    scaled.round() / factor
}

/// One `name:lower:step:upper` entry of a domain spec.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDomain {
    name: String,
    lower: f64,
    step: f64,
    upper: f64,
}

impl VariableDomain {
    pub fn new(name: impl Into<String>, lower: f64, step: f64, upper: f64) -> DomainResult<Self> {
        let name = name.into();
        // written negated so a NaN step is rejected too
        if !(step > 0.0) {
            return Err(DomainError::NonPositiveStep { name, step });
        }
        Ok(Self {
            name,
            lower,
            step,
            upper,
        })
    }

    /// Parses `name:lower:step:upper`.
    pub fn parse(entry: &str) -> DomainResult<Self> {
        let fields: Vec<&str> = entry.split(':').map(str::trim).collect();
        let [name, lower, step, upper] = fields.as_slice() else {
            return Err(DomainError::InvalidEntry {
                entry: entry.to_string(),
            });
        };

        if !is_identifier(name) {
            return Err(DomainError::InvalidName {
                name: name.to_string(),
            });
        }

        let number = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| DomainError::InvalidNumber {
                    entry: entry.to_string(),
                    value: value.to_string(),
                })
        };

        Self::new(*name, number(*lower)?, number(*step)?, number(*upper)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn is_empty(&self) -> bool {
        // NaN bounds also produce no values
        !(self.lower <= self.upper)
    }

    /// Upper estimate of the number of values, computed without generating
    /// them. Infinite or overflowing ranges saturate at `usize::MAX`.
    pub fn estimated_len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let steps = ((self.upper - self.lower) / self.step).floor() + 1.0;
        if steps.is_finite() && steps < usize::MAX as f64 {
            steps as usize
        } else {
            usize::MAX
        }
    }

    /// Generates the ascending values `lower, lower+step, ...` up to and
    /// including `upper`, rounding after every addition.
    ///
    /// Fails with [`DomainError::TooLarge`] when the estimate is above `limit`
    /// (the rounded sequence can be one value longer than the estimate; the
    /// limit is enforced on the estimate only).
    pub fn values(&self, limit: usize, cancel: &CancelFlag) -> DomainResult<Vec<f64>> {
        let estimated = self.estimated_len();
        if estimated > limit {
            return Err(DomainError::TooLarge {
                name: self.name.clone(),
                limit,
            });
        }

        let mut values = Vec::with_capacity(estimated.saturating_add(1));
        let mut value = self.lower;
        while value <= self.upper {
            cancel.check()?;
            values.push(value);
            let next = round_to_precision(value + self.step);
            if next <= value {
                return Err(DomainError::StepTooSmall {
                    name: self.name.clone(),
                    step: self.step,
                    value,
                });
            }
            value = next;
        }
        Ok(values)
    }
}

/// Parses a comma-separated domain spec, keeping declaration order.
pub fn parse_domain_spec(spec: &str) -> DomainResult<Vec<VariableDomain>> {
    spec.split(',').map(VariableDomain::parse).collect()
}

fn is_identifier(name: &str) -> bool {
    matches!(parse_identifier(Span::new(name)), Ok((rest, _)) if rest.fragment().is_empty())
}
