use thiserror::Error;

use crate::runtime::Cancelled;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid variable values '{entry}'. Required format: name:lower:step:upper")]
    InvalidEntry { entry: String },
    #[error("Invalid number '{value}' in variable values '{entry}'")]
    InvalidNumber { entry: String, value: String },
    #[error("Invalid variable name '{name}'")]
    InvalidName { name: String },
    #[error("Variable '{0}' is declared more than once")]
    DuplicateVariable(String),
    #[error("Invalid variable values for '{name}': step must be positive, got {step}")]
    NonPositiveStep { name: String, step: f64 },
    #[error("Step {step} of variable '{name}' is too small to advance past {value}")]
    StepTooSmall { name: String, step: f64, value: f64 },
    #[error("Domain of variable '{name}' exceeds {limit} values")]
    TooLarge { name: String, limit: usize },
    #[error("Variable domains exceed {limit} values in total")]
    TotalTooLarge { limit: usize },
    #[error("Number of value tuples exceeds the addressable range")]
    TooManyTuples,
    #[error("All variable value lists must have the same length")]
    UnequalLengths,
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

pub type DomainResult<T> = Result<T, DomainError>;
