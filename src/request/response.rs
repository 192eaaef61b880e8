use std::{fmt, time::Duration};

/// One response line, without the line terminator.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Ok { elapsed: Duration, value: f64 },
    Err(String),
}

impl Response {
    pub fn ok(elapsed: Duration, value: f64) -> Self {
        Response::Ok { elapsed, value }
    }

    pub fn error(error: impl fmt::Display) -> Self {
        Response::Err(error.to_string())
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Response::Ok { value, .. } => Some(*value),
            Response::Err(_) => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok { elapsed, value } => {
                write!(f, "OK;{:.3};{:.6}", elapsed.as_secs_f64(), value)
            }
            Response::Err(message) => write!(f, "ERR;{}", message),
        }
    }
}
