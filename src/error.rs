use thiserror::Error;

use crate::server::ServerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
