//! # Handler Errors
//!
//! Every handler failure is one of these variants, each mapping to a single
//! HTTP status. Internal errors keep their cause for logging but show the
//! caller an opaque message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry handler errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The request is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The request's signature is invalid or not authorized.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with an existing registration.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected failure.
    #[error("failed to process request")]
    Internal(#[source] anyhow::Error),
}

/// Error response body.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrResponse {
    /// HTTP status code.
    pub status: u16,

    /// Human-readable message.
    pub message: String,
}

impl Error {
    /// HTTP status code for the error.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error as a response body.
    #[must_use]
    pub fn to_response(&self) -> ErrResponse {
        ErrResponse {
            status: self.status(),
            message: self.to_string(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
