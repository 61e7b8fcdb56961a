//! # Handlers
//!
//! Entry points for the registry's HTTP surface, independent of any web
//! framework. Each handler takes a [`Provider`](crate::Provider) and returns
//! either a [`Response`] or an [`Error`], which the caller renders with
//! [`Error::to_response`].

mod document;
mod register;
mod resolve;

use serde::{Deserialize, Serialize};

pub use self::document::{resolve_root, resolve_well_known};
pub use self::register::{RegisterResponse, register};
pub use self::resolve::resolve;
pub use crate::error::Error;

/// Result type for registry handlers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A successful handler response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Response<T> {
    /// HTTP status code.
    pub status: u16,

    /// Response body.
    pub body: T,
}

impl<T> Response<T> {
    /// A `200 OK` response.
    pub const fn ok(body: T) -> Self {
        Self { status: 200, body }
    }

    /// A `201 Created` response.
    pub const fn created(body: T) -> Self {
        Self { status: 201, body }
    }
}
