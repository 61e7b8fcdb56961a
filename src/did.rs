//! # DID Documents and Resolution
//!
//! DID documents, DID URL parsing, and the DID methods the registry handles
//! natively. `did:jwk` is self-describing and resolved locally; `did:web` has
//! helpers for mapping identifiers to HTTP locations. Every other method is
//! resolved through the [`IdentityResolver`](crate::IdentityResolver)
//! provider.
//!
//! See [DID resolution](https://www.w3.org/TR/did-core/#did-resolution) for more.

mod document;
pub mod jwk;
mod resolve;
mod service;
mod url;
mod verification;
pub mod web;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::anyhow;

pub use self::document::*;
pub use self::resolve::{dereference, resolve_document};
pub use self::service::*;
pub use self::url::Url;
pub use self::verification::*;

/// DID methods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// `did:jwk`
    #[default]
    Jwk,

    /// `did:web`
    Web,

    /// Any other method, resolved by the provider.
    Other(String),
}

impl FromStr for Method {
    type Err = anyhow::Error;

    /// Parse a string into a [`Method`].
    ///
    /// # Errors
    ///
    /// Returns an error if the method name is empty or contains characters
    /// other than lowercase letters and digits.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "jwk" => Ok(Self::Jwk),
            "web" => Ok(Self::Web),
            _ if !s.is_empty()
                && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) =>
            {
                Ok(Self::Other(s.to_string()))
            }
            _ => Err(anyhow!("invalid method name: {s}")),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jwk => write!(f, "jwk"),
            Self::Web => write!(f, "web"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}
