//! # DAP Registry
//!
//! A registry binding human-readable handles to decentralized identifiers
//! (DIDs). A handle is accepted only when the registration request carries a
//! signature that verifies against the key material of the claimed DID (or of
//! the registry operator's own DID), and both the DID and the handle are unique
//! across the registry.
//!
//! The crate also publishes the registry operator's DID document under the
//! `did:web` method, at whichever of `/.well-known/did.json` or `/did.json`
//! matches the shape of the operator's identifier.
//!
//! Transport is left to the caller: [`handlers`] expose plain async functions
//! returning typed [`Response`]s or [`Error`]s, and a [`Provider`] supplies DID
//! resolution, the operator secret, and the storage engine.

pub mod bearer;
pub mod core;
pub mod dap;
pub mod did;
mod error;
pub mod handlers;
pub mod jose;
mod provider;
pub mod store;

pub use self::bearer::{BearerDid, PortableDid};
pub use self::dap::{Dap, RegistrationId, RegistrationRequest};
pub use self::error::{ErrResponse, Error};
pub use self::handlers::{Response, Result};
pub use self::provider::*;
