//! # Provider Traits
//!
//! The registry consumes DID resolution, the operator secret and the storage
//! engine through these traits. Implementers choose the transport: an HTTP
//! `did:web` resolver, an environment-backed secret, a `sled` database, or
//! in-memory stand-ins for tests.

use anyhow::Result;

use crate::did::Document;
use crate::store::{DapRow, EngineError};

/// Name of the secret holding the operator's portable DID.
pub const OPERATOR_SECRET: &str = "did_web_portable_did";

/// [`IdentityResolver`] is used to proxy the resolution of a DID.
///
/// Implementers need only return the document for the DID given. This may be
/// by fetching it over HTTP (`did:web`), looking up a local cache, or consulting
/// a ledger. Self-describing methods such as `did:jwk` are expanded by the
/// library and never reach the resolver.
pub trait IdentityResolver: Send + Sync + Clone {
    /// Resolve the DID to its DID document.
    ///
    /// # Errors
    ///
    /// Returns an error if the DID cannot be resolved.
    fn resolve(&self, did: &str) -> impl Future<Output = Result<Document>> + Send;
}

/// [`SecretStore`] supplies named secrets, such as the operator's portable
/// DID.
///
/// Secrets are requested on every use so that rotation takes effect on the
/// next call. Implementers should not cache them.
pub trait SecretStore: Send + Sync + Clone {
    /// Fetch the secret named `name`. Returns `None` if no such secret exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret source is unavailable.
    fn secret(&self, name: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// [`Datastore`] is the storage engine behind the registry.
///
/// `insert` must be atomic and must enforce uniqueness of `id`, `did` and
/// `handle` itself, reporting a violation by constraint name
/// ([`EngineError::UniqueViolation`]).
pub trait Datastore: Send + Sync + Clone {
    /// Insert a row, failing if any unique key is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UniqueViolation`] on a key collision, or
    /// [`EngineError::Engine`] if the engine fails.
    fn insert(&self, row: DapRow) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Look up a row by handle.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Engine`] if the engine fails.
    fn find_by_handle(
        &self, handle: &str,
    ) -> impl Future<Output = Result<Option<DapRow>, EngineError>> + Send;
}

/// Everything the registry handlers need.
pub trait Provider: IdentityResolver + SecretStore + Datastore {}

/// A blanket implementation for `Provider` trait so that any type implementing
/// the required super traits is considered a `Provider`.
impl<T> Provider for T where T: IdentityResolver + SecretStore + Datastore {}
