//! # Registry Store
//!
//! The data access layer over a [`Datastore`] engine. Uniqueness of DIDs and
//! handles is enforced by the engine's atomic insert; this layer only
//! classifies the engine's constraint violations into domain conflicts.

mod memory;
mod sled;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::memory::MemoryTable;
pub use self::sled::SledTable;
use crate::Datastore;
use crate::dap::RegistrationRequest;

/// Primary key constraint on the registration ID.
pub const PKEY_CONSTRAINT: &str = "daps_pkey";

/// Unique constraint on the DID column.
pub const DID_CONSTRAINT: &str = "daps_did_key";

/// Unique constraint on the handle column.
pub const HANDLE_CONSTRAINT: &str = "daps_handle_key";

/// A persisted registration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DapRow {
    /// Registration ID (primary key).
    pub id: String,

    /// Registered DID (unique).
    pub did: String,

    /// Registered handle (unique).
    pub handle: String,

    /// The verified request, as submitted, serialized to JSON.
    pub proof: String,
}

/// Errors reported by a storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// Any other engine failure.
    #[error("storage engine failure: {0}")]
    Engine(#[from] anyhow::Error),
}

/// Errors reported by the [`Registry`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The DID is already registered.
    #[error("DID already registered")]
    DidConflict,

    /// The handle is already registered.
    #[error("Handle already registered")]
    HandleConflict,

    /// The engine failed, or stored data is unreadable.
    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Map an engine error onto the registry's error vocabulary.
///
/// Only the DID and handle constraints are domain conflicts. A primary key
/// collision, like any other engine failure, is a storage error.
#[must_use]
pub fn classify(err: EngineError) -> StoreError {
    match err {
        EngineError::UniqueViolation { constraint } if constraint == DID_CONSTRAINT => {
            StoreError::DidConflict
        }
        EngineError::UniqueViolation { constraint } if constraint == HANDLE_CONSTRAINT => {
            StoreError::HandleConflict
        }
        other => StoreError::Storage(other.into()),
    }
}

/// Registration persistence.
#[derive(Clone, Debug)]
pub struct Registry<'a, D: Datastore> {
    engine: &'a D,
}

impl<'a, D: Datastore> Registry<'a, D> {
    /// Create a registry over `engine`.
    pub const fn new(engine: &'a D) -> Self {
        Self { engine }
    }

    /// Persist a verified request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DidConflict`] or [`StoreError::HandleConflict`]
    /// if either is already registered, or [`StoreError::Storage`] for any
    /// other failure.
    pub async fn create(&self, request: &RegistrationRequest) -> Result<(), StoreError> {
        let proof = serde_json::to_string(request).map_err(|e| StoreError::Storage(e.into()))?;
        let row = DapRow {
            id: request.id.to_string(),
            did: request.did.clone(),
            handle: request.handle.clone(),
            proof,
        };
        self.engine.insert(row).await.map_err(classify)
    }

    /// Look up the registration for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the engine fails or the stored proof
    /// cannot be read back.
    pub async fn get_handle_registration(
        &self, handle: &str,
    ) -> Result<Option<RegistrationRequest>, StoreError> {
        let Some(row) = self.engine.find_by_handle(handle).await.map_err(classify)? else {
            return Ok(None);
        };
        let request = serde_json::from_str(&row.proof).map_err(|e| {
            StoreError::Storage(anyhow::anyhow!("issue deserializing proof for {}: {e}", row.id))
        })?;
        Ok(Some(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, handle: &str, did: &str) -> RegistrationRequest {
        RegistrationRequest {
            id: id.into(),
            handle: handle.into(),
            did: did.into(),
            domain: "didpay.me".into(),
            signature: "e30..c2ln".into(),
        }
    }

    #[test]
    fn classify_constraints() {
        let violation = |c: &str| EngineError::UniqueViolation {
            constraint: c.to_string(),
        };
        assert!(matches!(classify(violation(DID_CONSTRAINT)), StoreError::DidConflict));
        assert!(matches!(classify(violation(HANDLE_CONSTRAINT)), StoreError::HandleConflict));
        assert!(matches!(classify(violation(PKEY_CONSTRAINT)), StoreError::Storage(_)));
        assert!(matches!(
            classify(EngineError::Engine(anyhow::anyhow!("disk full"))),
            StoreError::Storage(_)
        ));
    }

    #[tokio::test]
    async fn dupe_did() {
        let table = MemoryTable::new();
        let registry = Registry::new(&table);

        registry.create(&request("reg_1", "alice", "did:example:123")).await.expect("should create");
        let err = registry
            .create(&request("reg_2", "bob", "did:example:123"))
            .await
            .expect_err("should conflict");
        assert!(matches!(err, StoreError::DidConflict));
        assert_eq!(err.to_string(), "DID already registered");
    }

    #[tokio::test]
    async fn dupe_handle() {
        let table = MemoryTable::new();
        let registry = Registry::new(&table);

        registry.create(&request("reg_1", "alice", "did:example:123")).await.expect("should create");
        let err = registry
            .create(&request("reg_2", "alice", "did:example:456"))
            .await
            .expect_err("should conflict");
        assert!(matches!(err, StoreError::HandleConflict));
        assert_eq!(err.to_string(), "Handle already registered");
    }

    #[tokio::test]
    async fn handles_are_case_sensitive() {
        let table = MemoryTable::new();
        let registry = Registry::new(&table);

        registry.create(&request("reg_1", "alice", "did:example:1")).await.expect("should create");
        registry.create(&request("reg_2", "Alice", "did:example:2")).await.expect("should create");
        assert!(registry.get_handle_registration("ALICE").await.expect("should look up").is_none());
    }

    #[tokio::test]
    async fn round_trip() {
        let table = MemoryTable::new();
        let registry = Registry::new(&table);
        let submitted = request("reg_1", "alice", "did:example:123");

        registry.create(&submitted).await.expect("should create");
        let found = registry.get_handle_registration("alice").await.expect("should look up");
        assert_eq!(found, Some(submitted));
        assert!(registry.get_handle_registration("bob").await.expect("should look up").is_none());
    }

    #[tokio::test]
    async fn unreadable_proof() {
        let table = MemoryTable::new();
        table
            .insert(DapRow {
                id: "reg_1".into(),
                did: "did:example:123".into(),
                handle: "alice".into(),
                proof: "not json".into(),
            })
            .await
            .expect("should insert");

        let err = Registry::new(&table)
            .get_handle_registration("alice")
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
