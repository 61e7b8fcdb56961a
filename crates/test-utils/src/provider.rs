//! # Test Provider

use std::sync::Arc;

use anyhow::{Result, anyhow};
use dap_registry::did::Document;
use dap_registry::store::{DapRow, EngineError, MemoryTable};
use dap_registry::{BearerDid, Datastore, IdentityResolver, OPERATOR_SECRET, SecretStore};
use dashmap::DashMap;

/// A provider holding published DID documents, secrets and registrations in
/// memory. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct Provider {
    documents: Arc<DashMap<String, Document>>,
    secrets: Arc<DashMap<String, String>>,
    table: MemoryTable,
}

impl Provider {
    /// Create an empty provider with no operator secret.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider whose operator secret is `operator`'s portable DID.
    ///
    /// # Errors
    ///
    /// Returns an error if the portable DID cannot be serialized.
    pub fn with_operator(operator: &BearerDid) -> Result<Self> {
        let provider = Self::new();
        provider.set_operator(operator)?;
        Ok(provider)
    }

    /// Replace the operator secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the portable DID cannot be serialized.
    pub fn set_operator(&self, operator: &BearerDid) -> Result<()> {
        let secret = serde_json::to_string(&operator.to_portable())?;
        self.secrets.insert(OPERATOR_SECRET.to_string(), secret);
        self.publish(operator.document.clone());
        Ok(())
    }

    /// Set a raw secret value.
    pub fn set_secret(&self, name: &str, value: &str) {
        self.secrets.insert(name.to_string(), value.to_string());
    }

    /// Make `document` resolvable by its ID.
    pub fn publish(&self, document: Document) {
        self.documents.insert(document.id.clone(), document);
    }

    /// The underlying registration table.
    #[must_use]
    pub const fn table(&self) -> &MemoryTable {
        &self.table
    }
}

impl IdentityResolver for Provider {
    async fn resolve(&self, did: &str) -> Result<Document> {
        self.documents
            .get(did)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| anyhow!("DID not found: {did}"))
    }
}

impl SecretStore for Provider {
    async fn secret(&self, name: &str) -> Result<Option<String>> {
        Ok(self.secrets.get(name).map(|s| s.value().clone()))
    }
}

impl Datastore for Provider {
    async fn insert(&self, row: DapRow) -> Result<(), EngineError> {
        self.table.insert(row).await
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<DapRow>, EngineError> {
        self.table.find_by_handle(handle).await
    }
}
