//! The server's [`Provider`](dap_registry::Provider): HTTP `did:web`
//! resolution, environment-backed secrets, and a `sled` or in-memory table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dap_registry::did::Document;
use dap_registry::store::{DapRow, EngineError, MemoryTable, SledTable};
use dap_registry::{Datastore, IdentityResolver, SecretStore};
use tracing::{info, warn};

use crate::config::ServeArgs;
use crate::resolver::HttpResolver;

#[derive(Clone, Debug)]
enum Table {
    Memory(MemoryTable),
    Sled(SledTable),
}

#[derive(Clone, Debug)]
pub struct AppProvider {
    resolver: HttpResolver,
    table: Table,
}

impl AppProvider {
    pub fn new(args: &ServeArgs) -> Result<Self> {
        let table = match &args.db_path {
            Some(path) => {
                info!("opening registry database at {}", path.display());
                Table::Sled(
                    SledTable::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?,
                )
            }
            None => {
                warn!("DAP_DB_PATH not set: registrations are held in memory only");
                Table::Memory(MemoryTable::new())
            }
        };
        Ok(Self {
            resolver: HttpResolver::new(args.resolve_timeout())?,
            table,
        })
    }
}

impl IdentityResolver for AppProvider {
    async fn resolve(&self, did: &str) -> Result<Document> {
        self.resolver.resolve(did).await
    }
}

/// Secrets are read from the environment on every call: `NAME` (upper-cased)
/// holds the value inline, or `NAME_FILE` names a file holding it.
impl SecretStore for AppProvider {
    async fn secret(&self, name: &str) -> Result<Option<String>> {
        let var = name.to_uppercase();
        if let Ok(value) = std::env::var(&var) {
            return Ok(Some(value));
        }
        let Ok(path) = std::env::var(format!("{var}_FILE")) else {
            return Ok(None);
        };
        let path = PathBuf::from(path);
        let value = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(value))
    }
}

impl Datastore for AppProvider {
    async fn insert(&self, row: DapRow) -> Result<(), EngineError> {
        match &self.table {
            Table::Memory(table) => table.insert(row).await,
            Table::Sled(table) => table.insert(row).await,
        }
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<DapRow>, EngineError> {
        match &self.table {
            Table::Memory(table) => table.find_by_handle(handle).await,
            Table::Sled(table) => table.find_by_handle(handle).await,
        }
    }
}
