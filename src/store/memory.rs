//! In-process storage engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use super::{DID_CONSTRAINT, DapRow, EngineError, HANDLE_CONSTRAINT, PKEY_CONSTRAINT};
use crate::Datastore;

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, DapRow>,
    dids: HashMap<String, String>,
    handles: HashMap<String, String>,
}

/// A registration table held in memory. Clones share the same table.
///
/// All three unique indexes are checked and written under one lock, so
/// concurrent inserts of the same DID or handle see exactly one winner.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn violation(constraint: &str) -> EngineError {
    EngineError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

impl Datastore for MemoryTable {
    async fn insert(&self, row: DapRow) -> Result<(), EngineError> {
        let mut tables = self.tables.lock().map_err(|_| anyhow!("registry table lock poisoned"))?;

        if tables.dids.contains_key(&row.did) {
            return Err(violation(DID_CONSTRAINT));
        }
        if tables.handles.contains_key(&row.handle) {
            return Err(violation(HANDLE_CONSTRAINT));
        }
        if tables.rows.contains_key(&row.id) {
            return Err(violation(PKEY_CONSTRAINT));
        }

        tables.dids.insert(row.did.clone(), row.id.clone());
        tables.handles.insert(row.handle.clone(), row.id.clone());
        tables.rows.insert(row.id.clone(), row);
        Ok(())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<DapRow>, EngineError> {
        let tables = self.tables.lock().map_err(|_| anyhow!("registry table lock poisoned"))?;
        Ok(tables.handles.get(handle).and_then(|id| tables.rows.get(id)).cloned())
    }
}
