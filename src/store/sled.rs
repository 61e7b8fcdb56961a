//! Durable storage engine backed by `sled`.
//!
//! Rows live in the `daps` tree keyed by ID. The `dids` and `handles` trees
//! index each unique column back to the row ID. An insert is a single
//! transaction across all three trees.

use std::path::Path;

use ::sled::transaction::{ConflictableTransactionError, TransactionError};
use ::sled::{Db, Transactional, Tree};
use anyhow::anyhow;

use super::{DID_CONSTRAINT, DapRow, EngineError, HANDLE_CONSTRAINT, PKEY_CONSTRAINT};
use crate::Datastore;

/// A registration table persisted with `sled`.
#[derive(Clone, Debug)]
pub struct SledTable {
    db: Db,
    daps: Tree,
    dids: Tree,
    handles: Tree,
}

impl SledTable {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::from_db(::sled::open(path)?)
    }

    /// Open a throwaway database that is removed when dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn temporary() -> anyhow::Result<Self> {
        Self::from_db(::sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> anyhow::Result<Self> {
        Ok(Self {
            daps: db.open_tree("daps")?,
            dids: db.open_tree("dids")?,
            handles: db.open_tree("handles")?,
            db,
        })
    }

    /// Flush pending writes to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> anyhow::Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl Datastore for SledTable {
    async fn insert(&self, row: DapRow) -> Result<(), EngineError> {
        let value = serde_json::to_vec(&row).map_err(|e| anyhow!("issue serializing row: {e}"))?;

        let result = (&self.daps, &self.dids, &self.handles).transaction(|(daps, dids, handles)| {
            if dids.get(row.did.as_bytes())?.is_some() {
                return Err(ConflictableTransactionError::Abort(DID_CONSTRAINT));
            }
            if handles.get(row.handle.as_bytes())?.is_some() {
                return Err(ConflictableTransactionError::Abort(HANDLE_CONSTRAINT));
            }
            if daps.get(row.id.as_bytes())?.is_some() {
                return Err(ConflictableTransactionError::Abort(PKEY_CONSTRAINT));
            }

            daps.insert(row.id.as_bytes(), value.as_slice())?;
            dids.insert(row.did.as_bytes(), row.id.as_bytes())?;
            handles.insert(row.handle.as_bytes(), row.id.as_bytes())?;
            Ok(())
        });

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(constraint)) => Err(EngineError::UniqueViolation {
                constraint: constraint.to_string(),
            }),
            Err(TransactionError::Storage(e)) => Err(anyhow!("sled transaction failed: {e}").into()),
        }
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<DapRow>, EngineError> {
        let Some(id) = self.handles.get(handle.as_bytes()).map_err(|e| anyhow!(e))? else {
            return Ok(None);
        };
        let Some(value) = self.daps.get(&id).map_err(|e| anyhow!(e))? else {
            return Err(anyhow!("handle {handle} indexes a missing row").into());
        };
        let row = serde_json::from_slice(&value).map_err(|e| anyhow!("issue reading row: {e}"))?;
        Ok(Some(row))
    }
}
