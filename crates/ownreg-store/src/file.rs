//! JSON-file-backed owner store.
//!
//! [`JsonFileOwnerStore`] keeps the working set in memory and rewrites one
//! JSON document (an array with one entry per owner) after every successful
//! mutation. The write goes to a temporary file in the same directory and is
//! renamed over the target, so a crash never leaves a half-written document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use ownreg_types::{NewOwner, Owner, OwnerId, OwnerPatch};
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::filter::OwnerFilter;
use crate::memory::OwnerTable;
use crate::traits::OwnerStore;

/// Durable owner store persisted as a single JSON document.
///
/// Mutations are applied to a copy of the table, persisted, and only then
/// published. A failed write therefore leaves both memory and disk at the
/// previous state.
#[derive(Debug)]
pub struct JsonFileOwnerStore {
    path: PathBuf,
    table: RwLock<OwnerTable>,
}

impl JsonFileOwnerStore {
    /// Open the store at `path`, creating an empty document if none exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let table = if path.exists() {
            let bytes = fs::read(&path)?;
            let records: Vec<Owner> = if bytes.iter().all(u8::is_ascii_whitespace) {
                Vec::new()
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?
            };
            OwnerTable::from_records(records)?
        } else {
            let table = OwnerTable::default();
            persist(&path, &table)?;
            table
        };
        tracing::debug!(path = %path.display(), records = table.records().len(), "opened owner store");
        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the table, persist it, then publish it.
    ///
    /// `mutate` returns `None` when it changed nothing; the document is then
    /// left alone.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut OwnerTable) -> StoreResult<Option<T>>,
    ) -> StoreResult<Option<T>> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = table.clone();
        let Some(out) = mutate(&mut next)? else {
            return Ok(None);
        };
        persist(&self.path, &next)?;
        *table = next;
        Ok(Some(out))
    }
}

fn persist(path: &Path, table: &OwnerTable) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let json = serde_json::to_vec_pretty(table.records())
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

impl OwnerStore for JsonFileOwnerStore {
    fn find_all(&self) -> StoreResult<Vec<Owner>> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.records().to_vec())
    }

    fn find_one(&self, filter: &OwnerFilter) -> StoreResult<Option<Owner>> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.find_one(filter).cloned())
    }

    fn insert(&self, fields: NewOwner) -> StoreResult<Owner> {
        let owner = Owner::from_new(OwnerId::new(), fields, Utc::now());
        self.commit(|table| table.insert(owner.clone()).map(Some))?;
        Ok(owner)
    }

    fn update_by_id(&self, id: &OwnerId, patch: &OwnerPatch) -> StoreResult<Option<Owner>> {
        self.commit(|table| table.update(id, patch))
    }

    fn delete_by_id(&self, id: &OwnerId) -> StoreResult<bool> {
        let removed = self.commit(|table| Ok(table.remove(id).then_some(())))?;
        Ok(removed.is_some())
    }

    fn count(&self) -> StoreResult<usize> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.records().len())
    }
}
