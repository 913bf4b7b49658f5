use std::sync::{Arc, Mutex, MutexGuard};

use ownreg_store::{OwnerFilter, OwnerStore};
use ownreg_types::{Owner, OwnerDraft, OwnerId, OwnerPatch};

use crate::error::{ServiceError, ServiceResult};
use crate::reader::OwnerReader;
use crate::validation::{validate_draft, validate_patch};

/// Business rules for creating, updating and deleting owners.
///
/// Check-then-write runs inside an exclusive write section, and the store's
/// own unique indexes reject anything that gets past the pre-check. The
/// pre-check exists to name the conflicting fields in the error.
pub struct OwnerService {
    store: Arc<dyn OwnerStore>,
    write_section: Mutex<()>,
}

impl OwnerService {
    pub fn new(store: Arc<dyn OwnerStore>) -> Self {
        Self {
            store,
            write_section: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn OwnerStore> {
        &self.store
    }

    /// Read side over the same store.
    pub fn reader(&self) -> OwnerReader {
        OwnerReader::new(Arc::clone(&self.store))
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, ()>> {
        self.write_section
            .lock()
            .map_err(|_| ServiceError::Transient("write section poisoned".into()))
    }

    /// Create an owner after validating required fields and uniqueness.
    pub fn create(&self, draft: OwnerDraft) -> ServiceResult<Owner> {
        let fields = validate_draft(draft).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected owner create");
        })?;

        let _guard = self.lock()?;
        let filter = OwnerFilter::any_unique_of(&fields);
        if let Some(existing) = self.store.find_one(&filter)? {
            let err = ServiceError::Conflict {
                fields: filter.matched_fields(&existing),
            };
            tracing::warn!(error = %err, hn = %fields.hn, "rejected owner create");
            return Err(err);
        }

        let owner = self.store.insert(fields)?;
        tracing::info!(id = %owner.id, hn = %owner.hn, "owner created");
        Ok(owner)
    }

    /// Merge `patch` onto an existing owner.
    ///
    /// Only the unique fields supplied in the patch are checked, and the
    /// record being edited is excluded from the check.
    pub fn update(&self, id: &OwnerId, patch: OwnerPatch) -> ServiceResult<Owner> {
        let _guard = self.lock()?;
        if self.store.find_by_id(id)?.is_none() {
            tracing::warn!(%id, "update of unknown owner");
            return Err(ServiceError::NotFound(*id));
        }
        validate_patch(&patch)?;

        let filter = OwnerFilter::conflicting_with_patch(*id, &patch);
        if filter.has_criteria() {
            if let Some(existing) = self.store.find_one(&filter)? {
                let err = ServiceError::Conflict {
                    fields: filter.matched_fields(&existing),
                };
                tracing::warn!(%id, error = %err, "rejected owner update");
                return Err(err);
            }
        }

        let owner = self
            .store
            .update_by_id(id, &patch)?
            .ok_or(ServiceError::NotFound(*id))?;
        tracing::info!(%id, "owner updated");
        Ok(owner)
    }

    /// Hard-delete an owner.
    pub fn delete(&self, id: &OwnerId) -> ServiceResult<()> {
        let _guard = self.lock()?;
        if self.store.find_by_id(id)?.is_none() {
            tracing::warn!(%id, "delete of unknown owner");
            return Err(ServiceError::NotFound(*id));
        }
        if !self.store.delete_by_id(id)? {
            return Err(ServiceError::NotFound(*id));
        }
        tracing::info!(%id, "owner deleted");
        Ok(())
    }
}

impl std::fmt::Debug for OwnerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerService").finish_non_exhaustive()
    }
}
