use ownreg_types::{NewOwner, Owner, OwnerId, OwnerPatch};

use crate::error::StoreResult;
use crate::filter::OwnerFilter;

/// Keyed storage for owner records.
///
/// All implementations must satisfy these invariants:
/// - HN, phone and email are each unique across records. A write that would
///   break this fails with `StoreError::UniqueViolation` and changes nothing.
/// - Identifiers are assigned on insert and never change.
/// - `find_all` returns records in insertion order.
/// - Deletion is a hard delete; no tombstone remains.
pub trait OwnerStore: Send + Sync {
    /// Every record, in insertion order.
    fn find_all(&self) -> StoreResult<Vec<Owner>>;

    /// The first record matching `filter`, or `Ok(None)`.
    fn find_one(&self, filter: &OwnerFilter) -> StoreResult<Option<Owner>>;

    /// Insert a record, assigning its id and timestamps.
    fn insert(&self, fields: NewOwner) -> StoreResult<Owner>;

    /// Merge `patch` onto the record with `id` and return the result.
    ///
    /// Returns `Ok(None)` if no record has this id.
    fn update_by_id(&self, id: &OwnerId, patch: &OwnerPatch) -> StoreResult<Option<Owner>>;

    /// Delete a record by id. Returns `true` if the record existed.
    fn delete_by_id(&self, id: &OwnerId) -> StoreResult<bool>;

    /// Look up a record by id.
    fn find_by_id(&self, id: &OwnerId) -> StoreResult<Option<Owner>> {
        self.find_one(&OwnerFilter::by_id(*id))
    }

    /// Number of stored records.
    ///
    /// Default implementation counts `find_all()`. Backends may override.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.find_all()?.len())
    }
}
