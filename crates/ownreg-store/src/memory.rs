use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use ownreg_types::{NewOwner, Owner, OwnerId, OwnerPatch, UniqueField};

use crate::error::{StoreError, StoreResult};
use crate::filter::OwnerFilter;
use crate::traits::OwnerStore;

/// Records in insertion order plus one unique index per constrained field.
///
/// Every mutating method checks the indexes first and leaves the table
/// untouched when it returns an error.
#[derive(Clone, Debug, Default)]
pub(crate) struct OwnerTable {
    records: Vec<Owner>,
    hn: HashMap<String, OwnerId>,
    phone: HashMap<String, OwnerId>,
    email: HashMap<String, OwnerId>,
}

impl OwnerTable {
    /// Rebuild a table from persisted records, rejecting duplicates.
    pub(crate) fn from_records(records: Vec<Owner>) -> StoreResult<Self> {
        let mut table = Self::default();
        for owner in records {
            if table.position(&owner.id).is_some() {
                return Err(StoreError::Corrupt(format!("duplicate id {}", owner.id)));
            }
            let id = owner.id;
            table
                .insert(owner)
                .map_err(|e| StoreError::Corrupt(format!("record {id}: {e}")))?;
        }
        Ok(table)
    }

    pub(crate) fn records(&self) -> &[Owner] {
        &self.records
    }

    fn index(&self, field: UniqueField) -> &HashMap<String, OwnerId> {
        match field {
            UniqueField::Hn => &self.hn,
            UniqueField::Phone => &self.phone,
            UniqueField::Email => &self.email,
        }
    }

    fn index_mut(&mut self, field: UniqueField) -> &mut HashMap<String, OwnerId> {
        match field {
            UniqueField::Hn => &mut self.hn,
            UniqueField::Phone => &mut self.phone,
            UniqueField::Email => &mut self.email,
        }
    }

    fn position(&self, id: &OwnerId) -> Option<usize> {
        self.records.iter().position(|o| &o.id == id)
    }

    fn get(&self, id: &OwnerId) -> Option<&Owner> {
        self.position(id).map(|pos| &self.records[pos])
    }

    /// Unique fields on which `candidate` collides with a record other than
    /// `candidate.id`.
    fn violations(&self, candidate: &Owner) -> Vec<UniqueField> {
        UniqueField::ALL
            .into_iter()
            .filter(|field| {
                self.index(*field)
                    .get(candidate.unique_value(*field))
                    .is_some_and(|holder| *holder != candidate.id)
            })
            .collect()
    }

    pub(crate) fn find_one(&self, filter: &OwnerFilter) -> Option<&Owner> {
        if let Some(id) = filter.id() {
            return self.get(&id).filter(|owner| filter.matches(owner));
        }
        filter.criteria().iter().find_map(|(field, value)| {
            self.index(*field)
                .get(value)
                .and_then(|id| self.get(id))
                .filter(|owner| filter.matches(owner))
        })
    }

    pub(crate) fn insert(&mut self, owner: Owner) -> StoreResult<()> {
        let fields = self.violations(&owner);
        if !fields.is_empty() {
            return Err(StoreError::UniqueViolation { fields });
        }
        for field in UniqueField::ALL {
            let value = owner.unique_value(field).to_string();
            self.index_mut(field).insert(value, owner.id);
        }
        self.records.push(owner);
        Ok(())
    }

    pub(crate) fn update(&mut self, id: &OwnerId, patch: &OwnerPatch) -> StoreResult<Option<Owner>> {
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };
        let mut next = self.records[pos].clone();
        next.apply_patch(patch, Utc::now());

        let fields = self.violations(&next);
        if !fields.is_empty() {
            return Err(StoreError::UniqueViolation { fields });
        }

        for field in UniqueField::ALL {
            let old = self.records[pos].unique_value(field).to_string();
            let new = next.unique_value(field).to_string();
            if old != new {
                let index = self.index_mut(field);
                index.remove(&old);
                index.insert(new, *id);
            }
        }
        self.records[pos] = next.clone();
        Ok(Some(next))
    }

    pub(crate) fn remove(&mut self, id: &OwnerId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let owner = self.records.remove(pos);
        for field in UniqueField::ALL {
            self.index_mut(field).remove(owner.unique_value(field));
        }
        true
    }
}

/// In-memory owner store.
///
/// Intended for tests and single-process deployments. Records and indexes
/// live behind one `RwLock`, so every check-then-write runs under the write
/// lock and two writers can never both claim the same unique value.
pub struct InMemoryOwnerStore {
    table: RwLock<OwnerTable>,
}

impl InMemoryOwnerStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OwnerTable::default()),
        }
    }

    /// Create a store pre-populated with records.
    pub fn with_records(records: Vec<Owner>) -> StoreResult<Self> {
        Ok(Self {
            table: RwLock::new(OwnerTable::from_records(records)?),
        })
    }
}

impl Default for InMemoryOwnerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerStore for InMemoryOwnerStore {
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
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        table.insert(owner.clone())?;
        Ok(owner)
    }

    fn update_by_id(&self, id: &OwnerId, patch: &OwnerPatch) -> StoreResult<Option<Owner>> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        table.update(id, patch)
    }

    fn delete_by_id(&self, id: &OwnerId) -> StoreResult<bool> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.remove(id))
    }

    fn count(&self) -> StoreResult<usize> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.records().len())
    }
}

impl std::fmt::Debug for InMemoryOwnerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOwnerStore")
            .field("record_count", &self.count().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(hn: &str, phone: &str, email: &str) -> NewOwner {
        NewOwner {
            hn: hn.into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    fn assert_pairwise_distinct(records: &[Owner]) {
        for (i, a) in records.iter().enumerate() {
            for b in &records[i + 1..] {
                assert_ne!(a.hn, b.hn);
                assert_ne!(a.phone, b.phone);
                assert_ne!(a.email, b.email);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_find_by_id() {
        let store = InMemoryOwnerStore::new();
        let owner = store.insert(fields("H1", "111", "a@x.com")).unwrap();
        assert_eq!(owner.created_at, owner.updated_at);

        let found = store.find_by_id(&owner.id).unwrap().expect("should exist");
        assert_eq!(found, owner);
    }

    #[test]
    fn find_all_keeps_insertion_order() {
        let store = InMemoryOwnerStore::new();
        let a = store.insert(fields("H1", "111", "a@x.com")).unwrap();
        let b = store.insert(fields("H2", "222", "b@x.com")).unwrap();
        let c = store.insert(fields("H3", "333", "c@x.com")).unwrap();
        store.delete_by_id(&b.id).unwrap();

        let ids: Vec<OwnerId> = store.find_all().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn find_one_or_across_fields() {
        let store = InMemoryOwnerStore::new();
        let owner = store.insert(fields("H1", "111", "a@x.com")).unwrap();

        let filter = OwnerFilter::new()
            .or_eq(UniqueField::Hn, "nope")
            .or_eq(UniqueField::Phone, "111");
        assert_eq!(store.find_one(&filter).unwrap().map(|o| o.id), Some(owner.id));

        let excluded = filter.excluding(owner.id);
        assert!(store.find_one(&excluded).unwrap().is_none());
    }

    #[test]
    fn update_merges_patch() {
        let store = InMemoryOwnerStore::new();
        let owner = store.insert(fields("H1", "111", "a@x.com")).unwrap();
        let updated = store
            .update_by_id(&owner.id, &OwnerPatch::new().with_phone("222"))
            .unwrap()
            .expect("should exist");
        assert_eq!(updated.phone, "222");
        assert_eq!(updated.hn, "H1");
        assert!(updated.updated_at >= owner.updated_at);

        // The old phone is free again.
        store.insert(fields("H2", "111", "b@x.com")).unwrap();
    }

    #[test]
    fn update_missing_returns_none() {
        let store = InMemoryOwnerStore::new();
        let result = store
            .update_by_id(&OwnerId::new(), &OwnerPatch::new().with_phone("1"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_present_and_missing() {
        let store = InMemoryOwnerStore::new();
        let owner = store.insert(fields("H1", "111", "a@x.com")).unwrap();
        assert!(store.delete_by_id(&owner.id).unwrap());
        assert!(!store.delete_by_id(&owner.id).unwrap());
        assert_eq!(store.count().unwrap(), 0);

        // All unique values are released.
        store.insert(fields("H1", "111", "a@x.com")).unwrap();
    }

    // -----------------------------------------------------------------------
    // Uniqueness constraints
    // -----------------------------------------------------------------------

    #[test]
    fn insert_rejects_each_duplicate_field() {
        let store = InMemoryOwnerStore::new();
        store.insert(fields("H1", "111", "a@x.com")).unwrap();

        for (dup, field) in [
            (fields("H1", "999", "z@x.com"), UniqueField::Hn),
            (fields("H9", "111", "z@x.com"), UniqueField::Phone),
            (fields("H9", "999", "a@x.com"), UniqueField::Email),
        ] {
            match store.insert(dup) {
                Err(StoreError::UniqueViolation { fields }) => assert_eq!(fields, vec![field]),
                other => panic!("expected unique violation, got {other:?}"),
            }
        }
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn update_may_keep_its_own_values() {
        let store = InMemoryOwnerStore::new();
        let owner = store.insert(fields("H1", "111", "a@x.com")).unwrap();
        let patch = OwnerPatch::new()
            .with_hn("H1")
            .with_phone("111")
            .with_email("a@x.com")
            .with_first_name("Z");
        let updated = store.update_by_id(&owner.id, &patch).unwrap().unwrap();
        assert_eq!(updated.first_name, "Z");
    }

    #[test]
    fn update_rejects_taking_another_records_value() {
        let store = InMemoryOwnerStore::new();
        store.insert(fields("H1", "111", "a@x.com")).unwrap();
        let second = store.insert(fields("H2", "222", "b@x.com")).unwrap();

        let patch = OwnerPatch::new().with_email("a@x.com").with_first_name("Z");
        let err = store.update_by_id(&second.id, &patch).unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { ref fields } if fields == &[UniqueField::Email]));

        let unchanged = store.find_by_id(&second.id).unwrap().unwrap();
        assert_eq!(unchanged, second);
    }

    #[test]
    fn concurrent_duplicate_inserts_admit_one() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryOwnerStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .insert(fields(&format!("H{i}"), &format!("{i}"), "same@x.com"))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn with_records_rejects_duplicates() {
        let a = Owner::from_new(OwnerId::new(), fields("H1", "1", "a@x.com"), Utc::now());
        let b = Owner::from_new(OwnerId::new(), fields("H2", "1", "b@x.com"), Utc::now());
        let err = InMemoryOwnerStore::with_records(vec![a, b]).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn debug_reports_record_count() {
        let store = InMemoryOwnerStore::default();
        store.insert(fields("H1", "111", "a@x.com")).unwrap();
        assert_eq!(format!("{store:?}"), "InMemoryOwnerStore { record_count: Some(1) }");
    }

    #[test]
    fn poisoned_lock_is_reported_not_hidden() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryOwnerStore::new());
        let holder = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = holder.table.write().unwrap();
            panic!("writer died");
        })
        .join();

        assert!(matches!(store.count(), Err(StoreError::LockPoisoned)));
        assert!(matches!(store.find_all(), Err(StoreError::LockPoisoned)));
        assert!(format!("{store:?}").contains("None"));
    }

    proptest! {
        #[test]
        fn unique_fields_stay_pairwise_distinct(
            ops in prop::collection::vec((0u8..3, 0u8..6, 0u8..6, 0u8..6), 1..40)
        ) {
            let store = InMemoryOwnerStore::new();
            for (op, hn, phone, email) in ops {
                let existing = store.find_all().unwrap();
                match op {
                    0 => {
                        let _ = store.insert(fields(
                            &format!("H{hn}"),
                            &format!("{phone}"),
                            &format!("{email}@x.com"),
                        ));
                    }
                    1 if !existing.is_empty() => {
                        let target = existing[hn as usize % existing.len()].id;
                        let patch = OwnerPatch::new()
                            .with_phone(format!("{phone}"))
                            .with_email(format!("{email}@x.com"));
                        let _ = store.update_by_id(&target, &patch);
                    }
                    2 if !existing.is_empty() => {
                        let target = existing[hn as usize % existing.len()].id;
                        store.delete_by_id(&target).unwrap();
                    }
                    _ => {}
                }
                assert_pairwise_distinct(&store.find_all().unwrap());
            }
        }
    }
}
