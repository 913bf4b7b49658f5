use std::sync::Arc;

use ownreg_store::OwnerStore;
use ownreg_types::OwnerProjection;

use crate::error::ServiceResult;

/// Read side of the registry: the whole collection in its public shape.
///
/// No filtering, sorting or paging happens here; clients page locally.
#[derive(Clone)]
pub struct OwnerReader {
    store: Arc<dyn OwnerStore>,
}

impl OwnerReader {
    pub fn new(store: Arc<dyn OwnerStore>) -> Self {
        Self { store }
    }

    /// Every owner, in store order, without timestamps.
    pub fn list(&self) -> ServiceResult<Vec<OwnerProjection>> {
        let owners = self.store.find_all()?;
        tracing::debug!(count = owners.len(), "listed owners");
        Ok(owners.iter().map(OwnerProjection::from).collect())
    }
}

impl std::fmt::Debug for OwnerReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerReader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownreg_store::InMemoryOwnerStore;
    use ownreg_types::NewOwner;

    #[test]
    fn list_projects_in_store_order() {
        let store = Arc::new(InMemoryOwnerStore::new());
        let reader = OwnerReader::new(store.clone());
        assert!(reader.list().unwrap().is_empty());

        let mut ids = Vec::new();
        for i in 0..3 {
            let owner = store
                .insert(NewOwner {
                    hn: format!("H{i}"),
                    first_name: "A".into(),
                    last_name: "B".into(),
                    phone: format!("{i}"),
                    email: format!("{i}@x.com"),
                })
                .unwrap();
            ids.push(owner.id);
        }

        let listed = reader.list().unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
        assert_eq!(listed[1].hn, "H1");
    }
}
