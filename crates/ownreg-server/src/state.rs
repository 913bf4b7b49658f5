use std::sync::Arc;

use ownreg_service::{OwnerReader, OwnerService};
use ownreg_store::OwnerStore;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<OwnerService>,
    pub reader: OwnerReader,
}

impl AppState {
    pub fn new(service: Arc<OwnerService>) -> Self {
        let reader = service.reader();
        Self { service, reader }
    }

    pub fn from_store(store: Arc<dyn OwnerStore>) -> Self {
        Self::new(Arc::new(OwnerService::new(store)))
    }
}
