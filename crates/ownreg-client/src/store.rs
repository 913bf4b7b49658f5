use std::sync::{Arc, PoisonError, RwLock};

use ownreg_types::{OwnerDraft, OwnerId, OwnerPatch};

use crate::error::ClientError;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::state::{OwnerState, StateEvent};
use crate::transport::OwnerTransport;

const FETCH_FAILED: &str = "Failed to fetch owners";
const CREATE_FAILED: &str = "Failed to create owner";
const UPDATE_FAILED: &str = "Failed to update owner";
const DELETE_FAILED: &str = "Failed to delete owner";

/// Shared client-side cache of the owner collection.
///
/// Overlapping calls are not serialized. Each response is applied as it
/// arrives, so per record the last response wins; the next `fetch_all`
/// restores full consistency with the server.
pub struct OwnerStateStore {
    transport: Arc<dyn OwnerTransport>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<OwnerState>,
}

impl OwnerStateStore {
    pub fn new(transport: Arc<dyn OwnerTransport>) -> Self {
        Self::with_notifier(transport, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(transport: Arc<dyn OwnerTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            state: RwLock::new(OwnerState::default()),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> OwnerState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply(&self, event: StateEvent) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(event);
    }

    fn fail(&self, err: ClientError, fallback: &str, notify: bool) -> bool {
        let message = err.server_message().unwrap_or(fallback).to_string();
        tracing::warn!(error = %err, "{fallback}");
        self.apply(StateEvent::Failed(message.clone()));
        if notify {
            self.notifier.notify(Notification::error(message));
        }
        false
    }

    /// Reload the whole collection. On failure the stale records stay.
    pub async fn fetch_all(&self) -> bool {
        self.apply(StateEvent::Started);
        match self.transport.list().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "owners fetched");
                self.apply(StateEvent::Fetched(records));
                true
            }
            Err(err) => self.fail(err, FETCH_FAILED, false),
        }
    }

    pub async fn create_one(&self, draft: OwnerDraft) -> bool {
        self.apply(StateEvent::Started);
        match self.transport.create(&draft).await {
            Ok(owner) => {
                tracing::debug!(id = %owner.id, "owner created");
                self.apply(StateEvent::Created(owner.projection()));
                self.notifier
                    .notify(Notification::success("Owner created successfully"));
                true
            }
            Err(err) => self.fail(err, CREATE_FAILED, true),
        }
    }

    pub async fn update_one(&self, id: &OwnerId, patch: OwnerPatch) -> bool {
        self.apply(StateEvent::Started);
        match self.transport.update(id, &patch).await {
            Ok(owner) => {
                tracing::debug!(id = %owner.id, "owner updated");
                self.apply(StateEvent::Updated(owner.projection()));
                self.notifier
                    .notify(Notification::success("Owner updated successfully"));
                true
            }
            Err(err) => self.fail(err, UPDATE_FAILED, true),
        }
    }

    pub async fn delete_one(&self, id: &OwnerId) -> bool {
        self.apply(StateEvent::Started);
        match self.transport.delete(id).await {
            Ok(()) => {
                tracing::debug!(%id, "owner deleted");
                self.apply(StateEvent::Deleted(*id));
                self.notifier
                    .notify(Notification::success("Owner deleted successfully"));
                true
            }
            Err(err) => self.fail(err, DELETE_FAILED, true),
        }
    }
}

impl std::fmt::Debug for OwnerStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("OwnerStateStore")
            .field("records", &state.records.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::{mpsc, oneshot};

    use ownreg_service::OwnerService;
    use ownreg_store::InMemoryOwnerStore;
    use ownreg_types::{NewOwner, Owner, OwnerProjection};

    use crate::error::ClientResult;
    use crate::notify::{ChannelNotifier, Level};
    use crate::transport::LocalTransport;

    fn owner_with(id: OwnerId, first_name: &str) -> Owner {
        let fields = NewOwner {
            hn: "H1".into(),
            first_name: first_name.into(),
            last_name: "B".into(),
            phone: "111".into(),
            email: "a@x.com".into(),
        };
        Owner::from_new(id, fields, Default::default())
    }

    fn local_store() -> (Arc<OwnerStateStore>, mpsc::UnboundedReceiver<Notification>) {
        let service = Arc::new(OwnerService::new(Arc::new(InMemoryOwnerStore::new())));
        let (notifier, rx) = ChannelNotifier::new();
        let store = OwnerStateStore::with_notifier(
            Arc::new(LocalTransport::new(service)),
            Arc::new(notifier),
        );
        (Arc::new(store), rx)
    }

    fn draft(hn: &str, phone: &str, email: &str) -> OwnerDraft {
        OwnerDraft::new(hn, "A", "B", phone, email)
    }

    #[tokio::test]
    async fn fetch_create_update_delete_reconcile_cache() {
        let (store, mut rx) = local_store();
        assert!(store.fetch_all().await);
        assert!(store.snapshot().records.is_empty());

        assert!(store.create_one(draft("H1", "111", "a@x.com")).await);
        assert!(store.create_one(draft("H2", "222", "b@x.com")).await);
        let state = store.snapshot();
        assert_eq!(state.records.len(), 2);
        assert_eq!(state.records[1].hn, "H2");
        assert!(!state.loading);
        assert_eq!(rx.try_recv().unwrap(), Notification::success("Owner created successfully"));

        let first = state.records[0].id;
        assert!(store.update_one(&first, OwnerPatch::new().with_phone("999")).await);
        let state = store.snapshot();
        assert_eq!(state.records[0].phone, "999");
        assert_eq!(state.records[0].id, first);

        assert!(store.delete_one(&first).await);
        let state = store.snapshot();
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].hn, "H2");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn conflict_sets_error_and_notifies() {
        let (store, mut rx) = local_store();
        assert!(store.create_one(draft("H1", "111", "a@x.com")).await);
        let _ = rx.try_recv();

        assert!(!store.create_one(draft("H2", "111", "b@x.com")).await);
        let state = store.snapshot();
        assert_eq!(state.records.len(), 1);
        assert!(!state.loading);
        let message = state.error.unwrap();
        assert!(message.starts_with("HN, phone or email already exists"));

        let note = rx.try_recv().unwrap();
        assert_eq!(note.level, Level::Error);
        assert_eq!(note.message, message);
    }

    #[tokio::test]
    async fn failed_delete_leaves_cache_unchanged() {
        let (store, _rx) = local_store();
        assert!(store.create_one(draft("H1", "111", "a@x.com")).await);
        let before = store.snapshot().records;

        assert!(!store.delete_one(&OwnerId::new()).await);
        let state = store.snapshot();
        assert_eq!(state.records, before);
        assert_eq!(state.error.as_deref(), Some("Owner not found"));

        // Any success clears the error.
        assert!(store.fetch_all().await);
        assert!(store.snapshot().error.is_none());
    }

    /// Transport whose calls fail with a transport error or block on gates.
    #[derive(Default)]
    struct ScriptedTransport {
        listing: Vec<OwnerProjection>,
        offline: bool,
        gates: Mutex<HashMap<String, oneshot::Receiver<Owner>>>,
    }

    impl ScriptedTransport {
        fn gate(&self, first_name: &str) -> oneshot::Sender<Owner> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(first_name.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl OwnerTransport for ScriptedTransport {
        async fn list(&self) -> ClientResult<Vec<OwnerProjection>> {
            if self.offline {
                return Err(ClientError::Transport("connection refused".into()));
            }
            Ok(self.listing.clone())
        }

        async fn create(&self, _draft: &OwnerDraft) -> ClientResult<Owner> {
            Err(ClientError::Transport("connection refused".into()))
        }

        async fn update(&self, _id: &OwnerId, patch: &OwnerPatch) -> ClientResult<Owner> {
            let key = patch.first_name.clone().unwrap_or_default();
            let gate = self.gates.lock().unwrap().remove(&key);
            match gate {
                Some(rx) => rx
                    .await
                    .map_err(|_| ClientError::Transport("gate dropped".into())),
                None => Err(ClientError::Transport("no gate".into())),
            }
        }

        async fn delete(&self, _id: &OwnerId) -> ClientResult<()> {
            Err(ClientError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback_message() {
        let owner = owner_with(OwnerId::new(), "A");
        let transport = ScriptedTransport {
            listing: vec![owner.projection()],
            ..Default::default()
        };
        let store = OwnerStateStore::new(Arc::new(transport));
        assert!(store.fetch_all().await);

        assert!(!store.create_one(draft("H2", "222", "b@x.com")).await);
        assert_eq!(store.snapshot().error.as_deref(), Some("Failed to create owner"));
        assert!(!store.delete_one(&owner.id).await);
        assert_eq!(store.snapshot().error.as_deref(), Some("Failed to delete owner"));
        assert_eq!(store.snapshot().records.len(), 1);

        let offline = OwnerStateStore::new(Arc::new(ScriptedTransport {
            offline: true,
            ..Default::default()
        }));
        assert!(!offline.fetch_all().await);
        let state = offline.snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to fetch owners"));
        assert!(!state.loading);
    }

    async fn wait_for(store: &OwnerStateStore, pred: impl Fn(&OwnerState) -> bool) {
        while !pred(&store.snapshot()) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn overlapping_updates_last_response_wins() {
        let id = OwnerId::new();
        let transport = Arc::new(ScriptedTransport {
            listing: vec![owner_with(id, "Orig").projection()],
            ..Default::default()
        });
        let release_a = transport.gate("A");
        let release_b = transport.gate("B");

        let store = Arc::new(OwnerStateStore::new(transport));
        assert!(store.fetch_all().await);

        let first = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .update_one(&id, OwnerPatch::new().with_first_name("A"))
                    .await
            })
        };
        let second = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .update_one(&id, OwnerPatch::new().with_first_name("B"))
                    .await
            })
        };
        wait_for(&store, |s| s.in_flight() == 2).await;

        // Issued second, answered first.
        release_b.send(owner_with(id, "B")).unwrap();
        assert!(second.await.unwrap());
        let state = store.snapshot();
        assert_eq!(state.records[0].first_name, "B");
        assert!(state.loading);

        release_a.send(owner_with(id, "A")).unwrap();
        assert!(first.await.unwrap());
        let state = store.snapshot();
        assert_eq!(state.records[0].first_name, "A");
        assert_eq!(state.records.len(), 1);
        assert!(!state.loading);
    }
}
