use ownreg_types::{OwnerId, OwnerProjection};

/// Client-side snapshot of the registry.
///
/// `records` is a disposable copy of the server's collection: replaced
/// wholesale by a fetch and patched by identifier after each mutation.
/// `version` increases whenever `records` changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerState {
    pub records: Vec<OwnerProjection>,
    pub loading: bool,
    pub error: Option<String>,
    pub version: u64,
    in_flight: usize,
}

/// Everything that can happen to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateEvent {
    /// A remote call was issued.
    Started,
    /// A fetch succeeded.
    Fetched(Vec<OwnerProjection>),
    /// A create succeeded.
    Created(OwnerProjection),
    /// An update succeeded.
    Updated(OwnerProjection),
    /// A delete succeeded.
    Deleted(OwnerId),
    /// A remote call failed with this display message.
    Failed(String),
}

impl OwnerState {
    /// Calls issued but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn position(&self, id: &OwnerId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// The single place where the cache changes.
    ///
    /// Responses are applied in arrival order, so for overlapping calls on
    /// the same record the last response wins.
    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::Started => {
                self.in_flight += 1;
                self.loading = true;
                return;
            }
            StateEvent::Fetched(records) => {
                self.records = records;
                self.error = None;
                self.version += 1;
            }
            StateEvent::Created(record) => {
                match self.position(&record.id) {
                    Some(pos) => self.records[pos] = record,
                    None => self.records.push(record),
                }
                self.error = None;
                self.version += 1;
            }
            StateEvent::Updated(record) => {
                // A record deleted in the meantime stays deleted.
                if let Some(pos) = self.position(&record.id) {
                    self.records[pos] = record;
                    self.version += 1;
                }
                self.error = None;
            }
            StateEvent::Deleted(id) => {
                if let Some(pos) = self.position(&id) {
                    self.records.remove(pos);
                    self.version += 1;
                }
                self.error = None;
            }
            StateEvent::Failed(message) => {
                self.error = Some(message);
            }
        }
        self.settle();
    }
}
