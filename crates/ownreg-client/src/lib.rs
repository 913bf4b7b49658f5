//! Client side of the owner registry.
//!
//! An [`OwnerStateStore`] keeps a cached copy of the collection and patches
//! it after each mutation instead of re-fetching. It talks to the registry
//! through an [`OwnerTransport`]: [`HttpTransport`] for a remote server or
//! [`LocalTransport`] for an in-process service. Paging over the cache is a
//! pure derivation in [`pagination`].

pub mod config;
pub mod error;
pub mod notify;
pub mod pagination;
pub mod state;
pub mod store;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use notify::{ChannelNotifier, Level, Notification, Notifier, TracingNotifier};
pub use pagination::{paginate, Page, PageSizeError, Paginator, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use state::{OwnerState, StateEvent};
pub use store::OwnerStateStore;
pub use transport::{HttpTransport, LocalTransport, OwnerTransport};
