//! HTTP server for the owner registry.
//!
//! Exposes the read API and the mutation service as JSON endpoints under
//! `/api/owners`, mapping the service error taxonomy onto status codes:
//! validation and duplicate failures are 400, unknown ids 404, storage
//! failures 500.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::ApiError;
pub use router::build_router;
pub use server::{open_store, OwnerServer};
pub use state::AppState;
