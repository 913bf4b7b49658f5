//! Wire contract for the owner registry.
//!
//! Every HTTP response body is an [`ApiResponse`] envelope:
//! `{ success, data?, message?, code? }`. Success bodies carry `data` (or a
//! `message` for deletes); failure bodies carry a human-readable `message`
//! and an [`ErrorCode`] so clients can tell a duplicate from a missing field
//! even though both arrive as 400.

pub mod endpoint;
pub mod envelope;

pub use endpoint::{endpoints, owner_path, HealthResponse};
pub use envelope::{ApiResponse, ErrorCode, DELETED_MESSAGE};

// Payload types travel with the contract.
pub use ownreg_types::{Owner, OwnerDraft, OwnerId, OwnerPatch, OwnerProjection};
