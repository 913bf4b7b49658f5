//! Foundation types for the owner registry.
//!
//! Every other `ownreg` crate depends on `ownreg-types`. The wire names used
//! by serde (`_id`, `HN`, `createdAt`, `updatedAt`) are part of the public
//! HTTP contract and of the persisted document layout.
//!
//! # Key Types
//!
//! - [`OwnerId`]: time-ordered record identifier (UUID v7)
//! - [`Owner`]: a persisted owner record with timestamps
//! - [`OwnerProjection`]: the public read shape (timestamps excluded)
//! - [`OwnerDraft`] / [`OwnerPatch`]: create and update payloads
//! - [`NewOwner`]: a validated, complete field set ready for insertion
//! - [`UniqueField`]: the three uniqueness-constrained fields

pub mod error;
pub mod identity;
pub mod owner;
pub mod payload;

pub use error::TypeError;
pub use identity::OwnerId;
pub use owner::{NewOwner, Owner, OwnerProjection, UniqueField};
pub use payload::{OwnerDraft, OwnerPatch};
