//! Owner record storage for the owner registry.
//!
//! This crate is the source of truth for the registry's uniqueness rule:
//! HN, phone and email are each unique across all owner records. Backends
//! enforce the rule themselves through unique indexes, so a duplicate is
//! rejected at the storage layer even when a caller skipped its own check.
//!
//! # Storage Backends
//!
//! All backends implement the [`OwnerStore`] trait:
//!
//! - [`InMemoryOwnerStore`] -- `Vec` + `HashMap` indexes for tests and embedding
//! - [`JsonFileOwnerStore`] -- the same table persisted as one JSON document
//!
//! # Design Rules
//!
//! 1. Identifiers are assigned by the store and never change.
//! 2. A write that violates a unique index changes nothing.
//! 3. Check-then-write happens under a single write lock.
//! 4. `find_all` returns insertion order.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod filter;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::JsonFileOwnerStore;
pub use filter::OwnerFilter;
pub use memory::InMemoryOwnerStore;
pub use traits::OwnerStore;
