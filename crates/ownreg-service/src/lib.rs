//! Mutation and read services for the owner registry.
//!
//! [`OwnerService`] is the only write path into an [`OwnerStore`]: it checks
//! required fields, then uniqueness of HN, phone and email (excluding the
//! record itself on update), and translates store outcomes into the
//! [`ServiceError`] taxonomy. [`OwnerReader`] exposes the collection as
//! [`OwnerProjection`]s.
//!
//! Failed operations never mutate the store.
//!
//! [`OwnerStore`]: ownreg_store::OwnerStore
//! [`OwnerProjection`]: ownreg_types::OwnerProjection

pub mod error;
pub mod reader;
pub mod service;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use reader::OwnerReader;
pub use service::OwnerService;
pub use validation::{validate_draft, validate_patch};
