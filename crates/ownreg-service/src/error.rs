use ownreg_store::StoreError;
use ownreg_types::{OwnerId, UniqueField};
use thiserror::Error;

/// Failures of owner mutations and reads.
///
/// Every variant is recoverable and scoped to a single operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A required field is absent or blank. Nothing was persisted.
    #[error("Please provide all the details (missing: {})", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    /// HN, phone or email already belongs to another record.
    #[error("HN, phone or email already exists ({})", join_unique(.fields))]
    Conflict { fields: Vec<UniqueField> },

    /// The id does not resolve to a record.
    #[error("Owner not found: {0}")]
    NotFound(OwnerId),

    /// Storage failure; the operation may be retried.
    #[error("Server Error: {0}")]
    Transient(String),
}

fn join_unique(fields: &[UniqueField]) -> String {
    fields
        .iter()
        .map(UniqueField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { fields } => Self::Conflict { fields },
            other => Self::Transient(other.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let v = ServiceError::Validation { fields: vec!["HN", "email"] };
        assert_eq!(v.to_string(), "Please provide all the details (missing: HN, email)");

        let c = ServiceError::Conflict { fields: vec![UniqueField::Phone, UniqueField::Email] };
        assert_eq!(c.to_string(), "HN, phone or email already exists (phone, email)");
    }

    #[test]
    fn store_errors_map_to_taxonomy() {
        let conflict: ServiceError = StoreError::UniqueViolation { fields: vec![UniqueField::Hn] }.into();
        assert_eq!(conflict, ServiceError::Conflict { fields: vec![UniqueField::Hn] });

        let transient: ServiceError = StoreError::LockPoisoned.into();
        assert!(matches!(transient, ServiceError::Transient(_)));
    }
}
