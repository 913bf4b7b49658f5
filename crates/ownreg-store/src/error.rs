use ownreg_types::UniqueField;

/// Errors from owner store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write would give another record's value to a unique field.
    #[error("unique constraint violated on {}", join_fields(.fields))]
    UniqueViolation { fields: Vec<UniqueField> },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data cannot be loaded as-is.
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

fn join_fields(fields: &[UniqueField]) -> String {
    fields
        .iter()
        .map(UniqueField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
