use tradenet_core::validation::ValidationErrors;

/// Error returned by repository writes that enforce record rules before
/// committing.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The row that would be committed breaks a record rule; the
    /// transaction was rolled back.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<ValidationErrors> for DbError {
    fn from(errors: ValidationErrors) -> Self {
        DbError::Validation(errors)
    }
}
