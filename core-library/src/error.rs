use thiserror::Error;

/// Domain failures raised by the in-memory repository.
///
/// The `Display` text is what ends up in a failure envelope's `error` field,
/// so `NotFound` renders as `"<Entity> not found"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("{entity_type} not found")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Invalid {entity_type} status transition: {from} -> {to}")]
    InvalidTransition {
        entity_type: String,
        from: String,
        to: String,
    },

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl LibraryError {
    pub fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        LibraryError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        LibraryError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
