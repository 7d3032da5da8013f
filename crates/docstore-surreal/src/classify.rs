//! Mapping of SurrealDB error messages onto `StoreError`.

use docstore_client::StoreError;

/// Classify a failed service-level operation (define/remove database).
pub(crate) fn service_error(store: &str, message: String) -> StoreError {
    let lower = message.to_lowercase();
    if lower.contains("already exists") {
        StoreError::StoreAlreadyExists(store.to_string())
    } else if lower.contains("does not exist") || lower.contains("not found") {
        StoreError::StoreNotFound(store.to_string())
    } else {
        StoreError::ServiceUnavailable(message)
    }
}

/// Thrown by the delete statement when no matching child is left.
pub(crate) const NOTHING_TO_DELETE: &str = "nothing to delete";

/// Classify a failed statement.
pub(crate) fn statement_error(message: String) -> StoreError {
    let lower = message.to_lowercase();
    if lower.contains(NOTHING_TO_DELETE) {
        StoreError::ExecutionError(message)
    } else if lower.contains("parse error") || lower.contains("incorrect arguments") {
        StoreError::StatementError(message)
    } else {
        StoreError::ExecutionError(message)
    }
}

/// Classify a failed read of a store's document.
pub(crate) fn read_error(store: &str, message: String) -> StoreError {
    let lower = message.to_lowercase();
    if lower.contains("does not exist") || lower.contains("not found") {
        StoreError::StoreNotFound(store.to_string())
    } else {
        statement_error(message)
    }
}

/// Store names are interpolated into SurrealQL, so only plain identifiers
/// are accepted.
pub(crate) fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(StoreError::StatementError(format!(
            "invalid store name '{name}'"
        )))
    }
}
