/// Service error type
///
/// Every operation in [`crate::services`] fails with one of these kinds.
/// None of them is retried and none is fatal to the process; the HTTP layer
/// maps each kind to a distinct response.

use crate::auth::authorization::AuthzError;
use crate::auth::password::PasswordError;
use crate::auth::jwt::JwtError;
use crate::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate membership or duplicate unique field
    #[error("{0}")]
    Conflict(String),

    /// The caller is not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input or unresolvable caller identity
    #[error("{0}")]
    BadRequest(String),

    /// Credentials were rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Storage or crypto failure
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            StoreError::MissingReference(msg) => ServiceError::NotFound(msg),
            StoreError::Database(err) => ServiceError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(format!("Token operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: ServiceError = StoreError::Conflict("duplicate".to_string()).into();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg == "duplicate"));
    }

    #[test]
    fn test_missing_reference_maps_to_not_found() {
        let err: ServiceError = StoreError::MissingReference("Project 4 not found".to_string()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_authz_error_maps_to_forbidden() {
        let err: ServiceError = AuthzError::AdminRequired.into();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
