//! Domain-level error types.

use thiserror::Error;

/// Domain errors - the caller-visible outcome of a service operation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Not the owner of this resource")]
    Forbidden,

    #[error("Duplicate entity: {0}")]
    Conflict(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Storage failure: {0}")]
    Transient(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Map a repository failure on `entity`/`id` to its domain outcome.
    pub fn from_repo(err: RepoError, entity: &'static str, id: i32) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound { entity, id },
            RepoError::Constraint(msg) => Self::Conflict(msg),
            other => Self::Transient(other.to_string()),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_not_found_keeps_entity_and_id() {
        let err = DomainError::from_repo(RepoError::NotFound, "post", 7);
        assert!(matches!(err, DomainError::NotFound { entity: "post", id: 7 }));
    }

    #[test]
    fn test_storage_failures_are_transient() {
        let err = DomainError::from_repo(RepoError::Transaction("begin".into()), "comment", 1);
        assert!(matches!(err, DomainError::Transient(_)));

        let err = DomainError::from_repo(RepoError::Connection("refused".into()), "post", 1);
        assert!(matches!(err, DomainError::Transient(_)));
    }

    #[test]
    fn test_constraint_is_conflict() {
        let err = DomainError::from_repo(RepoError::Constraint("email".into()), "user", 0);
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "email"));
    }
}
