//! Storage adapters: PostgreSQL via SeaORM, and an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod tables;
#[cfg(feature = "postgres")]
mod user_repo;
#[cfg(feature = "postgres")]
mod versioned_store;

pub use connections::DatabaseConfig;
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;
#[cfg(feature = "postgres")]
pub use tables::{PostgresCommentStore, PostgresPostStore};
#[cfg(feature = "postgres")]
pub use user_repo::PostgresUserRepository;
#[cfg(feature = "postgres")]
pub use versioned_store::{PostgresVersionedStore, VersionedTable};

#[cfg(feature = "postgres")]
use quill_core::error::RepoError;
#[cfg(feature = "postgres")]
use sea_orm::{DbErr, SqlErr};

/// Map a SeaORM error to a repository error; unique violations become
/// `Constraint`.
#[cfg(feature = "postgres")]
pub(crate) fn db_err(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepoError::Constraint(detail);
    }
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Failure to open, commit or roll back a transaction.
#[cfg(feature = "postgres")]
pub(crate) fn tx_err(err: DbErr) -> RepoError {
    RepoError::Transaction(err.to_string())
}
