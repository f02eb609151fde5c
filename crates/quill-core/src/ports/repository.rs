use async_trait::async_trait;

use crate::domain::{NewUser, Page, User, Versioned};
use crate::error::RepoError;

/// Versioned record store - soft-update and soft-delete over one table.
///
/// Only current (non-tombstoned) rows are ever read or mutated. Every
/// mutating method runs in its own transaction and either commits fully or
/// leaves the table untouched.
#[async_trait]
pub trait VersionedStore<T: Versioned>: Send + Sync {
    /// The current row with this id, joined with its author's username.
    async fn fetch_current(&self, id: i32) -> Result<Option<T>, RepoError>;

    /// Owner of the current row with this id.
    async fn fetch_owner(&self, id: i32) -> Result<Option<i32>, RepoError>;

    /// Current rows in `scope`, one page at a time.
    async fn list(&self, scope: &T::Scope, page: Page) -> Result<Vec<T>, RepoError>;

    /// Insert a new current row and return its id.
    async fn insert(&self, draft: T::Draft) -> Result<i32, RepoError>;

    /// Lock the current row, tombstone it and insert its successor with the
    /// patch merged over the old values. Returns the successor's id, or
    /// `RepoError::NotFound` if the row is missing or already tombstoned.
    async fn soft_update(&self, id: i32, patch: T::Patch) -> Result<i32, RepoError>;

    /// Tombstone the current row. A row that is missing or already
    /// tombstoned yields `RepoError::NotFound`.
    async fn soft_delete(&self, id: i32) -> Result<(), RepoError>;

    /// Whether a current row with this id exists.
    async fn is_current(&self, id: i32) -> Result<bool, RepoError> {
        Ok(self.fetch_owner(id).await?.is_some())
    }
}

/// User repository. Users are append-only.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, RepoError>;

    /// Insert a user. A unique-constraint violation yields
    /// `RepoError::Constraint`.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}
