use std::sync::Arc;

use crate::domain::{Page, Versioned};
use crate::error::DomainError;
use crate::ports::VersionedStore;

use super::OwnershipGuard;

/// Usecases shared by every versioned entity.
///
/// Mutations follow one path: ownership check, then a single store call
/// that owns its transaction, then a re-read of the canonical current row.
pub struct VersionedService<T: Versioned> {
    store: Arc<dyn VersionedStore<T>>,
    guard: OwnershipGuard<T>,
}

impl<T: Versioned> Clone for VersionedService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<T: Versioned> VersionedService<T> {
    pub fn new(store: Arc<dyn VersionedStore<T>>) -> Self {
        let guard = OwnershipGuard::new(store.clone());
        Self { store, guard }
    }

    pub async fn get(&self, id: i32) -> Result<T, DomainError> {
        self.store
            .fetch_current(id)
            .await
            .map_err(|e| DomainError::from_repo(e, T::KIND, id))?
            .ok_or(DomainError::not_found(T::KIND, id))
    }

    pub async fn list(&self, scope: &T::Scope, page: Page) -> Result<Vec<T>, DomainError> {
        self.store
            .list(scope, page)
            .await
            .map_err(|e| DomainError::Transient(e.to_string()))
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, DomainError> {
        let id = self
            .store
            .insert(draft)
            .await
            .map_err(|e| DomainError::from_repo(e, T::KIND, 0))?;

        let created = self.get(id).await?;
        tracing::info!(
            entity = T::KIND,
            id = created.id(),
            owner = created.owner_id(),
            "Created"
        );
        Ok(created)
    }

    /// Fork a new version of `id`. The returned entity carries the new id;
    /// `id` itself is tombstoned.
    pub async fn update(&self, principal: i32, id: i32, patch: T::Patch) -> Result<T, DomainError> {
        self.guard.authorize(principal, id).await?;

        let new_id = self
            .store
            .soft_update(id, patch)
            .await
            .map_err(|e| DomainError::from_repo(e, T::KIND, id))?;

        let successor = self.get(new_id).await?;
        tracing::info!(
            entity = T::KIND,
            old_id = id,
            new_id = successor.id(),
            "Forked new version"
        );
        Ok(successor)
    }

    pub async fn delete(&self, principal: i32, id: i32) -> Result<(), DomainError> {
        self.guard.authorize(principal, id).await?;

        self.store
            .soft_delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, T::KIND, id))?;

        tracing::info!(entity = T::KIND, id, "Tombstoned");
        Ok(())
    }
}
