use std::sync::Arc;

use crate::domain::Versioned;
use crate::error::DomainError;
use crate::ports::VersionedStore;

/// Checks that the acting principal owns a resource before it is mutated.
///
/// Runs a read-only lookup, so a rejected request never opens a
/// transaction.
pub struct OwnershipGuard<T: Versioned> {
    store: Arc<dyn VersionedStore<T>>,
}

impl<T: Versioned> Clone for OwnershipGuard<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: Versioned> OwnershipGuard<T> {
    pub fn new(store: Arc<dyn VersionedStore<T>>) -> Self {
        Self { store }
    }

    pub async fn authorize(&self, principal: i32, id: i32) -> Result<(), DomainError> {
        let owner = self
            .store
            .fetch_owner(id)
            .await
            .map_err(|e| DomainError::from_repo(e, T::KIND, id))?
            .ok_or(DomainError::not_found(T::KIND, id))?;

        if owner != principal {
            tracing::warn!(
                entity = T::KIND,
                id,
                principal,
                owner,
                "Rejected mutation by non-owner"
            );
            return Err(DomainError::Forbidden);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Page, Post};
    use crate::error::RepoError;
    use async_trait::async_trait;

    /// Store that only answers owner lookups.
    struct OwnerLookup(Result<Option<i32>, ()>);

    #[async_trait]
    impl VersionedStore<Post> for OwnerLookup {
        async fn fetch_current(&self, _id: i32) -> Result<Option<Post>, RepoError> {
            unreachable!()
        }

        async fn fetch_owner(&self, _id: i32) -> Result<Option<i32>, RepoError> {
            self.0
                .map_err(|_| RepoError::Connection("connection refused".to_string()))
        }

        async fn list(&self, _scope: &(), _page: Page) -> Result<Vec<Post>, RepoError> {
            unreachable!()
        }

        async fn insert(&self, _draft: crate::domain::NewPost) -> Result<i32, RepoError> {
            unreachable!()
        }

        async fn soft_update(
            &self,
            _id: i32,
            _patch: crate::domain::PostPatch,
        ) -> Result<i32, RepoError> {
            unreachable!()
        }

        async fn soft_delete(&self, _id: i32) -> Result<(), RepoError> {
            unreachable!()
        }
    }

    fn guard(owner: Result<Option<i32>, ()>) -> OwnershipGuard<Post> {
        OwnershipGuard::new(Arc::new(OwnerLookup(owner)))
    }

    #[tokio::test]
    async fn test_owner_is_allowed() {
        assert!(guard(Ok(Some(1))).authorize(1, 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_principal_is_forbidden() {
        let err = guard(Ok(Some(999))).authorize(1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let err = guard(Ok(None)).authorize(1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "post", id: 10 }));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_transient() {
        let err = guard(Err(())).authorize(1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::Transient(_)));
    }
}
