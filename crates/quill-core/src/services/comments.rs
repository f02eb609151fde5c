use std::sync::Arc;

use crate::domain::{Comment, CommentPatch, NewComment, Page, Post, Versioned};
use crate::error::DomainError;
use crate::ports::VersionedStore;

use super::VersionedService;

/// Comment usecases: the versioned pattern plus the parent post check.
#[derive(Clone)]
pub struct CommentService {
    comments: VersionedService<Comment>,
    posts: Arc<dyn VersionedStore<Post>>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn VersionedStore<Comment>>,
        posts: Arc<dyn VersionedStore<Post>>,
    ) -> Self {
        Self {
            comments: VersionedService::new(comments),
            posts,
        }
    }

    /// Comment on a post that is current at the time of the call.
    pub async fn create(&self, draft: NewComment) -> Result<Comment, DomainError> {
        let post_id = draft.post_id;
        let exists = self
            .posts
            .is_current(post_id)
            .await
            .map_err(|e| DomainError::from_repo(e, Post::KIND, post_id))?;

        if !exists {
            return Err(DomainError::not_found(Post::KIND, post_id));
        }

        self.comments.create(draft).await
    }

    /// Thread order: oldest first.
    pub async fn list_by_post(&self, post_id: i32, page: Page) -> Result<Vec<Comment>, DomainError> {
        self.comments.list(&post_id, page).await
    }

    pub async fn get(&self, id: i32) -> Result<Comment, DomainError> {
        self.comments.get(id).await
    }

    pub async fn update(
        &self,
        principal: i32,
        id: i32,
        patch: CommentPatch,
    ) -> Result<Comment, DomainError> {
        self.comments.update(principal, id, patch).await
    }

    pub async fn delete(&self, principal: i32, id: i32) -> Result<(), DomainError> {
        self.comments.delete(principal, id).await
    }
}
