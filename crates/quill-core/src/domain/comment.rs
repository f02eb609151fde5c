use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Versioned;

/// Current version of a comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl Versioned for Comment {
    const KIND: &'static str = "comment";

    type Draft = NewComment;
    type Patch = CommentPatch;
    /// Comments are always listed per post.
    type Scope = i32;

    fn id(&self) -> i32 {
        self.id
    }

    fn owner_id(&self) -> i32 {
        self.user_id
    }
}
