use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Versioned;

/// Current version of a blog post, with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
}

/// Partial post update.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Versioned for Post {
    const KIND: &'static str = "post";

    type Draft = NewPost;
    type Patch = PostPatch;
    type Scope = ();

    fn id(&self) -> i32 {
        self.id
    }

    fn owner_id(&self) -> i32 {
        self.user_id
    }
}
