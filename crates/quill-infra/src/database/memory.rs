//! In-memory store - used as fallback when no database is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{
    Comment, CommentPatch, NewComment, NewPost, NewUser, Page, Post, PostPatch, User, Versioned,
};
use quill_core::error::RepoError;
use quill_core::ports::{UserRepository, VersionedStore};

/// One physical row of a versioned table.
#[derive(Debug, Clone)]
struct Record<F> {
    id: i32,
    user_id: i32,
    fields: F,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Table<F> {
    rows: Vec<Record<F>>,
    last_id: i32,
}

impl<F> Default for Table<F> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<F> Table<F> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn current(&self, id: i32) -> Option<&Record<F>> {
        self.rows
            .iter()
            .find(|r| r.id == id && r.deleted_at.is_none())
    }

    fn current_mut(&mut self, id: i32) -> Option<&mut Record<F>> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
    }
}

#[derive(Debug, Clone)]
struct PostFields {
    title: String,
    content: String,
}

#[derive(Debug, Clone)]
struct CommentFields {
    post_id: i32,
    content: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    posts: Table<PostFields>,
    comments: Table<CommentFields>,
}

impl Tables {
    fn username(&self, user_id: i32) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }
}

/// Row shape of a versioned entity held in memory.
trait MemoryTable: Versioned {
    type Fields: Clone + Send + Sync;

    const NEWEST_FIRST: bool;

    fn table(tables: &Tables) -> &Table<Self::Fields>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self::Fields>;

    /// Owner and fields of a new row.
    fn split(draft: Self::Draft) -> (i32, Self::Fields);

    fn merge(fields: &Self::Fields, patch: Self::Patch) -> Self::Fields;

    fn in_scope(fields: &Self::Fields, scope: &Self::Scope) -> bool;

    fn view(record: &Record<Self::Fields>, author: String) -> Self;
}

impl MemoryTable for Post {
    type Fields = PostFields;

    const NEWEST_FIRST: bool = true;

    fn table(tables: &Tables) -> &Table<PostFields> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<PostFields> {
        &mut tables.posts
    }

    fn split(draft: NewPost) -> (i32, PostFields) {
        (
            draft.user_id,
            PostFields {
                title: draft.title,
                content: draft.content,
            },
        )
    }

    fn merge(fields: &PostFields, patch: PostPatch) -> PostFields {
        PostFields {
            title: patch.title.unwrap_or_else(|| fields.title.clone()),
            content: patch.content.unwrap_or_else(|| fields.content.clone()),
        }
    }

    fn in_scope(_fields: &PostFields, _scope: &()) -> bool {
        true
    }

    fn view(record: &Record<PostFields>, author: String) -> Self {
        Post {
            id: record.id,
            user_id: record.user_id,
            title: record.fields.title.clone(),
            content: record.fields.content.clone(),
            author,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl MemoryTable for Comment {
    type Fields = CommentFields;

    const NEWEST_FIRST: bool = false;

    fn table(tables: &Tables) -> &Table<CommentFields> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<CommentFields> {
        &mut tables.comments
    }

    fn split(draft: NewComment) -> (i32, CommentFields) {
        (
            draft.user_id,
            CommentFields {
                post_id: draft.post_id,
                content: draft.content,
            },
        )
    }

    fn merge(fields: &CommentFields, patch: CommentPatch) -> CommentFields {
        CommentFields {
            post_id: fields.post_id,
            content: patch.content.unwrap_or_else(|| fields.content.clone()),
        }
    }

    fn in_scope(fields: &CommentFields, post_id: &i32) -> bool {
        fields.post_id == *post_id
    }

    fn view(record: &Record<CommentFields>, author: String) -> Self {
        Comment {
            id: record.id,
            post_id: record.fields.post_id,
            user_id: record.user_id,
            content: record.fields.content.clone(),
            author,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// In-memory implementation of every storage port.
///
/// A single write lock covers each mutation, standing in for the row lock
/// and transaction of the database store. Data is lost on restart and
/// exclusion only holds within this process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: MemoryTable> VersionedStore<T> for InMemoryStore {
    async fn fetch_current(&self, id: i32) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables)
            .current(id)
            .map(|r| T::view(r, tables.username(r.user_id))))
    }

    async fn fetch_owner(&self, id: i32) -> Result<Option<i32>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).current(id).map(|r| r.user_id))
    }

    async fn list(&self, scope: &T::Scope, page: Page) -> Result<Vec<T>, RepoError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&Record<T::Fields>> = T::table(&tables)
            .rows
            .iter()
            .filter(|r| r.deleted_at.is_none() && T::in_scope(&r.fields, scope))
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        if T::NEWEST_FIRST {
            rows.reverse();
        }

        Ok(rows
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .map(|r| T::view(r, tables.username(r.user_id)))
            .collect())
    }

    async fn insert(&self, draft: T::Draft) -> Result<i32, RepoError> {
        let mut tables = self.tables.write().await;
        let table = T::table_mut(&mut tables);

        let (user_id, fields) = T::split(draft);
        let now = Utc::now();
        let id = table.next_id();
        table.rows.push(Record {
            id,
            user_id,
            fields,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });

        Ok(id)
    }

    async fn soft_update(&self, id: i32, patch: T::Patch) -> Result<i32, RepoError> {
        let mut tables = self.tables.write().await;
        let table = T::table_mut(&mut tables);
        let now = Utc::now();

        let old = table.current_mut(id).ok_or(RepoError::NotFound)?;
        old.deleted_at = Some(now);
        let (user_id, created_at) = (old.user_id, old.created_at);
        let fields = T::merge(&old.fields, patch);

        let new_id = table.next_id();
        table.rows.push(Record {
            id: new_id,
            user_id,
            fields,
            created_at,
            updated_at: now,
            deleted_at: None,
        });

        Ok(new_id)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let row = T::table_mut(&mut tables)
            .current_mut(id)
            .ok_or(RepoError::NotFound)?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: tables.users.len() as i32 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());

        Ok(created)
    }
}
