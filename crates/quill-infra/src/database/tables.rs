//! Versioned table layouts for posts and comments.

use sea_orm::sea_query::Order;
use sea_orm::{ColumnTrait, Condition, Value};

use quill_core::domain::{Comment, CommentPatch, NewComment, NewPost, Post, PostPatch};

use super::entity::{comment, post, user};
use super::versioned_store::{PostgresVersionedStore, VersionedTable};

/// PostgreSQL post store.
pub type PostgresPostStore = PostgresVersionedStore<Post>;

/// PostgreSQL comment store.
pub type PostgresCommentStore = PostgresVersionedStore<Comment>;

impl VersionedTable for Post {
    type Entity = post::Entity;

    const CARRIED: &'static [&'static str] = &["user_id"];
    const MUTABLE: &'static [&'static str] = &["title", "content"];

    fn id_column() -> post::Column {
        post::Column::Id
    }

    fn owner_column() -> post::Column {
        post::Column::UserId
    }

    fn created_at_column() -> post::Column {
        post::Column::CreatedAt
    }

    fn deleted_at_column() -> post::Column {
        post::Column::DeletedAt
    }

    /// Newest first.
    fn list_order() -> Order {
        Order::Desc
    }

    fn scope_condition(_scope: &()) -> Condition {
        Condition::all()
    }

    fn active_model(draft: NewPost) -> post::ActiveModel {
        draft.into()
    }

    fn patch_values(patch: PostPatch) -> Vec<Value> {
        vec![patch.title.into(), patch.content.into()]
    }

    fn from_row(model: post::Model, author: Option<user::Model>) -> Self {
        post::into_domain(model, author)
    }
}

impl VersionedTable for Comment {
    type Entity = comment::Entity;

    const CARRIED: &'static [&'static str] = &["post_id", "user_id"];
    const MUTABLE: &'static [&'static str] = &["content"];

    fn id_column() -> comment::Column {
        comment::Column::Id
    }

    fn owner_column() -> comment::Column {
        comment::Column::UserId
    }

    fn created_at_column() -> comment::Column {
        comment::Column::CreatedAt
    }

    fn deleted_at_column() -> comment::Column {
        comment::Column::DeletedAt
    }

    /// Thread order, oldest first.
    fn list_order() -> Order {
        Order::Asc
    }

    fn scope_condition(post_id: &i32) -> Condition {
        Condition::all().add(comment::Column::PostId.eq(*post_id))
    }

    fn active_model(draft: NewComment) -> comment::ActiveModel {
        draft.into()
    }

    fn patch_values(patch: CommentPatch) -> Vec<Value> {
        vec![patch.content.into()]
    }

    fn from_row(model: comment::Model, author: Option<user::Model>) -> Self {
        comment::into_domain(model, author)
    }
}
