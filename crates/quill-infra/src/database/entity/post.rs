//! Post entity for SeaORM.

use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from a post row and its author to the domain view.
pub fn into_domain(model: Model, author: Option<super::user::Model>) -> quill_core::domain::Post {
    quill_core::domain::Post {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        content: model.content,
        author: author.map(|u| u.username).unwrap_or_default(),
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}

/// Conversion from a new domain post to an insertable row.
impl From<quill_core::domain::NewPost> for ActiveModel {
    fn from(post: quill_core::domain::NewPost) -> Self {
        Self {
            id: NotSet,
            user_id: Set(post.user_id),
            title: Set(post.title),
            content: Set(post.content),
            created_at: NotSet,
            updated_at: NotSet,
            deleted_at: NotSet,
        }
    }
}
