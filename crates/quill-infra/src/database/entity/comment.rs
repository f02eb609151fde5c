//! Comment entity for SeaORM.

use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn into_domain(
    model: Model,
    author: Option<super::user::Model>,
) -> quill_core::domain::Comment {
    quill_core::domain::Comment {
        id: model.id,
        post_id: model.post_id,
        user_id: model.user_id,
        content: model.content,
        author: author.map(|u| u.username).unwrap_or_default(),
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}

impl From<quill_core::domain::NewComment> for ActiveModel {
    fn from(comment: quill_core::domain::NewComment) -> Self {
        Self {
            id: NotSet,
            post_id: Set(comment.post_id),
            user_id: Set(comment.user_id),
            content: Set(comment.content),
            created_at: NotSet,
            updated_at: NotSet,
            deleted_at: NotSet,
        }
    }
}
