//! PostgreSQL user repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
};

use quill_core::domain::{NewUser, User};
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

use super::db_err;
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        tracing::debug!(user_email = %mask_email(&user.email), "Creating user");

        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }
}
