use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

/// Registration and login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }

    /// Create a user and issue a token for it.
    ///
    /// The existence check only rejects early; the unique constraints on
    /// `username` and `email` decide races between concurrent registrations.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), DomainError> {
        let taken = self
            .users
            .exists_by_email_or_username(email, username)
            .await
            .map_err(transient)?;
        if taken {
            return Err(DomainError::Conflict("User exists".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Transient(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Conflict("User exists".to_string()),
                other => transient(other),
            })?;

        tracing::info!(user_id = user.id, "Registered user");
        let token = self.issue(&user)?;
        Ok((user, token))
    }

    /// Unknown email and wrong password are the same `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(transient)?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Transient(e.to_string()))?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        let token = self.issue(&user)?;
        Ok((user, token))
    }

    pub async fn current_user(&self, id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(transient)?
            .ok_or(DomainError::not_found("user", id))
    }

    fn issue(&self, user: &User) -> Result<String, DomainError> {
        self.tokens
            .generate_token(user.id, &user.username, &user.email)
            .map_err(|e| DomainError::Transient(e.to_string()))
    }
}

fn transient(err: RepoError) -> DomainError {
    DomainError::Transient(err.to_string())
}
