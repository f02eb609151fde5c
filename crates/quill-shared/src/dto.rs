//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const EMAIL_MAX: usize = 100;
const PASSWORD_MIN: usize = 8;
const TITLE_MAX: usize = 255;

/// Collected field errors of one request.
pub type ValidationErrors = Vec<String>;

fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_title(title: &str, errors: &mut ValidationErrors) {
    let len = title.trim().chars().count();
    if len == 0 || title.chars().count() > TITLE_MAX {
        errors.push(format!("title must be 1-{TITLE_MAX} characters"));
    }
}

fn check_content(content: &str, errors: &mut ValidationErrors) {
    if content.trim().is_empty() {
        errors.push("content must not be empty".to_string());
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        let username_len = self.username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
            errors.push(format!(
                "username must be {USERNAME_MIN}-{USERNAME_MAX} characters"
            ));
        }
        if !self.email.contains('@') || self.email.len() > EMAIL_MAX {
            errors.push("email must be a valid address".to_string());
        }
        if self.password.chars().count() < PASSWORD_MIN {
            errors.push(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ));
        }

        finish(errors)
    }
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.email.is_empty() {
            errors.push("email is required".to_string());
        }
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }
        finish(errors)
    }
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Issued token together with the user it belongs to. The same token is
/// also set as the `token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        check_title(&self.title, &mut errors);
        check_content(&self.content, &mut errors);
        finish(errors)
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(content) = &self.content {
            check_content(content, &mut errors);
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        check_content(&self.content, &mut errors);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if let Some(content) = &self.content {
            check_content(content, &mut errors);
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub post_id: i32,
    pub comments: Vec<CommentResponse>,
    pub page: u64,
    pub limit: u64,
}

/// `?page=&limit=` query; normalization happens server side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register("alice", "alice@example.com", "password123")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_registration_collects_every_error() {
        let errors = register("al", "not-an-email", "short")
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_username_bounds() {
        assert!(register("abc", "a@b.c", "password123").validate().is_ok());
        assert!(register(&"a".repeat(50), "a@b.c", "password123")
            .validate()
            .is_ok());
        assert!(register(&"a".repeat(51), "a@b.c", "password123")
            .validate()
            .is_err());
    }

    #[test]
    fn test_overlong_email_is_rejected() {
        let email = format!("{}@example.com", "a".repeat(100));
        assert!(register("alice", &email, "password123").validate().is_err());
    }

    #[test]
    fn test_post_title_rules() {
        let ok = CreatePostRequest {
            title: "Hello".to_string(),
            content: "World".to_string(),
        };
        let blank = CreatePostRequest {
            title: "   ".to_string(),
            content: "World".to_string(),
        };
        let long = CreatePostRequest {
            title: "t".repeat(256),
            content: "World".to_string(),
        };

        assert!(ok.validate().is_ok());
        assert!(blank.validate().is_err());
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdatePostRequest::default().validate().is_ok());
        assert!(UpdateCommentRequest::default().validate().is_ok());
    }

    #[test]
    fn test_present_update_fields_are_checked() {
        let req = UpdatePostRequest {
            title: None,
            content: Some(String::new()),
        };
        assert_eq!(req.validate().unwrap_err(), ["content must not be empty"]);
    }

    #[test]
    fn test_update_request_omits_missing_fields() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":"C"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("C"));
        assert!(req.content.is_none());
    }
}
