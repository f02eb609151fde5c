//! Authentication handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::User;
use quill_shared::MessageResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::{Identity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }
}

/// Body and cookie of a freshly issued session.
fn session(
    req: &HttpRequest,
    state: &AppState,
    mut response: actix_web::HttpResponseBuilder,
    user: User,
    token: String,
) -> HttpResponse {
    let cookie = session_cookie(req, token.clone(), state.auth.token_lifetime_seconds());
    response.cookie(cookie).json(AuthResponse {
        token,
        user: user_response(user),
    })
}

/// POST /api/v1/auth/register
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;

    let (user, token) = state
        .auth
        .register(&body.username, &body.email, &body.password)
        .await?;

    Ok(session(&req, &state, HttpResponse::Created(), user, token))
}

/// POST /api/v1/auth/login
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;

    let (user, token) = state.auth.login(&body.email, &body.password).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(session(&req, &state, HttpResponse::Ok(), user, token))
}

/// POST /api/v1/auth/logout
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(MessageResponse::new("Logged out successfully"))
}

/// GET /api/v1/auth/me - Protected route
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = state.auth.current_user(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(user_response(user)))
}
