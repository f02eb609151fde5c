//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Comment, CommentPatch, NewComment, Page};
use quill_shared::MessageResponse;
use quill_shared::dto::{
    CommentListResponse, CommentResponse, CreateCommentRequest, PaginationQuery,
    UpdateCommentRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        content: comment.content,
        author: comment.author,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

/// GET /api/v1/posts/{id}/comments
pub async fn list_comments(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let page = Page::new(query.page, query.limit);
    let comments = state.comments.list_by_post(post_id, page).await?;

    Ok(HttpResponse::Ok().json(CommentListResponse {
        post_id,
        comments: comments.into_iter().map(comment_response).collect(),
        page: page.page,
        limit: page.limit,
    }))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;
    tracing::debug!(author = %identity.username, "Creating comment");

    let comment = state
        .comments
        .create(NewComment {
            post_id: path.into_inner(),
            user_id: identity.user_id,
            content: body.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/v1/comments/{id}
pub async fn get_comment(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let comment = state.comments.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// PUT /api/v1/comments/{id} - responds with the new version.
pub async fn update_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;

    let comment = state
        .comments
        .update(
            identity.user_id,
            path.into_inner(),
            CommentPatch {
                content: body.content,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}
