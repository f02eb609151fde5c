//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{NewPost, Page, Post, PostPatch};
use quill_shared::MessageResponse;
use quill_shared::dto::{
    CreatePostRequest, PaginationQuery, PostListResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        author: post.author,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// GET /api/v1/posts
pub async fn list_posts(
    _identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.page, query.limit);
    let posts = state.posts.list(&(), page).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.into_iter().map(post_response).collect(),
        page: page.page,
        limit: page.limit,
    }))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/v1/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;
    tracing::debug!(author = %identity.username, "Creating post");

    let post = state
        .posts
        .create(NewPost {
            user_id: identity.user_id,
            title: body.title,
            content: body.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/v1/posts/{id} - responds with the new version, which has a new id.
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;

    let patch = PostPatch {
        title: body.title,
        content: body.content,
    };
    let post = state
        .posts
        .update(identity.user_id, path.into_inner(), patch)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
