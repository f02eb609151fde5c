//! Usecases wired to the in-memory store.

#![cfg(feature = "auth")]

use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::{
    Comment, CommentPatch, NewComment, NewPost, Page, Post, PostPatch,
};
use quill_core::ports::{TokenService, VersionedStore};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

struct App {
    posts: PostService,
    comments: CommentService,
    auth: AuthService,
    tokens: Arc<JwtTokenService>,
}

fn app() -> App {
    let store = Arc::new(InMemoryStore::new());
    let post_store: Arc<dyn VersionedStore<Post>> = store.clone();
    let comment_store: Arc<dyn VersionedStore<Comment>> = store.clone();
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "integration-secret".to_string(),
        ..JwtConfig::default()
    }));

    App {
        posts: PostService::new(post_store.clone()),
        comments: CommentService::new(comment_store, post_store),
        auth: AuthService::new(store, Arc::new(Argon2PasswordService::new()), tokens.clone()),
        tokens,
    }
}

fn new_post(user_id: i32, title: &str, content: &str) -> NewPost {
    NewPost {
        user_id,
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn title(value: &str) -> PostPatch {
    PostPatch {
        title: Some(value.to_string()),
        content: None,
    }
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = app();
    let (alice, _) = app
        .auth
        .register("alice", "alice@example.com", "password123")
        .await
        .unwrap();
    let (bob, _) = app
        .auth
        .register("bob", "bob@example.com", "password123")
        .await
        .unwrap();

    let created = app.posts.create(new_post(alice.id, "A", "B")).await.unwrap();
    assert_eq!(created.author, "alice");

    let updated = app.posts.update(alice.id, created.id, title("C")).await.unwrap();
    assert_ne!(updated.id, created.id);
    assert_eq!(updated.title, "C");
    assert_eq!(updated.content, "B");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert!(matches!(
        app.posts.get(created.id).await,
        Err(DomainError::NotFound { entity: "post", .. })
    ));

    assert!(matches!(
        app.posts.update(bob.id, updated.id, title("hijacked")).await,
        Err(DomainError::Forbidden)
    ));
    assert_eq!(app.posts.get(updated.id).await.unwrap().title, "C");

    app.posts.delete(alice.id, updated.id).await.unwrap();
    assert!(matches!(
        app.posts.get(updated.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(app.posts.list(&(), Page::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();

    app.posts.delete(1, post.id).await.unwrap();

    assert!(matches!(
        app.posts.delete(1, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_of_superseded_version_is_not_found() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();

    app.posts.update(1, post.id, title("t2")).await.unwrap();

    assert!(matches!(
        app.posts.update(1, post.id, title("t3")).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_empty_patch_still_forks_a_version() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();

    let next = app
        .posts
        .update(1, post.id, PostPatch::default())
        .await
        .unwrap();

    assert_ne!(next.id, post.id);
    assert_eq!((next.title.as_str(), next.content.as_str()), ("t", "c"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_fork_exactly_once() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let posts = app.posts.clone();
            tokio::spawn(async move { posts.update(1, post.id, title(&format!("v{i}"))).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(DomainError::NotFound { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(app.posts.list(&(), Page::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_posts_are_listed_newest_first_and_paged() {
    let app = app();
    for i in 1..=3 {
        app.posts
            .create(new_post(1, &format!("p{i}"), "c"))
            .await
            .unwrap();
    }

    let first = app.posts.list(&(), Page::new(Some(1), Some(2))).await.unwrap();
    let second = app.posts.list(&(), Page::new(Some(2), Some(2))).await.unwrap();

    let titles: Vec<_> = first.iter().chain(&second).map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["p3", "p2", "p1"]);
}

#[tokio::test]
async fn test_comment_thread() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();

    let first = app
        .comments
        .create(NewComment {
            post_id: post.id,
            user_id: 2,
            content: "first".to_string(),
        })
        .await
        .unwrap();
    app.comments
        .create(NewComment {
            post_id: post.id,
            user_id: 1,
            content: "second".to_string(),
        })
        .await
        .unwrap();

    let edited = app
        .comments
        .update(
            2,
            first.id,
            CommentPatch {
                content: Some("first, edited".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.post_id, post.id);
    assert_eq!(edited.user_id, 2);

    assert!(matches!(
        app.comments.delete(1, edited.id).await,
        Err(DomainError::Forbidden)
    ));

    let thread = app
        .comments
        .list_by_post(post.id, Page::default())
        .await
        .unwrap();
    let contents: Vec<_> = thread.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, ["first, edited", "second"]);
}

#[tokio::test]
async fn test_comment_on_deleted_post_is_not_found() {
    let app = app();
    let post = app.posts.create(new_post(1, "t", "c")).await.unwrap();
    app.posts.delete(1, post.id).await.unwrap();

    let result = app
        .comments
        .create(NewComment {
            post_id: post.id,
            user_id: 1,
            content: "too late".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound { entity: "post", .. })
    ));
}

#[tokio::test]
async fn test_register_issues_token_for_user() {
    let app = app();

    let (user, token) = app
        .auth
        .register("alice", "alice@example.com", "password123")
        .await
        .unwrap();
    let claims = app.tokens.validate_token(&token).unwrap();

    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.username, "alice");
    assert_ne!(user.password_hash, "password123");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = app();
    app.auth
        .register("alice", "alice@example.com", "password123")
        .await
        .unwrap();

    let same_email = app
        .auth
        .register("alice2", "alice@example.com", "password123")
        .await;
    let same_username = app
        .auth
        .register("alice", "other@example.com", "password123")
        .await;

    assert!(matches!(same_email, Err(DomainError::Conflict(_))));
    assert!(matches!(same_username, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_login() {
    let app = app();
    let (user, _) = app
        .auth
        .register("alice", "alice@example.com", "password123")
        .await
        .unwrap();

    let (logged_in, _) = app
        .auth
        .login("alice@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    assert!(matches!(
        app.auth.login("alice@example.com", "wrong-password").await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        app.auth.login("nobody@example.com", "password123").await,
        Err(DomainError::Unauthorized)
    ));
}
