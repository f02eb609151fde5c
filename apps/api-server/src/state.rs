//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::{Comment, Post};
use quill_core::ports::{TokenService, UserRepository, VersionedStore};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, PostgresCommentStore, PostgresPostStore, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub auth: AuthService,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

/// The three stores every service is built from.
struct Stores {
    posts: Arc<dyn VersionedStore<Post>>,
    comments: Arc<dyn VersionedStore<Comment>>,
    users: Arc<dyn UserRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            posts: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: &DatabaseConnections) -> Self {
        Self {
            posts: Arc::new(PostgresPostStore::new(conn.main.clone())),
            comments: Arc::new(PostgresCommentStore::new(conn.main.clone())),
            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
        }
    }
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            let db = match &config.database {
                Some(db_config) => match DatabaseConnections::init(db_config).await {
                    Ok(connections) => Some(Arc::new(connections)),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        None
                    }
                },
                None => {
                    tracing::warn!(
                        "DATABASE_URL not set. Running without database (in-memory mode)."
                    );
                    None
                }
            };

            let Some(conn) = db else {
                return Self::in_memory(config.jwt.clone());
            };

            let mut state = Self::assemble(Stores::postgres(&conn), config.jwt.clone());
            state.db = Some(conn);
            tracing::info!("Application state initialized");
            state
        }

        #[cfg(not(feature = "postgres"))]
        {
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory(config.jwt.clone())
        }
    }

    /// State backed entirely by the in-memory store.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(Stores::in_memory(), jwt)
    }

    fn assemble(stores: Stores, jwt: JwtConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));

        Self {
            posts: PostService::new(stores.posts.clone()),
            comments: CommentService::new(stores.comments, stores.posts),
            auth: AuthService::new(
                stores.users,
                Arc::new(Argon2PasswordService::new()),
                tokens.clone(),
            ),
            tokens,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
