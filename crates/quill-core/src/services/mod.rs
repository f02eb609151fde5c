//! Services - the usecases orchestrating ports.

mod auth;
mod comments;
mod guard;
mod versioned;

pub use auth::AuthService;
pub use comments::CommentService;
pub use guard::OwnershipGuard;
pub use versioned::VersionedService;

use crate::domain::Post;

/// Post usecases are exactly the shared versioned pattern.
pub type PostService = VersionedService<Post>;
