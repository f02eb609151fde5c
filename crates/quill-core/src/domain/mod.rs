//! Domain entities - the core business objects.

mod comment;
mod page;
mod post;
mod user;
mod versioned;

pub use comment::{Comment, CommentPatch, NewComment};
pub use page::Page;
pub use post::{NewPost, Post, PostPatch};
pub use user::{NewUser, User};
pub use versioned::Versioned;
