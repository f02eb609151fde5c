//! # Quill Core
//!
//! The domain layer of the Quill blogging API.
//! Entities, ports and the versioning services live here; this crate has
//! no database or HTTP dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
