//! `quill-core` — shared building blocks for the Quill workspace.
//!
//! Holds the pieces every other crate needs: the [`config::QuillConfig`]
//! loader (quill.toml + `QUILL_*` env overrides), the [`types::Post`] DTO
//! that flows between the platform client, search and analytics, and the
//! top-level [`error::QuillError`].

pub mod config;
pub mod error;
pub mod types;

pub use config::QuillConfig;
pub use error::{QuillError, Result};
pub use types::Post;
