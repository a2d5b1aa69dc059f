//! `quill-client` — abstraction over the posting platform.
//!
//! [`PlatformClient`] is the only fallible external call the publisher makes.
//! Implementations:
//! - [`fake::FakePlatformClient`]: deterministic, in-memory, for local runs
//!   and tests. The only implementation shipped in this iteration.
//! - A real HTTP-backed client slots in behind the same trait later.
//!
//! [`timeline::TimelineService`] is the thin read-side wrapper used by the
//! `get_home_timeline` tool.

pub mod error;
pub mod fake;
pub mod timeline;

use async_trait::async_trait;

pub use error::{ClientError, Result};
pub use quill_core::Post;
pub use fake::FakePlatformClient;
pub use timeline::TimelineService;

/// Platform operations used by Quill services.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Publish a new post for `account_id`.
    ///
    /// Returns the platform-assigned post id on success.
    async fn post_status(&self, account_id: &str, text: &str) -> Result<String>;

    /// Recent posts from the account's home timeline, up to `count`
    /// (implementations may clamp).
    async fn home_timeline(&self, account_id: &str, count: usize) -> Result<Vec<Post>>;
}
