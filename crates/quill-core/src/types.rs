use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single published post as seen on a timeline.
///
/// Produced by the platform client (real or fake) and consumed by the
/// timeline, search and analytics services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Platform-assigned post id (synthetic for the fake client).
    pub id: String,
    /// Author handle, e.g. `"user3"`.
    pub author: String,
    /// Post text content.
    pub text: String,
    /// Creation time in UTC.
    pub created_at: DateTime<Utc>,
}
