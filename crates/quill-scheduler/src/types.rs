use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scheduled post.
///
/// The only transitions are `Pending -> Posted` and `Pending -> Failed`;
/// both targets are terminal. The due-post query selects `Pending` rows
/// only, so a terminal row is never handed to the publisher again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Recorded and awaiting its publish time.
    Pending,
    /// Successfully published.
    Posted,
    /// Publish attempted and failed. Never retried.
    Failed,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Pending => "pending",
            PostStatus::Posted => "posted",
            PostStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PostStatus::Pending),
            "posted" => Ok(PostStatus::Posted),
            "failed" => Ok(PostStatus::Failed),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// Input for creating a scheduled post. The store assigns the id and the
/// bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub account_id: String,
    pub text: String,
    /// Publish-at instant, UTC. Fixed at creation; there is no reschedule.
    pub run_at: DateTime<Utc>,
}

/// A persisted scheduled post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPost {
    /// Store-assigned primary key, immutable once assigned.
    pub id: i64,
    /// Logical publishing account.
    pub account_id: String,
    /// Content to publish.
    pub text: String,
    /// Publish-at instant, UTC.
    pub run_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: PostStatus,
    /// Platform-assigned id; set iff `status == Posted`.
    pub platform_post_id: Option<String>,
    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,
    /// Set by the store on insert and on every status write.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_round_trip() {
        for status in [PostStatus::Pending, PostStatus::Posted, PostStatus::Failed] {
            let parsed: PostStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("retrying".parse::<PostStatus>().is_err());
    }
}
