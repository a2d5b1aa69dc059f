use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use quill_core::Post;

use crate::{PlatformClient, Result};

/// Total number of seed posts generated at startup.
const SEED_SIZE: usize = 200;
/// Number of distinct authors used to label seed posts (user0..user4).
const AUTHORS_MOD: usize = 5;
/// Starting value for synthetic post ids (prefix "tw-").
const START_ID: u64 = 1000;
/// Hashtags sprinkled over every fourth seed post so search and analytics
/// have something to find.
const SEED_TAGS: [&str; 3] = ["#rust", "#tokio", "#quill"];

/// In-memory, deterministic [`PlatformClient`] used in local runs and tests.
///
/// `home_timeline` returns a prefix of a fixed 200-post seed;
/// `post_status` never fails and returns synthetic ids `tw-1001`, `tw-1002`…
pub struct FakePlatformClient {
    seed: Vec<Post>,
    id_seq: AtomicU64,
}

impl FakePlatformClient {
    pub fn new() -> Self {
        let base: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().expect("valid seed base time");
        let seed = (0..SEED_SIZE)
            .map(|i| {
                let mut text = format!("Hello from seed post #{i}");
                if i % 4 == 0 {
                    text.push(' ');
                    text.push_str(SEED_TAGS[(i / 4) % SEED_TAGS.len()]);
                }
                Post {
                    id: format!("seed-{i}"),
                    author: format!("user{}", i % AUTHORS_MOD),
                    text,
                    created_at: base + Duration::seconds(i as i64),
                }
            })
            .collect();
        Self {
            seed,
            id_seq: AtomicU64::new(START_ID),
        }
    }
}

impl Default for FakePlatformClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformClient for FakePlatformClient {
    /// Pretends to post and returns a synthetic id like `tw-1001`.
    /// The account and text are ignored in this fake.
    async fn post_status(&self, _account_id: &str, _text: &str) -> Result<String> {
        let n = self.id_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("tw-{n}"))
    }

    /// Returns up to `count` seed posts. The account is ignored in this fake.
    async fn home_timeline(&self, _account_id: &str, count: usize) -> Result<Vec<Post>> {
        let n = count.min(self.seed.len());
        Ok(self.seed[..n].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timeline_returns_requested_count() {
        let client = FakePlatformClient::new();
        let posts = client.home_timeline("acct", 3).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].id, "seed-0");
        assert_eq!(posts[2].author, "user2");
    }

    #[tokio::test]
    async fn timeline_clamps_to_seed_size() {
        let client = FakePlatformClient::new();
        let posts = client.home_timeline("acct", 9999).await.unwrap();
        assert_eq!(posts.len(), SEED_SIZE);
    }

    #[tokio::test]
    async fn post_ids_are_unique_and_increasing() {
        let client = FakePlatformClient::new();
        let a = client.post_status("acct", "one").await.unwrap();
        let b = client.post_status("acct", "two").await.unwrap();
        assert_eq!(a, "tw-1001");
        assert_eq!(b, "tw-1002");
    }

    #[tokio::test]
    async fn every_fourth_seed_post_carries_a_hashtag() {
        let client = FakePlatformClient::new();
        let posts = client.home_timeline("acct", 8).await.unwrap();
        assert!(posts[0].text.contains("#rust"));
        assert!(!posts[1].text.contains('#'));
        assert!(posts[4].text.contains("#tokio"));
    }
}
