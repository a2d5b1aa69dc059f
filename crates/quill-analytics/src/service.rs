use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Timelike;
use quill_client::{PlatformClient, Post};
use serde::Serialize;
use tracing::debug;

/// How many timeline posts to roll up.
const DEFAULT_FETCH: usize = 100;
/// How many top hashtags to return by default.
const TOP_N: usize = 5;

/// Timeline roll-ups: hashtag frequencies, posting hours, summary.
pub struct AnalyticsService {
    client: Arc<dyn PlatformClient>,
}

/// Compact roll-up for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_posts: usize,
    pub top_hashtags: Vec<String>,
    /// Hour of day (0..=23) with the highest volume; −1 for an empty pool.
    pub best_hour_utc: i32,
}

impl AnalyticsService {
    pub fn new(client: Arc<dyn PlatformClient>) -> Self {
        Self { client }
    }

    /// Top `n` hashtags (lowercased), highest frequency first. Ties break on
    /// the lexicographically smaller tag so results are stable. `n` of zero
    /// means the default of 5.
    pub async fn top_hashtags(&self, account_id: &str, n: usize) -> Vec<String> {
        let take = if n == 0 { TOP_N } else { n };
        let pool = self.fetch_pool(account_id).await;

        let mut freq: HashMap<String, usize> = HashMap::new();
        for post in &pool {
            for token in post.text.split_whitespace() {
                if token.starts_with('#') && token.len() > 1 {
                    *freq.entry(token.to_lowercase()).or_insert(0) += 1;
                }
            }
        }

        let mut tags: Vec<(String, usize)> = freq.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        tags.into_iter().take(take).map(|(tag, _)| tag).collect()
    }

    /// Post counts per UTC hour of day, keyed 0..=23. Hours with no posts
    /// are absent.
    pub async fn posts_per_hour(&self, account_id: &str) -> BTreeMap<u32, usize> {
        let pool = self.fetch_pool(account_id).await;
        let mut by_hour = BTreeMap::new();
        for post in &pool {
            *by_hour.entry(post.created_at.hour()).or_insert(0) += 1;
        }
        by_hour
    }

    /// Roll-up summary. The best hour is the one with the most posts; ties
    /// resolve to the smaller hour.
    pub async fn summary(&self, account_id: &str) -> Summary {
        let pool = self.fetch_pool(account_id).await;
        let top = self.top_hashtags(account_id, TOP_N).await;

        let by_hour = self.posts_per_hour(account_id).await;
        let mut best_hour = -1i32;
        let mut best_count = 0usize;
        for (hour, count) in by_hour {
            if count > best_count {
                best_hour = hour as i32;
                best_count = count;
            }
        }

        Summary {
            total_posts: pool.len(),
            top_hashtags: top,
            best_hour_utc: best_hour,
        }
    }

    async fn fetch_pool(&self, account_id: &str) -> Vec<Post> {
        match self.client.home_timeline(account_id, DEFAULT_FETCH).await {
            Ok(posts) => posts,
            Err(e) => {
                debug!(account_id, error = %e, "timeline fetch failed, empty analytics pool");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use quill_client::ClientError;

    use super::*;

    struct StubClient {
        posts: Vec<Post>,
    }

    #[async_trait]
    impl PlatformClient for StubClient {
        async fn post_status(&self, _: &str, _: &str) -> quill_client::Result<String> {
            Ok("tw-0".into())
        }
        async fn home_timeline(&self, _: &str, count: usize) -> quill_client::Result<Vec<Post>> {
            Ok(self.posts.iter().take(count).cloned().collect())
        }
    }

    struct DownClient;

    #[async_trait]
    impl PlatformClient for DownClient {
        async fn post_status(&self, _: &str, _: &str) -> quill_client::Result<String> {
            Err(ClientError::Unavailable("down".into()))
        }
        async fn home_timeline(&self, _: &str, _: usize) -> quill_client::Result<Vec<Post>> {
            Err(ClientError::Unavailable("down".into()))
        }
    }

    fn post(text: &str, hour: u32) -> Post {
        Post {
            id: "p".into(),
            author: "user0".into(),
            text: text.into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
        }
    }

    fn service(posts: Vec<Post>) -> AnalyticsService {
        AnalyticsService::new(Arc::new(StubClient { posts }))
    }

    #[tokio::test]
    async fn hashtags_ranked_by_frequency() {
        let svc = service(vec![
            post("#rust every day", 9),
            post("more #rust and #tokio", 10),
            post("#Rust again", 11),
        ]);
        let tags = svc.top_hashtags("acct", 0).await;
        assert_eq!(tags, vec!["#rust", "#tokio"]);
    }

    #[tokio::test]
    async fn bare_hash_is_not_a_hashtag() {
        let svc = service(vec![post("just a # symbol", 9)]);
        assert!(svc.top_hashtags("acct", 0).await.is_empty());
    }

    #[tokio::test]
    async fn top_n_caps_the_list() {
        let svc = service(vec![post("#a #b #c #d", 9)]);
        assert_eq!(svc.top_hashtags("acct", 2).await.len(), 2);
    }

    #[tokio::test]
    async fn hours_are_bucketed() {
        let svc = service(vec![
            post("one", 9),
            post("two", 9),
            post("three", 17),
        ]);
        let hours = svc.posts_per_hour("acct").await;
        assert_eq!(hours.get(&9), Some(&2));
        assert_eq!(hours.get(&17), Some(&1));
        assert_eq!(hours.get(&3), None);
    }

    #[tokio::test]
    async fn summary_tie_breaks_on_smaller_hour() {
        let svc = service(vec![
            post("late", 17),
            post("early", 9),
            post("late again", 17),
            post("early again", 9),
        ]);
        let summary = svc.summary("acct").await;
        assert_eq!(summary.total_posts, 4);
        assert_eq!(summary.best_hour_utc, 9);
    }

    #[tokio::test]
    async fn empty_pool_yields_empty_summary() {
        let summary = AnalyticsService::new(Arc::new(DownClient)).summary("acct").await;
        assert_eq!(summary.total_posts, 0);
        assert!(summary.top_hashtags.is_empty());
        assert_eq!(summary.best_hour_utc, -1);
    }
}
