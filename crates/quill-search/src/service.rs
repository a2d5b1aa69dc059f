use std::sync::Arc;

use chrono::{DateTime, Utc};
use quill_client::{PlatformClient, Post};
use tracing::debug;

use crate::query::{Clause, SearchQuery};

/// How many timeline posts to scan per search.
const TIMELINE_POOL: usize = 200;
/// Default page size.
const DEFAULT_LIMIT: usize = 20;
/// Hard upper bound for the page size.
const MAX_LIMIT: usize = 100;

/// Keyword / phrase / hashtag search over an account's timeline.
pub struct SearchService {
    client: Arc<dyn PlatformClient>,
}

impl SearchService {
    pub fn new(client: Arc<dyn PlatformClient>) -> Self {
        Self { client }
    }

    /// Search with AND/OR and phrase support.
    ///
    /// Ranking: token match score first (phrases count double), then
    /// recency (newer first). `limit` of zero means the default page size;
    /// larger values are capped.
    pub async fn search(
        &self,
        account_id: &str,
        raw_query: &str,
        offset: usize,
        limit: usize,
    ) -> Vec<Post> {
        let lim = clamp_limit(limit);
        let parsed = SearchQuery::parse(raw_query);
        if parsed.is_empty() {
            return Vec::new();
        }

        let pool = self.fetch_pool(account_id).await;
        let newest = pool
            .iter()
            .map(|p| p.created_at)
            .max()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut matches: Vec<Scored> = pool
            .into_iter()
            .filter_map(|post| {
                let score = score_post(&post, &parsed);
                if score == 0 {
                    return None;
                }
                let recency = (newest - post.created_at).num_milliseconds();
                Some(Scored {
                    post,
                    score,
                    recency,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.recency.cmp(&b.recency)));

        matches
            .into_iter()
            .skip(offset)
            .take(lim)
            .map(|s| s.post)
            .collect()
    }

    /// Hashtag search: exact case-insensitive match on a `#tag` token.
    /// Input without a leading `#` yields no results.
    pub async fn hashtag(&self, account_id: &str, hashtag: &str, limit: usize) -> Vec<Post> {
        let needle = hashtag.trim().to_lowercase();
        if !needle.starts_with('#') {
            return Vec::new();
        }
        let lim = clamp_limit(limit);

        let pool = self.fetch_pool(account_id).await;
        pool.into_iter()
            .filter(|post| {
                post.text
                    .to_lowercase()
                    .split_whitespace()
                    .any(|tok| tok == needle)
            })
            .take(lim)
            .collect()
    }

    async fn fetch_pool(&self, account_id: &str) -> Vec<Post> {
        match self.client.home_timeline(account_id, TIMELINE_POOL).await {
            Ok(posts) => posts,
            Err(e) => {
                debug!(account_id, error = %e, "timeline fetch failed, empty search pool");
                Vec::new()
            }
        }
    }
}

fn clamp_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    }
}

/// Best clause score for a post; zero means no clause matched.
fn score_post(post: &Post, query: &SearchQuery) -> usize {
    let text = post.text.to_lowercase();
    query
        .clauses
        .iter()
        .map(|c| score_clause(&text, c))
        .max()
        .unwrap_or(0)
}

/// Score a single AND-clause; phrases count double. Zero when any required
/// term or phrase is missing.
fn score_clause(text: &str, clause: &Clause) -> usize {
    for term in &clause.terms {
        if !text.contains(term.as_str()) {
            return 0;
        }
    }
    for phrase in &clause.phrases {
        if !text.contains(phrase.as_str()) {
            return 0;
        }
    }
    clause.terms.len() + clause.phrases.len() * 2
}

struct Scored {
    post: Post,
    score: usize,
    recency: i64,
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;
    use quill_client::{ClientError, FakePlatformClient};

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

    fn post(id: &str, text: &str, minute: u32) -> Post {
        Post {
            id: id.into(),
            author: "user0".into(),
            text: text.into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, minute, 0).unwrap(),
        }
    }

    fn service(posts: Vec<Post>) -> SearchService {
        SearchService::new(Arc::new(StubClient { posts }))
    }

    #[tokio::test]
    async fn all_clause_terms_are_required() {
        let svc = service(vec![
            post("a", "rust is fast", 0),
            post("b", "rust and tokio are fast", 1),
        ]);
        let hits = svc.search("acct", "rust tokio", 0, 0).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[tokio::test]
    async fn phrases_rank_above_single_terms() {
        let svc = service(vec![
            post("term", "seed somewhere post apart", 5),
            post("phrase", "a seed post together", 0),
        ]);
        let hits = svc.search("acct", r#"seed OR "seed post""#, 0, 0).await;
        // Phrase match scores 2, bare term scores 1.
        assert_eq!(hits[0].id, "phrase");
        assert_eq!(hits[1].id, "term");
    }

    #[tokio::test]
    async fn equal_scores_order_newest_first() {
        let svc = service(vec![
            post("old", "rust one", 0),
            post("new", "rust two", 30),
        ]);
        let hits = svc.search("acct", "rust", 0, 0).await;
        assert_eq!(hits[0].id, "new");
        assert_eq!(hits[1].id, "old");
    }

    #[tokio::test]
    async fn or_matches_either_clause() {
        let svc = service(vec![
            post("a", "cats are great", 0),
            post("b", "dogs are great", 1),
            post("c", "birds are great", 2),
        ]);
        let hits = svc.search("acct", "cats OR dogs", 0, 0).await;
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn offset_and_limit_page_through_results() {
        let posts = (0..10u32).map(|i| post(&format!("p{i}"), "rust", i)).collect();
        let svc = service(posts);

        let page = svc.search("acct", "rust", 2, 3).await;
        assert_eq!(page.len(), 3);
        // Newest first: p9, p8, ... so offset 2 starts at p7.
        assert_eq!(page[0].id, "p7");
    }

    #[tokio::test]
    async fn blank_query_matches_nothing() {
        let svc = service(vec![post("a", "anything", 0)]);
        assert!(svc.search("acct", "  ", 0, 0).await.is_empty());
    }

    #[tokio::test]
    async fn client_failure_degrades_to_empty() {
        let svc = SearchService::new(Arc::new(DownClient));
        assert!(svc.search("acct", "rust", 0, 0).await.is_empty());
        assert!(svc.hashtag("acct", "#rust", 0).await.is_empty());
    }

    #[tokio::test]
    async fn hashtag_matches_exact_token_only() {
        let svc = service(vec![
            post("tagged", "shipping #Rust today", 0),
            post("partial", "rustacean life", 1),
            post("embedded", "no#rust here", 2),
        ]);
        let hits = svc.hashtag("acct", "#rust", 0).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "tagged");
    }

    #[tokio::test]
    async fn hashtag_requires_leading_hash() {
        let svc = service(vec![post("a", "#rust", 0)]);
        assert!(svc.hashtag("acct", "rust", 0).await.is_empty());
    }

    #[tokio::test]
    async fn seed_timeline_search_finds_tagged_posts() {
        let svc = SearchService::new(Arc::new(FakePlatformClient::new()));
        let hits = svc.hashtag("acct", "#rust", 100).await;
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|p| p.text.contains("#rust")));
    }
}
