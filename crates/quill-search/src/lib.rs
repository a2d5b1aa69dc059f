//! `quill-search` — keyword and hashtag search over the timeline pool.
//!
//! Queries support AND within a clause (bare terms and quoted phrases) and
//! OR across clauses (the literal token `OR`). Matches are ranked by score
//! (phrases count double) and then by recency. The pool is fetched from the
//! platform client; fetch failures degrade to empty results rather than
//! erroring, since search is a best-effort read.

pub mod query;
pub mod service;

pub use query::SearchQuery;
pub use service::SearchService;
