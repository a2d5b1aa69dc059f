//! `quill-analytics` — lightweight roll-ups over an account's timeline.
//!
//! Counts hashtags and posts-per-hour from a bounded timeline fetch. Like
//! search, analytics is a best-effort read: fetch failures degrade to empty
//! pools instead of erroring.

pub mod service;

pub use service::{AnalyticsService, Summary};
