//! `quill-scheduler` — deferred publication of posts, SQLite-backed.
//!
//! # Overview
//!
//! A caller schedules a post for a future instant; the post is persisted as a
//! `pending` row. A background [`runner::PublisherRunner`] invokes
//! [`service::SchedulingService::publisher_tick`] on a fixed cadence; each
//! tick selects due pending rows (oldest deadline first, bounded batch),
//! publishes them through the platform client and records the terminal
//! outcome per row.
//!
//! # Lifecycle
//!
//! | State     | Meaning                                            |
//! |-----------|----------------------------------------------------|
//! | `pending` | Recorded, waiting for its `run_at` instant         |
//! | `posted`  | Published; `platform_post_id` holds the platform id |
//! | `failed`  | Publish attempt failed; never retried              |
//!
//! Both `posted` and `failed` are terminal. A failed post stays failed:
//! there is no retry, backoff or re-queue in this subsystem.

pub mod clock;
pub mod db;
pub mod error;
pub mod runner;
pub mod service;
pub mod store;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, SchedulerError};
pub use runner::PublisherRunner;
pub use service::SchedulingService;
pub use store::{PostStore, SqlitePostStore};
pub use types::{NewPost, PostStatus, ScheduledPost};
