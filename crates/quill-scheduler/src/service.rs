use std::sync::Arc;

use chrono::{DateTime, Utc};
use quill_client::PlatformClient;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{Result, SchedulerError};
use crate::store::PostStore;
use crate::types::{NewPost, ScheduledPost};

/// Default maximum posts published per tick.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Coordinates scheduling and publishing of posts.
///
/// `schedule` validates and persists new pending posts; `publisher_tick`
/// publishes everything due "now". The tick is the sole writer of terminal
/// states. It is not reentrant: the runner guarantees one tick at a time,
/// and the store's pending-only transition guard backstops any second writer.
pub struct SchedulingService {
    store: Arc<dyn PostStore>,
    client: Arc<dyn PlatformClient>,
    clock: Arc<dyn Clock>,
    batch_size: usize,
}

impl SchedulingService {
    /// A `batch_size` of zero falls back to [`DEFAULT_BATCH_SIZE`].
    pub fn new(
        store: Arc<dyn PostStore>,
        client: Arc<dyn PlatformClient>,
        clock: Arc<dyn Clock>,
        batch_size: usize,
    ) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self {
            store,
            client,
            clock,
            batch_size,
        }
    }

    /// Validate inputs and persist a pending post.
    ///
    /// Returns the assigned id as a string so callers stay decoupled from
    /// the store's key type. Does not contact the platform.
    pub fn schedule(&self, text: &str, run_at: DateTime<Utc>, account_id: &str) -> Result<String> {
        if account_id.trim().is_empty() {
            return Err(SchedulerError::InvalidArgument(
                "accountId is required".into(),
            ));
        }
        if text.trim().is_empty() {
            return Err(SchedulerError::InvalidArgument("text is required".into()));
        }
        let now = self.clock.now();
        if run_at <= now {
            return Err(SchedulerError::InvalidArgument(
                "time must be in the future".into(),
            ));
        }

        let id = self.store.insert(
            &NewPost {
                account_id: account_id.to_string(),
                text: text.to_string(),
                run_at,
            },
            now,
        )?;
        info!(post_id = id, account_id, run_at = %run_at, "post scheduled");
        Ok(id.to_string())
    }

    /// Publish due pending posts and record their terminal states.
    ///
    /// Posts are processed sequentially in `run_at` order, at most
    /// `batch_size` per tick; the rest wait for the next tick. A publish
    /// failure marks that post `failed` and the loop continues. A store
    /// failure aborts the tick: rows already written keep their new state,
    /// unwritten rows stay `pending`.
    ///
    /// Returns the number of posts that reached `posted` in this pass.
    pub async fn publisher_tick(&self) -> Result<usize> {
        let now = self.clock.now();
        let due = self.store.find_due(now, self.batch_size)?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut posted = 0;
        for item in due {
            match self.client.post_status(&item.account_id, &item.text).await {
                Ok(platform_id) => {
                    if self.store.mark_posted(item.id, &platform_id, now)? {
                        info!(
                            post_id = item.id,
                            platform_post_id = %platform_id,
                            "post published"
                        );
                        posted += 1;
                    } else {
                        warn!(post_id = item.id, "post no longer pending, skipping");
                    }
                }
                Err(e) => {
                    warn!(post_id = item.id, error = %e, "publish failed");
                    self.store.mark_failed(item.id, now)?;
                }
            }
        }
        Ok(posted)
    }

    /// Status lookup for callers that kept the id from `schedule`.
    pub fn status(&self, id: i64) -> Result<Option<ScheduledPost>> {
        self.store.get(id)
    }
}
