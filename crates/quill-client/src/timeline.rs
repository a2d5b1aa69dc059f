use std::sync::Arc;

use quill_core::Post;
use tracing::debug;

use crate::{PlatformClient, Result};

/// Minimum number of posts a timeline read returns.
const MIN_COUNT: usize = 1;
/// Maximum number of posts a timeline read returns.
const MAX_COUNT: usize = 50;

/// Read-side wrapper for home timelines.
///
/// Clamps the requested count to `1..=50` before hitting the client so a
/// careless caller cannot drag the whole seed through the wire.
pub struct TimelineService {
    client: Arc<dyn PlatformClient>,
}

impl TimelineService {
    pub fn new(client: Arc<dyn PlatformClient>) -> Self {
        Self { client }
    }

    /// Return the home timeline for an account, count clamped to `1..=50`.
    pub async fn home_timeline(&self, account_id: &str, count: usize) -> Result<Vec<Post>> {
        let n = count.clamp(MIN_COUNT, MAX_COUNT);
        debug!(account_id, requested = count, clamped = n, "timeline read");
        self.client.home_timeline(account_id, n).await
    }
}
