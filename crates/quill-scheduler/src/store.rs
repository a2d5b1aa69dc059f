use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::init_db;
use crate::error::Result;
use crate::types::{NewPost, PostStatus, ScheduledPost};

/// Durable store of scheduled posts.
///
/// The store owns timestamps and status writes are guarded: a transition only
/// happens while the row is still `pending`, so a second writer can never
/// double-publish a post. The [`crate::SchedulingService`] is the only
/// component that invokes the transition methods.
pub trait PostStore: Send + Sync {
    /// Insert a new `pending` row; returns the assigned id.
    fn insert(&self, new: &NewPost, now: DateTime<Utc>) -> Result<i64>;

    /// Pending rows with `run_at <= now`, ordered by `run_at` ascending,
    /// capped at `limit`.
    fn find_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ScheduledPost>>;

    /// Transition a row to `posted`, recording the platform id.
    ///
    /// Returns `false` (and writes nothing) when the row is no longer
    /// `pending`.
    fn mark_posted(&self, id: i64, platform_post_id: &str, now: DateTime<Utc>) -> Result<bool>;

    /// Transition a row to `failed`. Returns `false` when the row is no
    /// longer `pending`.
    fn mark_failed(&self, id: i64, now: DateTime<Utc>) -> Result<bool>;

    /// Look up a row by id.
    fn get(&self, id: i64) -> Result<Option<ScheduledPost>>;
}

/// SQLite-backed [`PostStore`].
pub struct SqlitePostStore {
    conn: Mutex<Connection>,
}

impl SqlitePostStore {
    /// Wrap a connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PostStore for SqlitePostStore {
    fn insert(&self, new: &NewPost, now: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO scheduled_posts
             (account_id, text, run_at, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'pending', ?4, ?4)",
            rusqlite::params![
                new.account_id,
                new.text,
                new.run_at.to_rfc3339(),
                now.to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn find_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ScheduledPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, account_id, text, run_at, status, platform_post_id,
                    created_at, updated_at
             FROM scheduled_posts
             WHERE status = 'pending' AND run_at <= ?1
             ORDER BY run_at ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(
            rusqlite::params![now.to_rfc3339(), limit as i64],
            row_to_post,
        )?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn mark_posted(&self, id: i64, platform_post_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE scheduled_posts
             SET status = 'posted', platform_post_id = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'pending'",
            rusqlite::params![id, platform_post_id, now.to_rfc3339()],
        )?;
        Ok(n > 0)
    }

    fn mark_failed(&self, id: i64, now: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE scheduled_posts
             SET status = 'failed', updated_at = ?2
             WHERE id = ?1 AND status = 'pending'",
            rusqlite::params![id, now.to_rfc3339()],
        )?;
        Ok(n > 0)
    }

    fn get(&self, id: i64) -> Result<Option<ScheduledPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, account_id, text, run_at, status, platform_post_id,
                    created_at, updated_at
             FROM scheduled_posts WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id], row_to_post)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduledPost> {
    let run_at: String = row.get(3)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;
    Ok(ScheduledPost {
        id: row.get(0)?,
        account_id: row.get(1)?,
        text: row.get(2)?,
        run_at: parse_ts(3, &run_at)?,
        status: PostStatus::from_str(&status).map_err(|e| conversion_err(4, e))?,
        platform_post_id: row.get(5)?,
        created_at: parse_ts(6, &created_at)?,
        updated_at: parse_ts(7, &updated_at)?,
    })
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e.to_string()))
}

fn conversion_err(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}
