use rusqlite::Connection;

use crate::error::Result;

/// Initialise the scheduler schema in `conn`. Safe to call on every startup
/// (idempotent).
///
/// The composite index mirrors the publisher scan
/// (`WHERE status = 'pending' AND run_at <= ? ORDER BY run_at`); the account
/// index serves per-account listings.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS scheduled_posts (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id        TEXT    NOT NULL,
            text              TEXT    NOT NULL,
            run_at            TEXT    NOT NULL,   -- RFC 3339, UTC
            status            TEXT    NOT NULL DEFAULT 'pending',
            platform_post_id  TEXT,               -- set when status = 'posted'
            created_at        TEXT    NOT NULL,
            updated_at        TEXT    NOT NULL
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_scheduled_status_runat
            ON scheduled_posts (status, run_at);
        CREATE INDEX IF NOT EXISTS idx_scheduled_account
            ON scheduled_posts (account_id);
        ",
    )?;
    Ok(())
}
