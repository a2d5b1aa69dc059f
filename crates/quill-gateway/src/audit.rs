use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;

/// Error messages longer than this are truncated before storage.
const MAX_ERR_MSG: usize = 500;

/// Initialise the audit schema in `conn`. Safe to call on every startup
/// (idempotent).
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tool_call_audit (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            method      TEXT    NOT NULL,
            tool        TEXT,
            account_id  TEXT,
            ok          INTEGER NOT NULL,
            duration_ms INTEGER NOT NULL,
            err_code    INTEGER,
            err_msg     TEXT,
            called_at   TEXT    NOT NULL
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_audit_tool
            ON tool_call_audit (tool, called_at DESC);
        ",
    )
}

/// Append-only log of tool invocations.
///
/// Written by the dispatcher on every `tools/call`; a failed write is the
/// caller's problem to log, never to propagate — auditing must not fail a
/// request.
pub struct AuditLog {
    conn: Mutex<Connection>,
}

impl AuditLog {
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store one audit row.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        method: &str,
        tool: Option<&str>,
        account_id: Option<&str>,
        ok: bool,
        duration_ms: u64,
        err_code: Option<i64>,
        err_msg: Option<&str>,
    ) -> rusqlite::Result<()> {
        let truncated = err_msg.map(|m| {
            if m.len() > MAX_ERR_MSG {
                let mut end = MAX_ERR_MSG;
                while !m.is_char_boundary(end) {
                    end -= 1;
                }
                &m[..end]
            } else {
                m
            }
        });
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tool_call_audit
             (method, tool, account_id, ok, duration_ms, err_code, err_msg, called_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                method,
                tool,
                account_id,
                ok as i64,
                duration_ms as i64,
                err_code,
                truncated,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Total number of audit rows (used by tests and ops queries).
    pub fn count(&self) -> rusqlite::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM tool_call_audit", [], |row| row.get(0))
    }
}
