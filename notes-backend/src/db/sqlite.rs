//! SQLite-backed note store
//!
//! One connection behind a mutex: every operation runs to completion before
//! the next one starts, which gives single-record atomicity without any
//! version checks.

use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, Result as SqliteResult};

use crate::models::NotePolicy;

pub struct Database {
    conn: Mutex<Connection>,
    policy: NotePolicy,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub fn new(database_url: &str, policy: NotePolicy) -> SqliteResult<Self> {
        let conn = Connection::open(database_url)?;
        Self::from_connection(conn, policy)
    }

    fn from_connection(conn: Connection, policy: NotePolicy) -> SqliteResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS notes (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL,
                pinned INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes(created_at DESC, seq DESC);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            policy,
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    pub fn policy(&self) -> &NotePolicy {
        &self.policy
    }
}

/// Current time at the precision timestamps are stored with
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so that text order matches time order
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}
