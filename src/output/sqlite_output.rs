//! SQLite ledger manifest
//!
//! This module records the outcome of every mirrored URL, together with the
//! run that produced it, in a SQLite database. Later runs update the rows of
//! URLs they mirror again.

use crate::output::traits::{CrawlSummary, OutputResult, ReportWriter};
use crate::state::PageState;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the manifest
pub const SCHEMA_SQL: &str = r#"
-- Track mirror runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    site_root TEXT NOT NULL,
    config_hash TEXT NOT NULL
);

-- Latest outcome per canonical URL
CREATE TABLE IF NOT EXISTS pages (
    url TEXT PRIMARY KEY,
    local_path TEXT NOT NULL,
    state TEXT NOT NULL,
    written INTEGER NOT NULL,
    run_id INTEGER NOT NULL REFERENCES runs(id)
);

CREATE INDEX IF NOT EXISTS idx_pages_state ON pages(state);
"#;

/// Writes crawl summaries into a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteManifest {
    path: PathBuf,
}

impl SqliteManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> OutputResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(conn)
    }

    /// Reads back the recorded state of every URL, sorted by URL
    pub fn load_states(&self) -> OutputResult<Vec<(String, PageState)>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT url, state FROM pages ORDER BY url")?;

        let rows = stmt.query_map([], |row| {
            let url: String = row.get(0)?;
            let state: String = row.get(1)?;
            Ok((url, state))
        })?;

        let mut states = Vec::new();
        for row in rows {
            let (url, state) = row?;
            match PageState::from_db_string(&state) {
                Some(state) => states.push((url, state)),
                None => tracing::warn!("Unknown state '{}' for {} in manifest", state, url),
            }
        }
        Ok(states)
    }
}

impl ReportWriter for SqliteManifest {
    fn write_report(&self, summary: &CrawlSummary) -> OutputResult<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (started_at, finished_at, site_root, config_hash) VALUES (?1, ?2, ?3, ?4)",
            params![
                summary.started_at,
                summary.finished_at,
                summary.site_root,
                summary.config_hash
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (url, local_path, state, written, run_id) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(url) DO UPDATE SET
                     local_path = excluded.local_path,
                     state = excluded.state,
                     written = excluded.written,
                     run_id = excluded.run_id",
            )?;

            for page in &summary.pages {
                stmt.execute(params![
                    page.url,
                    page.local_path,
                    page.state.to_db_string(),
                    page.written(),
                    run_id
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Recorded {} URLs for run {} in {}",
            summary.pages.len(),
            run_id,
            self.path.display()
        );
        Ok(())
    }
}

/// Initializes the manifest schema
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Opens a manifest database at `path`
pub fn open_manifest(path: &Path) -> OutputResult<Connection> {
    SqliteManifest::new(path).open()
}
