//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::extract::VacancyRecord;
use crate::state::{PageKind, PageState};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::ExtractError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and ensures the schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Pages =====

    fn record_page(
        &mut self,
        run_id: i64,
        url: &str,
        kind: PageKind,
        state: PageState,
        status_code: Option<u16>,
        error_message: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO pages (run_id, url, kind, state, status_code, error_message, visited_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(run_id, url) DO UPDATE SET
                kind = excluded.kind,
                state = excluded.state,
                status_code = excluded.status_code,
                error_message = excluded.error_message,
                visited_at = excluded.visited_at",
            params![
                run_id,
                url,
                kind.to_db_string(),
                state.to_db_string(),
                status_code,
                error_message,
                now
            ],
        )?;
        Ok(())
    }

    fn get_page_state(&self, run_id: i64, url: &str) -> StorageResult<Option<PageState>> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM pages WHERE run_id = ?1 AND url = ?2",
                params![run_id, url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(state.as_deref().and_then(PageState::from_db_string))
    }

    // ===== Vacancies =====

    fn save_vacancy(&mut self, run_id: i64, record: &VacancyRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO vacancies (url, run_id, title, company, publication_date, record, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(url) DO UPDATE SET
                run_id = excluded.run_id,
                title = excluded.title,
                company = excluded.company,
                publication_date = excluded.publication_date,
                record = excluded.record,
                scraped_at = excluded.scraped_at",
            params![
                record.url,
                run_id,
                record.title,
                record.company,
                record.publication_date.to_string(),
                json,
                now
            ],
        )?;
        Ok(())
    }

    fn load_vacancies(&self) -> StorageResult<Vec<VacancyRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM vacancies ORDER BY publication_date DESC, id ASC")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for json in rows {
            records.push(serde_json::from_str(&json?)?);
        }
        Ok(records)
    }

    fn record_failure(&mut self, run_id: i64, error: &ExtractError) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO failures (run_id, url, field, message, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                error.url(),
                error.field().as_str(),
                error.to_string(),
                now
            ],
        )?;
        Ok(())
    }

    // ===== Statistics =====

    fn count_pages_by_state(&self, state: PageState) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE state = ?1",
            params![state.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_total_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_vacancies(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vacancies", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_failure_summary(&self) -> StorageResult<HashMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT field, COUNT(*) FROM failures GROUP BY field")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut summary = HashMap::new();
        for row in rows {
            let (field, count) = row?;
            summary.insert(field, count as u64);
        }
        Ok(summary)
    }
}
