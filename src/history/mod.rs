//! SQLite persistence for export history.
//!
//! Every export can be recorded with its format, target provider, options,
//! and size, so earlier artifacts can be listed and retrieved later.
//! Stored content is capped; oversized artifacts are truncated with a
//! marker, while the recorded size always reflects the full artifact.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::export::{export_size, CompressionLevel, ExportFormat, ExportOptions, TargetProvider};

/// Maximum stored artifact content, in bytes.
const MAX_STORED_CONTENT_BYTES: usize = 50_000;

/// Marker appended to truncated stored content.
const TRUNCATION_MARKER: &str = "...[truncated]";

/// Errors that can occur in the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create history directory: {0}")]
    CreateDir(std::io::Error),

    #[error("invalid export id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid stored format: {0}")]
    InvalidFormat(String),

    #[error("invalid stored options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Option set recorded alongside an export, in the artifact's own wire
/// casing so stored rows stay readable as plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordedOptions {
    pub compression_level: CompressionLevel,
    pub include_metadata: bool,
    pub conversation_count: usize,
}

/// A persisted export artifact with its full (possibly truncated) content.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub id: Uuid,
    pub project_name: String,
    pub format: ExportFormat,
    pub target_provider: TargetProvider,
    pub content: String,
    pub options: RecordedOptions,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

/// A history listing entry; everything but the content.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub id: Uuid,
    pub project_name: String,
    pub format: ExportFormat,
    pub target_provider: TargetProvider,
    pub options: RecordedOptions,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

impl ExportRecord {
    /// Build a record for a freshly produced artifact.
    ///
    /// The recorded size is the full artifact's byte length even when the
    /// stored content gets truncated.
    pub fn new(
        project_name: impl Into<String>,
        format: ExportFormat,
        options: &ExportOptions,
        conversation_count: usize,
        content: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_name: project_name.into(),
            format,
            target_provider: options.target_provider,
            content: truncate_content(content),
            options: RecordedOptions {
                compression_level: options.compression_level,
                include_metadata: options.include_metadata,
                conversation_count,
            },
            size_bytes: export_size(content),
            created_at: Utc::now(),
        }
    }
}

/// Truncate stored content at a char boundary, appending a marker.
fn truncate_content(content: &str) -> String {
    if content.len() <= MAX_STORED_CONTENT_BYTES {
        return content.to_string();
    }

    let mut end = MAX_STORED_CONTENT_BYTES;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &content[..end], TRUNCATION_MARKER)
}

/// Handle to the export history database.
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open or create the history database at the default location
    /// (~/.local/share/handoff/history.db).
    pub fn open_default() -> Result<Self, HistoryError> {
        Self::open(&default_db_path())
    }

    /// Open or create a history database at the given path.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(HistoryError::CreateDir)?;
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> Result<(), HistoryError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS exports (
                id TEXT PRIMARY KEY,
                project_name TEXT NOT NULL,
                format TEXT NOT NULL,
                target_provider TEXT NOT NULL,
                content TEXT NOT NULL,
                options TEXT NOT NULL DEFAULT '{}',
                size_bytes INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_exports_created_at
                ON exports(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Insert a new export record.
    pub fn insert(&self, record: &ExportRecord) -> Result<(), HistoryError> {
        let options = serde_json::to_string(&record.options)?;
        self.conn.execute(
            r#"
            INSERT INTO exports (id, project_name, format, target_provider, content, options, size_bytes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id.to_string(),
                record.project_name,
                record.format.as_str(),
                record.target_provider.as_str(),
                record.content,
                options,
                record.size_bytes as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a record by id.
    pub fn get(&self, id: Uuid) -> Result<Option<ExportRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, project_name, format, target_provider, content, options, size_bytes, created_at
            FROM exports
            WHERE id = ?1
            "#,
        )?;

        let row_data: Option<ExportRowData> = stmt
            .query_row(params![id.to_string()], ExportRowData::from_row)
            .optional()?;

        match row_data {
            Some(data) => Ok(Some(data.into_record()?)),
            None => Ok(None),
        }
    }

    /// List records newest-first, without content.
    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<ExportSummary>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, project_name, format, target_provider, '', options, size_bytes, created_at
            FROM exports
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let mut rows = stmt.query(params![limit as i64, offset as i64])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let record = ExportRowData::from_row(row)?.into_record()?;
            summaries.push(ExportSummary {
                id: record.id,
                project_name: record.project_name,
                format: record.format,
                target_provider: record.target_provider,
                options: record.options,
                size_bytes: record.size_bytes,
                created_at: record.created_at,
            });
        }

        Ok(summaries)
    }

    /// Delete a record. Returns whether a record was removed.
    pub fn delete(&self, id: Uuid) -> Result<bool, HistoryError> {
        let deleted = self.conn.execute(
            "DELETE FROM exports WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }
}

/// The default history database path.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handoff")
        .join("history.db")
}

/// Raw row data, extracted before conversion so rusqlite's error type
/// stays out of the public API.
struct ExportRowData {
    id: String,
    project_name: String,
    format: String,
    target_provider: String,
    content: String,
    options: String,
    size_bytes: i64,
    created_at: String,
}

impl ExportRowData {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            project_name: row.get(1)?,
            format: row.get(2)?,
            target_provider: row.get(3)?,
            content: row.get(4)?,
            options: row.get(5)?,
            size_bytes: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<ExportRecord, HistoryError> {
        let id: Uuid = self.id.parse()?;
        let format: ExportFormat = self
            .format
            .parse()
            .map_err(|_| HistoryError::InvalidFormat(self.format.clone()))?;
        let target_provider = TargetProvider::parse_lossy(&self.target_provider);
        let options: RecordedOptions = serde_json::from_str(&self.options)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| HistoryError::InvalidTimestamp(e.to_string()))?
            .with_timezone(&Utc);

        Ok(ExportRecord {
            id,
            project_name: self.project_name,
            format,
            target_provider,
            content: self.content,
            options,
            size_bytes: self.size_bytes as usize,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{CompressionLevel, TargetProvider};
    use chrono::Duration;

    fn test_record(project_name: &str, content: &str) -> ExportRecord {
        ExportRecord::new(
            project_name,
            ExportFormat::Markdown,
            &ExportOptions::default(),
            1,
            content,
        )
    }

    #[test]
    fn test_open_in_memory() {
        let db = HistoryDb::open_in_memory().expect("failed to open in-memory database");
        assert!(db.list(10, 0).unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let db = HistoryDb::open_in_memory().unwrap();
        let record = test_record("Research", "# Research\n");

        db.insert(&record).unwrap();

        let retrieved = db.get(record.id).unwrap().unwrap();
        assert_eq!(retrieved.project_name, "Research");
        assert_eq!(retrieved.format, ExportFormat::Markdown);
        assert_eq!(retrieved.target_provider, TargetProvider::Generic);
        assert_eq!(retrieved.content, "# Research\n");
        assert_eq!(retrieved.size_bytes, "# Research\n".len());
        assert_eq!(retrieved.options.compression_level, CompressionLevel::Medium);
        assert!(retrieved.options.include_metadata);
        assert_eq!(retrieved.options.conversation_count, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let db = HistoryDb::open_in_memory().unwrap();
        assert!(db.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_content_truncated_but_size_preserved() {
        let db = HistoryDb::open_in_memory().unwrap();
        let big = "x".repeat(MAX_STORED_CONTENT_BYTES + 500);
        let record = test_record("Big", &big);

        assert!(record.content.ends_with(TRUNCATION_MARKER));
        assert_eq!(record.size_bytes, big.len());

        db.insert(&record).unwrap();
        let retrieved = db.get(record.id).unwrap().unwrap();
        assert!(retrieved.content.ends_with(TRUNCATION_MARKER));
        assert_eq!(retrieved.size_bytes, big.len());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 4-byte scalar values; the cap lands mid-character.
        let big = "\u{1F680}".repeat(MAX_STORED_CONTENT_BYTES / 4 + 10);
        let truncated = truncate_content(&big);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.len() <= MAX_STORED_CONTENT_BYTES + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_small_content_not_truncated() {
        assert_eq!(truncate_content("short"), "short");
    }

    #[test]
    fn test_list_newest_first_with_paging() {
        let db = HistoryDb::open_in_memory().unwrap();

        let mut first = test_record("first", "a");
        let mut second = test_record("second", "b");
        let mut third = test_record("third", "c");
        let base = Utc::now();
        first.created_at = base - Duration::minutes(2);
        second.created_at = base - Duration::minutes(1);
        third.created_at = base;

        db.insert(&first).unwrap();
        db.insert(&second).unwrap();
        db.insert(&third).unwrap();

        let all = db.list(10, 0).unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);

        let page = db.list(1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].project_name, "second");
    }

    #[test]
    fn test_delete() {
        let db = HistoryDb::open_in_memory().unwrap();
        let record = test_record("gone", "content");

        db.insert(&record).unwrap();
        assert!(db.delete(record.id).unwrap());
        assert!(db.get(record.id).unwrap().is_none());
        assert!(!db.delete(record.id).unwrap());
    }

    #[test]
    fn test_options_roundtrip_through_storage() {
        let db = HistoryDb::open_in_memory().unwrap();
        let options = ExportOptions {
            target_provider: TargetProvider::Anthropic,
            compression_level: CompressionLevel::High,
            include_metadata: false,
        };
        let record = ExportRecord::new("opts", ExportFormat::ContextPrompt, &options, 3, "body");

        db.insert(&record).unwrap();
        let retrieved = db.get(record.id).unwrap().unwrap();

        assert_eq!(retrieved.format, ExportFormat::ContextPrompt);
        assert_eq!(retrieved.target_provider, TargetProvider::Anthropic);
        assert_eq!(retrieved.options.compression_level, CompressionLevel::High);
        assert!(!retrieved.options.include_metadata);
        assert_eq!(retrieved.options.conversation_count, 3);
    }

    #[test]
    fn test_default_db_path() {
        let path = default_db_path();
        assert!(path.ends_with("handoff/history.db"));
    }

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("history.db");

        let db = HistoryDb::open(&db_path).unwrap();
        assert!(db_path.parent().unwrap().exists());

        db.insert(&test_record("persisted", "x")).unwrap();
        assert_eq!(db.list(10, 0).unwrap().len(), 1);
    }
}
