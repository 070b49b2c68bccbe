use std::fs;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{CallRecord, Case, DailySummary, Message, MessageAnalysis, NewCall, NewCase, NewMessage};
use crate::schema::{calls, cases, daily_summary, message_analysis, messages};

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create_cases",
        include_str!("../migrations/2026-01-10-000000_create_cases/up.sql"),
    ),
    (
        "create_analysis",
        include_str!("../migrations/2026-01-10-000001_create_analysis/up.sql"),
    ),
];

/// A date-range slice of a case's messages with context on both sides.
///
/// `messages` is timestamp ordered; only `core` belongs to the chunk, the rest
/// is padding that serves as context for the messages at the edges.
#[derive(Debug, Clone, Default)]
pub struct MessageChunk {
    /// Padding, core and padding, in timestamp order
    pub messages: Vec<Message>,
    /// Indices of the messages dated inside the chunk
    pub core: Range<usize>,
}

/// Database manager for handling connections and operations
pub struct Database {
    pool: DbPool,
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_column<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let idx = row.as_ref().column_index(column)?;
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn json_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Vec<String>> {
    let idx = row.as_ref().column_index(column)?;
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn analysis_columns() -> String {
    [
        message_analysis::MESSAGE_ID,
        message_analysis::CASE_ID,
        message_analysis::IS_HURTFUL,
        message_analysis::SEVERITY,
        message_analysis::IS_APOLOGY,
        message_analysis::SENTIMENT_SCORE,
        message_analysis::PATTERNS,
        message_analysis::KEYWORDS,
        message_analysis::SUPPORTIVE,
    ]
    .join(", ")
}

fn summary_columns() -> String {
    [
        daily_summary::CASE_ID,
        daily_summary::DATE,
        daily_summary::MSG_COUNT,
        daily_summary::AVG_SENTIMENT,
        daily_summary::HURTFUL_COUNT,
        daily_summary::PATTERNS_COUNT,
    ]
    .join(", ")
}

impl Database {
    /// Open (or create) a database with default pool settings
    pub fn new(database_url: &str) -> Result<Self> {
        Self::open(&DatabaseConfig {
            url: database_url.to_string(),
            ..DatabaseConfig::default()
        })
    }

    /// Open (or create) the database described by `config` and run migrations
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = config.url.strip_prefix("sqlite:").unwrap_or(&config.url);

        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let busy_timeout = Duration::from_secs(config.busy_timeout_secs);
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
            conn.busy_timeout(busy_timeout)
        });
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)?;

        // Run migrations
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        info!(path, "Database ready");

        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        for (name, sql) in MIGRATIONS {
            conn.execute_batch(sql).map_err(|e| {
                AnalysisError::Other(format!("Failed to run migration {name}: {e}"))
            })?;
            debug!(migration = name, "Applied migration");
        }
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Create a case
    pub fn create_case(&self, new_case: &NewCase) -> Result<Case> {
        let conn = self.get_connection()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?)",
                cases::TABLE,
                cases::NAME,
                cases::USER_LABEL,
                cases::CONTACT_LABEL,
                cases::START_DATE,
                cases::END_DATE
            ),
            params![
                new_case.name,
                new_case.user_label,
                new_case.contact_label,
                new_case.start_date,
                new_case.end_date
            ],
        )?;

        Ok(Case {
            id: conn.last_insert_rowid(),
            name: new_case.name.clone(),
            user_label: new_case.user_label.clone(),
            contact_label: new_case.contact_label.clone(),
            start_date: new_case.start_date,
            end_date: new_case.end_date,
        })
    }

    /// Get a case by ID
    pub fn get_case(&self, case_id: i64) -> Result<Option<Case>> {
        let conn = self.get_connection()?;
        let case = conn
            .query_row(
                &format!("SELECT * FROM {} WHERE {} = ?", cases::TABLE, cases::ID),
                params![case_id],
                Self::map_case,
            )
            .optional()?;
        Ok(case)
    }

    /// Get a case by ID, failing with `CaseNotFound`
    pub fn require_case(&self, case_id: i64) -> Result<Case> {
        self.get_case(case_id)?
            .ok_or(AnalysisError::CaseNotFound(case_id))
    }

    /// All cases, oldest first
    pub fn list_cases(&self) -> Result<Vec<Case>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {}",
            cases::TABLE,
            cases::ID
        ))?;
        let rows = stmt.query_map([], Self::map_case)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete a case and, by cascade, everything it owns
    pub fn delete_case(&self, case_id: i64) -> Result<bool> {
        let conn = self.get_connection()?;
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?", cases::TABLE, cases::ID),
            params![case_id],
        )?;
        Ok(deleted > 0)
    }

    /// Insert messages in one transaction; returns the number stored
    pub fn add_messages(&self, batch: &[NewMessage]) -> Result<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                messages::TABLE,
                messages::CASE_ID,
                messages::TIMESTAMP,
                messages::DATE,
                messages::TIME,
                messages::SOURCE,
                messages::DIRECTION,
                messages::BODY,
                messages::MEDIA_TYPE,
                messages::DURATION
            ))?;
            for message in batch {
                stmt.execute(params![
                    message.case_id,
                    message.timestamp,
                    message.date,
                    message.time,
                    message.source,
                    message.direction.as_str(),
                    message.body,
                    message.media_type.as_str(),
                    message.duration
                ])?;
            }
        }
        tx.commit()?;
        Ok(batch.len())
    }

    /// Insert call-log entries in one transaction; returns the number stored
    pub fn add_calls(&self, batch: &[NewCall]) -> Result<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                calls::TABLE,
                calls::CASE_ID,
                calls::TIMESTAMP,
                calls::DATE,
                calls::TIME,
                calls::SOURCE,
                calls::DIRECTION,
                calls::DURATION,
                calls::STATUS
            ))?;
            for call in batch {
                stmt.execute(params![
                    call.case_id,
                    call.timestamp,
                    call.date,
                    call.time,
                    call.source,
                    call.direction.as_str(),
                    call.duration,
                    call.status.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(batch.len())
    }

    /// All messages of a case in timestamp order
    pub fn messages_for_case(&self, case_id: i64) -> Result<Vec<Message>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = ? ORDER BY {}, {}",
            messages::TABLE,
            messages::CASE_ID,
            messages::TIMESTAMP,
            messages::ID
        ))?;
        let rows = stmt.query_map(params![case_id], Self::map_message)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All calls of a case in timestamp order
    pub fn calls_for_case(&self, case_id: i64) -> Result<Vec<CallRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = ? ORDER BY {}, {}",
            calls::TABLE,
            calls::CASE_ID,
            calls::TIMESTAMP,
            calls::ID
        ))?;
        let rows = stmt.query_map(params![case_id], Self::map_call)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Distinct message dates of a case, ascending
    pub fn message_dates(&self, case_id: i64) -> Result<Vec<NaiveDate>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {} FROM {} WHERE {} = ? ORDER BY {}",
            messages::DATE,
            messages::TABLE,
            messages::CASE_ID,
            messages::DATE
        ))?;
        let rows = stmt.query_map(params![case_id], |row| row.get::<_, NaiveDate>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Load messages dated `start..=end` plus up to `padding` neighbors on each side
    pub fn load_chunk(
        &self,
        case_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        padding: usize,
    ) -> Result<MessageChunk> {
        let conn = self.get_connection()?;
        let limit = i64::try_from(padding).unwrap_or(i64::MAX);

        let query = |sql: String, params: &[&dyn rusqlite::ToSql]| -> Result<Vec<Message>> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params, Self::map_message)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        };

        let mut before = query(
            format!(
                "SELECT * FROM {t} WHERE {c} = ? AND {d} < ? ORDER BY {ts} DESC, {id} DESC LIMIT ?",
                t = messages::TABLE,
                c = messages::CASE_ID,
                d = messages::DATE,
                ts = messages::TIMESTAMP,
                id = messages::ID
            ),
            params![case_id, start, limit],
        )?;
        before.reverse();

        let core = query(
            format!(
                "SELECT * FROM {t} WHERE {c} = ? AND {d} >= ? AND {d} <= ? ORDER BY {ts}, {id}",
                t = messages::TABLE,
                c = messages::CASE_ID,
                d = messages::DATE,
                ts = messages::TIMESTAMP,
                id = messages::ID
            ),
            params![case_id, start, end],
        )?;

        let after = query(
            format!(
                "SELECT * FROM {t} WHERE {c} = ? AND {d} > ? ORDER BY {ts}, {id} LIMIT ?",
                t = messages::TABLE,
                c = messages::CASE_ID,
                d = messages::DATE,
                ts = messages::TIMESTAMP,
                id = messages::ID
            ),
            params![case_id, end, limit],
        )?;

        let core_range = before.len()..before.len() + core.len();
        let mut messages = before;
        messages.extend(core);
        messages.extend(after);

        Ok(MessageChunk {
            messages,
            core: core_range,
        })
    }

    /// Remove any staged rows for a case
    pub fn discard_shadow(&self, case_id: i64) -> Result<()> {
        let conn = self.get_connection()?;
        Self::clear_shadow(&conn, case_id)
    }

    fn clear_shadow(conn: &Connection, case_id: i64) -> Result<()> {
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?",
                message_analysis::SHADOW,
                message_analysis::CASE_ID
            ),
            params![case_id],
        )?;
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?",
                daily_summary::SHADOW,
                daily_summary::CASE_ID
            ),
            params![case_id],
        )?;
        Ok(())
    }

    /// Stage one chunk of analyses and summaries in the shadow tables
    pub fn stage_chunk(
        &self,
        case_id: i64,
        analyses: &[MessageAnalysis],
        summaries: &[DailySummary],
    ) -> Result<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        Self::insert_analyses(&tx, message_analysis::SHADOW, case_id, analyses)?;
        Self::insert_summaries(&tx, daily_summary::SHADOW, summaries)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_analyses(
        tx: &Transaction<'_>,
        table: &str,
        case_id: i64,
        analyses: &[MessageAnalysis],
    ) -> Result<()> {
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT OR REPLACE INTO {table} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            analysis_columns()
        ))?;
        for analysis in analyses {
            stmt.execute(params![
                analysis.message_id,
                case_id,
                analysis.is_hurtful,
                analysis.severity.map(|s| s.as_str()),
                analysis.is_apology,
                analysis.sentiment_score,
                serde_json::to_string(&analysis.patterns)?,
                serde_json::to_string(&analysis.keywords)?,
                serde_json::to_string(&analysis.supportive)?
            ])?;
        }
        Ok(())
    }

    fn insert_summaries(tx: &Transaction<'_>, table: &str, summaries: &[DailySummary]) -> Result<()> {
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT OR REPLACE INTO {table} ({}) VALUES (?, ?, ?, ?, ?, ?)",
            summary_columns()
        ))?;
        for summary in summaries {
            stmt.execute(params![
                summary.case_id,
                summary.date,
                summary.msg_count,
                summary.avg_sentiment,
                summary.hurtful_count,
                summary.patterns_count
            ])?;
        }
        Ok(())
    }

    /// Replace the live derived rows of a case with its staged rows.
    ///
    /// Runs in one transaction: readers see either the old or the new
    /// results, never a mix. Returns the number of analyses and summaries
    /// now live.
    pub fn swap_shadow(&self, case_id: i64) -> Result<(usize, usize)> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;

        let swap = |live: &str, shadow: &str, case_col: &str, columns: &str| -> Result<usize> {
            tx.execute(
                &format!("DELETE FROM {live} WHERE {case_col} = ?"),
                params![case_id],
            )?;
            Ok(tx.execute(
                &format!(
                    "INSERT INTO {live} ({columns}) SELECT {columns} FROM {shadow} WHERE {case_col} = ?"
                ),
                params![case_id],
            )?)
        };

        let analyses = swap(
            message_analysis::TABLE,
            message_analysis::SHADOW,
            message_analysis::CASE_ID,
            &analysis_columns(),
        )?;
        let summaries = swap(
            daily_summary::TABLE,
            daily_summary::SHADOW,
            daily_summary::CASE_ID,
            &summary_columns(),
        )?;
        Self::clear_shadow(&tx, case_id)?;
        tx.commit()?;

        Ok((analyses, summaries))
    }

    /// Analyses of a case in message timestamp order
    pub fn analyses_for_case(&self, case_id: i64) -> Result<Vec<MessageAnalysis>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT a.* FROM {a} a JOIN {m} m ON m.{mid} = a.{aid} WHERE a.{acase} = ? ORDER BY m.{ts}, m.{mid}",
            a = message_analysis::TABLE,
            m = messages::TABLE,
            mid = messages::ID,
            aid = message_analysis::MESSAGE_ID,
            acase = message_analysis::CASE_ID,
            ts = messages::TIMESTAMP
        ))?;
        let rows = stmt.query_map(params![case_id], Self::map_analysis)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Analysis of one message, if computed
    pub fn get_analysis(&self, message_id: i64) -> Result<Option<MessageAnalysis>> {
        let conn = self.get_connection()?;
        let analysis = conn
            .query_row(
                &format!(
                    "SELECT * FROM {} WHERE {} = ?",
                    message_analysis::TABLE,
                    message_analysis::MESSAGE_ID
                ),
                params![message_id],
                Self::map_analysis,
            )
            .optional()?;
        Ok(analysis)
    }

    /// Daily summaries of a case ordered by date
    pub fn summaries_for_case(&self, case_id: i64) -> Result<Vec<DailySummary>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = ? ORDER BY {}",
            daily_summary::TABLE,
            daily_summary::CASE_ID,
            daily_summary::DATE
        ))?;
        let rows = stmt.query_map(params![case_id], Self::map_summary)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Number of staged analysis rows for a case
    pub fn shadow_analysis_count(&self, case_id: i64) -> Result<usize> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                message_analysis::SHADOW,
                message_analysis::CASE_ID
            ),
            params![case_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn map_case(row: &Row<'_>) -> rusqlite::Result<Case> {
        Ok(Case {
            id: row.get(cases::ID)?,
            name: row.get(cases::NAME)?,
            user_label: row.get(cases::USER_LABEL)?,
            contact_label: row.get(cases::CONTACT_LABEL)?,
            start_date: row.get(cases::START_DATE)?,
            end_date: row.get(cases::END_DATE)?,
        })
    }

    fn map_message(row: &Row<'_>) -> rusqlite::Result<Message> {
        Ok(Message {
            id: row.get(messages::ID)?,
            case_id: row.get(messages::CASE_ID)?,
            timestamp: row.get(messages::TIMESTAMP)?,
            date: row.get(messages::DATE)?,
            time: row.get(messages::TIME)?,
            source: row.get(messages::SOURCE)?,
            direction: parse_column(row, messages::DIRECTION)?,
            body: row.get(messages::BODY)?,
            media_type: parse_column(row, messages::MEDIA_TYPE)?,
            duration: row.get(messages::DURATION)?,
        })
    }

    fn map_call(row: &Row<'_>) -> rusqlite::Result<CallRecord> {
        Ok(CallRecord {
            id: row.get(calls::ID)?,
            case_id: row.get(calls::CASE_ID)?,
            timestamp: row.get(calls::TIMESTAMP)?,
            date: row.get(calls::DATE)?,
            time: row.get(calls::TIME)?,
            source: row.get(calls::SOURCE)?,
            direction: parse_column(row, calls::DIRECTION)?,
            duration: row.get(calls::DURATION)?,
            status: parse_column(row, calls::STATUS)?,
        })
    }

    fn map_analysis(row: &Row<'_>) -> rusqlite::Result<MessageAnalysis> {
        let severity_idx = row.as_ref().column_index(message_analysis::SEVERITY)?;
        let severity = row
            .get::<_, Option<String>>(severity_idx)?
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| conversion_error(severity_idx, e))?;

        Ok(MessageAnalysis {
            message_id: row.get(message_analysis::MESSAGE_ID)?,
            is_hurtful: row.get(message_analysis::IS_HURTFUL)?,
            severity,
            is_apology: row.get(message_analysis::IS_APOLOGY)?,
            sentiment_score: row.get(message_analysis::SENTIMENT_SCORE)?,
            patterns: json_column(row, message_analysis::PATTERNS)?,
            keywords: json_column(row, message_analysis::KEYWORDS)?,
            supportive: json_column(row, message_analysis::SUPPORTIVE)?,
        })
    }

    fn map_summary(row: &Row<'_>) -> rusqlite::Result<DailySummary> {
        Ok(DailySummary {
            case_id: row.get(daily_summary::CASE_ID)?,
            date: row.get(daily_summary::DATE)?,
            msg_count: row.get(daily_summary::MSG_COUNT)?,
            avg_sentiment: row.get(daily_summary::AVG_SENTIMENT)?,
            hurtful_count: row.get(daily_summary::HURTFUL_COUNT)?,
            patterns_count: row.get(daily_summary::PATTERNS_COUNT)?,
        })
    }
}
