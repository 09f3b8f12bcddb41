//! SQLite translation store with connection pooling

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::info;

use crate::domain::language::LanguageCode;
use crate::domain::store::{TranslationStore, UsageSummary};
use crate::domain::translation::{TranslationKey, TranslationResult, AUTO_SOURCE};
use crate::domain::DomainError;

/// SQLite store configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:` for an in-process database
    pub path: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "data/relay.db".to_string(),
            max_connections: 5,
        }
    }
}

impl SqliteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// In-process database; pooled to a single connection because every
    /// connection would otherwise see its own empty database
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Durable translation store backed by SQLite.
///
/// Rows in `translations` are keyed by the normalized
/// (source_text, source_lang, target_lang) tuple and never updated after
/// insert; `usage_log` accumulates per-call provider usage.
#[derive(Debug)]
pub struct SqliteTranslationStore {
    pool: SqlitePool,
}

impl SqliteTranslationStore {
    /// Opens (creating if missing) the database and ensures the schema exists
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DomainError> {
        let url = if config.path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(storage_err)?;
                }
            }
            format!("sqlite://{}", config.path)
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(storage_err)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(path = %config.path, "Translation store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS translations (
                source_text          TEXT NOT NULL,
                source_lang          TEXT NOT NULL,
                target_lang          TEXT NOT NULL,
                translated_text      TEXT NOT NULL,
                detected_source_lang TEXT,
                provider             TEXT NOT NULL,
                translated_at        INTEGER NOT NULL,
                stored_at            INTEGER NOT NULL,
                PRIMARY KEY (source_text, source_lang, target_lang)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                provider    TEXT NOT NULL,
                characters  INTEGER NOT NULL,
                recorded_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_usage_log_provider ON usage_log(provider)",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    fn result_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TranslationResult, DomainError> {
        let translated_text: String = row.try_get("translated_text").map_err(storage_err)?;
        let detected: Option<String> =
            row.try_get("detected_source_lang").map_err(storage_err)?;
        let provider: String = row.try_get("provider").map_err(storage_err)?;
        let translated_at: i64 = row.try_get("translated_at").map_err(storage_err)?;

        let mut result = TranslationResult::new(translated_text, provider)
            .with_translated_at(timestamp(translated_at));

        if let Some(lang) = detected.and_then(|code| LanguageCode::parse(code).ok()) {
            result = result.with_detected_source_lang(lang);
        }

        Ok(result)
    }

    fn key_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TranslationKey, DomainError> {
        let source_text: String = row.try_get("source_text").map_err(storage_err)?;
        let source_lang: String = row.try_get("source_lang").map_err(storage_err)?;
        let target_lang: String = row.try_get("target_lang").map_err(storage_err)?;

        let source = if source_lang == AUTO_SOURCE {
            None
        } else {
            Some(LanguageCode::parse(&source_lang)?)
        };

        Ok(TranslationKey::new(
            source_text,
            source,
            LanguageCode::parse(&target_lang)?,
        ))
    }
}

#[async_trait]
impl TranslationStore for SqliteTranslationStore {
    async fn store(
        &self,
        key: &TranslationKey,
        result: &TranslationResult,
    ) -> Result<(), DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO translations
                (source_text, source_lang, target_lang, translated_text,
                 detected_source_lang, provider, translated_at, stored_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(key.normalized_text())
        .bind(key.source_tag())
        .bind(key.target_lang().as_str())
        .bind(&result.translated_text)
        .bind(result.detected_source_lang.as_ref().map(|l| l.as_str()))
        .bind(&result.provider)
        .bind(result.translated_at.timestamp())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?
        .rows_affected();

        if inserted > 0 {
            return Ok(());
        }

        // A row already exists for this key. Re-storing an agreeing result
        // is an idempotent no-op; a differing one is a conflict and the
        // first write wins.
        match self.load(key).await? {
            Some(existing) if existing.agrees_with(result) => Ok(()),
            Some(_) => Err(DomainError::persistence_conflict(
                key.to_string(),
                "stored result differs",
            )),
            None => Err(DomainError::storage(
                "Insert was ignored but no existing row was found",
            )),
        }
    }

    async fn load(
        &self,
        key: &TranslationKey,
    ) -> Result<Option<TranslationResult>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT translated_text, detected_source_lang, provider, translated_at
            FROM translations
            WHERE source_text = ? AND source_lang = ? AND target_lang = ?
            "#,
        )
        .bind(key.normalized_text())
        .bind(key.source_tag())
        .bind(key.target_lang().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.as_ref().map(Self::result_from_row).transpose()
    }

    async fn load_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<(TranslationKey, TranslationResult)>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT source_text, source_lang, target_lang, translated_text,
                   detected_source_lang, provider, translated_at
            FROM translations
            ORDER BY stored_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| Ok((Self::key_from_row(row)?, Self::result_from_row(row)?)))
            .collect()
    }

    async fn record_usage(&self, provider: &str, characters: u64) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO usage_log (provider, characters, recorded_at) VALUES (?, ?, ?)")
            .bind(provider)
            .bind(characters as i64)
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }

    async fn usage_summary(&self) -> Result<Vec<UsageSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT provider, COUNT(*) AS calls, SUM(characters) AS characters
            FROM usage_log
            GROUP BY provider
            ORDER BY characters DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| {
                let provider: String = row.try_get("provider").map_err(storage_err)?;
                let calls: i64 = row.try_get("calls").map_err(storage_err)?;
                let characters: i64 = row.try_get("characters").map_err(storage_err)?;

                Ok(UsageSummary {
                    provider,
                    calls: calls as u64,
                    characters: characters as u64,
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM translations")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        let n: i64 = row.try_get("n").map_err(storage_err)?;
        Ok(n as usize)
    }
}

fn storage_err(error: impl std::fmt::Display) -> DomainError {
    DomainError::storage(error.to_string())
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
