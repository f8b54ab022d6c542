use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tinylink_core::error::{Result, StorageError};
use tinylink_core::hash::HashKey;
use tinylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};

const SELECT_COLUMNS: &str =
    "SELECT id, url, created, md5url, short, code, vanity, hits, accessed FROM urls";

/// MySQL implementation of the repository contract.
///
/// `md5url` and `short` carry plain indexes, not unique ones, so concurrent
/// creations of the same URL may both insert. Secondary lookups return the
/// row with the lowest id. Timestamps are stored as unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `urls` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(include_str!("../ddl/mysql/urls.sql"))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn fetch_one_where(&self, clause: &str, key: &str) -> Result<Option<UrlRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE {clause} ORDER BY id LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| record_from_row(&row)).transpose()
    }
}

fn parse_timestamp(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{}': {e}", seconds))
    })
}

fn parse_hash(value: String) -> Result<HashKey> {
    HashKey::from_hex(value.as_str())
        .ok_or_else(|| StorageError::InvalidData(format!("invalid hash '{}'", value)))
}

fn record_from_row(row: &MySqlRow) -> Result<UrlRecord> {
    let created: i64 = row.try_get("created").map_err(map_sqlx_error)?;
    let md5url: String = row.try_get("md5url").map_err(map_sqlx_error)?;
    let short: Option<String> = row.try_get("short").map_err(map_sqlx_error)?;
    let accessed: Option<i64> = row.try_get("accessed").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        url: row.try_get("url").map_err(map_sqlx_error)?,
        created: parse_timestamp(created)?,
        md5url: parse_hash(md5url)?,
        short: short.map(parse_hash).transpose()?,
        code: row.try_get("code").map_err(map_sqlx_error)?,
        vanity: row.try_get("vanity").map_err(map_sqlx_error)?,
        hits: row.try_get("hits").map_err(map_sqlx_error)?,
        accessed: accessed.map(parse_timestamp).transpose()?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_md5(&self, md5url: &HashKey) -> Result<Option<UrlRecord>> {
        self.fetch_one_where("md5url = ?", md5url.as_str()).await
    }

    async fn find_by_short(&self, short: &HashKey) -> Result<Option<UrlRecord>> {
        self.fetch_one_where("short = ?", short.as_str()).await
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ? LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| record_from_row(&row)).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (url, created, md5url, vanity)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.url)
        .bind(record.created.as_second())
        .bind(record.md5url.as_str())
        .bind(record.vanity)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_id()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.md5url.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update_short(&self, id: u64, short: &HashKey, code: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE urls
            SET short = ?, code = ?
            WHERE id = ?
            "#,
        )
        .bind(short.as_str())
        .bind(code)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_stats(&self, id: u64, accessed_at: Timestamp) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE urls
            SET hits = hits + 1, accessed = ?
            WHERE id = ?
            "#,
        )
        .bind(accessed_at.as_second())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_url(
        &self,
        id: u64,
        url: &str,
        md5url: &HashKey,
        vanity: Option<&str>,
    ) -> Result<bool> {
        // rows_affected is 0 for unchanged rows too, so probe existence first.
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE urls
            SET url = ?, md5url = ?, vanity = ?
            WHERE id = ?
            "#,
        )
        .bind(url)
        .bind(md5url.as_str())
        .bind(vanity)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(true)
    }
}
