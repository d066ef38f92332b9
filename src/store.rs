//! Relational sink for normalized product records.
//!
//! SQLite via sqlx. The pool is opened only after traversal completes, holds
//! a single connection (the store is not assumed safe for concurrent
//! writers) and is released explicitly on every exit path.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{info, warn};

use crate::normalize::NormalizedProductRecord;

/// Idempotent schema for the products table. `created_at` is assigned by the
/// store, not the scraper.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    image_url TEXT,
    original_price TEXT,
    discounted_price TEXT,
    department TEXT,
    category TEXT,
    weight TEXT,
    unit TEXT,
    volume TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const INSERT_SQL: &str = "
INSERT INTO products (title, image_url, original_price, discounted_price,
                      department, category, weight, unit, volume)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    /// Open the store and ensure the products table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("invalid database URL")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        // Single writer.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("failed to open product database")?;

        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("failed to initialize product schema")?;

        Ok(Self { pool })
    }

    /// Insert a batch one record at a time.
    ///
    /// A failed insert is logged with its position in the batch and does not
    /// abort the remaining inserts. Returns how many records committed.
    pub async fn insert_batch(&self, records: &[NormalizedProductRecord]) -> usize {
        let total = records.len();
        let mut inserted = 0usize;
        for (index, record) in records.iter().enumerate() {
            match self.insert_one(record).await {
                Ok(()) => {
                    inserted += 1;
                    if inserted % 100 == 0 {
                        info!("persisted {inserted}/{total} records");
                    }
                }
                Err(e) => warn!("failed to insert record {index}: {e:#}"),
            }
        }
        info!("persisted {inserted}/{total} records");
        inserted
    }

    async fn insert_one(&self, record: &NormalizedProductRecord) -> Result<()> {
        sqlx::query(INSERT_SQL)
            .bind(&record.title)
            .bind(&record.image_url)
            .bind(&record.original_price)
            .bind(&record.discounted_price)
            .bind(&record.department)
            .bind(&record.category)
            .bind(&record.weight)
            .bind(&record.unit)
            .bind(&record.volume)
            .execute(&self.pool)
            .await
            .context("insert failed")?;
        Ok(())
    }

    /// Number of rows currently in the products table.
    pub async fn product_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .context("failed to count products")?;
        Ok(row.0)
    }

    /// All persisted titles, in insertion order. Used by tests and the run
    /// summary.
    pub async fn titles(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT title FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed to read product titles")?;
        Ok(rows.into_iter().map(|(title,)| title).collect())
    }

    /// Release the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
