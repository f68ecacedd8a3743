//! SQLite-backed coin document store

use anyhow::Result;
use coin_types::{CoinRecord, SortField, SortOrder};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::models::DbCoin;

#[derive(Clone)]
pub struct CoinStore {
    pool: SqlitePool,
}

impl CoinStore {
    /// Connect and run migrations
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Private in-memory database; a single connection that never expires,
    /// since each SQLite memory connection is its own database
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coins (
                id TEXT PRIMARY KEY,
                coin_no TEXT NOT NULL,
                value TEXT NOT NULL,
                material TEXT NOT NULL,
                country TEXT NOT NULL,
                year TEXT NOT NULL,
                mint TEXT NOT NULL,
                coin_present_value TEXT NOT NULL,
                description TEXT NOT NULL,
                remark TEXT NOT NULL DEFAULT '',
                photos_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Lookup index only; coin numbers are not enforced unique
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_coins_coin_no ON coins(coin_no)
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    pub async fn insert(&self, record: &CoinRecord) -> Result<(), sqlx::Error> {
        let doc = &record.document;
        let photos_json = serde_json::to_string(&doc.photos)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        sqlx::query(
            r#"
            INSERT INTO coins (id, coin_no, value, material, country, year, mint,
                               coin_present_value, description, remark, photos_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&doc.coin_no)
        .bind(&doc.value)
        .bind(&doc.material)
        .bind(&doc.country)
        .bind(&doc.year)
        .bind(&doc.mint)
        .bind(&doc.coin_present_value)
        .bind(&doc.description)
        .bind(&doc.remark)
        .bind(&photos_json)
        .bind(&doc.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("Added coin {} ({})", doc.coin_no, record.id);
        Ok(())
    }

    /// Whether any record carries `coin_no`
    pub async fn find_coin_no(&self, coin_no: &str) -> Result<bool, sqlx::Error> {
        let found: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT id FROM coins WHERE coin_no = ? LIMIT 1
            "#,
        )
        .bind(coin_no)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    /// Duplicate check used while typing and on submit.
    ///
    /// An empty number never matches. Query failures count as "not taken"
    /// so a flaky store does not block submissions.
    pub async fn coin_no_taken(&self, coin_no: &str) -> bool {
        if coin_no.is_empty() {
            return false;
        }
        match self.find_coin_no(coin_no).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Error checking coin no {}: {}", coin_no, e);
                false
            }
        }
    }

    /// All records in store order
    pub async fn list(
        &self,
        sort_by: SortField,
        order: SortOrder,
    ) -> Result<Vec<CoinRecord>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT id, coin_no, value, material, country, year, mint,
                   coin_present_value, description, remark, photos_json, created_at
            FROM coins
            ORDER BY {column} {dir}, id {dir}
            "#,
            column = sort_by.column(),
            dir = order.as_sql(),
        );

        let rows: Vec<DbCoin> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.into_record().map_err(|e| sqlx::Error::Decode(Box::new(e))))
            .collect()
    }

    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_types::CoinDocument;
    use pretty_assertions::assert_eq;

    fn record(id: &str, coin_no: &str, year: &str, created_at: &str) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            document: CoinDocument {
                coin_no: coin_no.to_string(),
                value: "1".into(),
                material: "Brass".into(),
                country: "Chile".into(),
                year: year.to_string(),
                mint: "Santiago".into(),
                coin_present_value: "4".into(),
                description: "Condor".into(),
                remark: String::new(),
                photos: vec!["data:image/png;base64,AAAA".into()],
                created_at: created_at.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_round_trips() {
        let store = CoinStore::in_memory().await.unwrap();
        let rec = record("a", "X", "1990", "2024-01-01T00:00:00.000Z");
        store.insert(&rec).await.unwrap();

        let listed = store.list(SortField::CreatedAt, SortOrder::Desc).await.unwrap();
        assert_eq!(listed, vec![rec]);
    }

    #[tokio::test]
    async fn test_list_orders_by_field_and_direction() {
        let store = CoinStore::in_memory().await.unwrap();
        store.insert(&record("a", "A", "1950", "2024-01-02T00:00:00.000Z")).await.unwrap();
        store.insert(&record("b", "B", "1920", "2024-01-03T00:00:00.000Z")).await.unwrap();
        store.insert(&record("c", "C", "1980", "2024-01-01T00:00:00.000Z")).await.unwrap();

        let ids = |records: Vec<CoinRecord>| records.into_iter().map(|r| r.id).collect::<Vec<_>>();

        let newest = store.list(SortField::CreatedAt, SortOrder::Desc).await.unwrap();
        assert_eq!(ids(newest), vec!["b", "a", "c"]);

        let oldest_year = store.list(SortField::Year, SortOrder::Asc).await.unwrap();
        assert_eq!(ids(oldest_year), vec!["b", "a", "c"]);

        let newest_year = store.list(SortField::Year, SortOrder::Desc).await.unwrap();
        assert_eq!(ids(newest_year), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_coin_no_taken_matches_exactly() {
        let store = CoinStore::in_memory().await.unwrap();
        store.insert(&record("a", "X", "1990", "2024-01-01T00:00:00.000Z")).await.unwrap();

        assert!(store.coin_no_taken("X").await);
        assert!(!store.coin_no_taken("x").await);
        assert!(!store.coin_no_taken("XY").await);
        assert!(!store.coin_no_taken("").await);
    }

    #[tokio::test]
    async fn test_coin_no_check_fails_open() {
        let store = CoinStore::in_memory().await.unwrap();
        store.insert(&record("a", "X", "1990", "2024-01-01T00:00:00.000Z")).await.unwrap();
        store.close().await;

        assert!(store.find_coin_no("X").await.is_err());
        assert!(!store.coin_no_taken("X").await);
    }
}
