use crate::models::{PageView, StatsRecord, VisitorStats};
use crate::storage::{StatsStorage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl StatsStorage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS page_views (
                id BIGSERIAL PRIMARY KEY,
                url TEXT NOT NULL,
                visitor_id TEXT NOT NULL,
                viewed_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_page_views_url ON page_views(url)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_page_views_viewed_at ON page_views(viewed_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn site_stats(&self, url_filter: Option<&str>) -> StorageResult<StatsRecord> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StorageError::from_acquire)?;

        let stats = sqlx::query_as::<_, VisitorStats>(
            r#"
            SELECT
                COUNT(DISTINCT visitor_id) AS total_visitors,
                COUNT(*) AS total_page_views,
                COUNT(DISTINCT url) AS unique_pages
            FROM page_views
            WHERE ($1::TEXT IS NULL OR strpos(url, $1) > 0)
            "#,
        )
        .bind(url_filter)
        .fetch_one(&mut *conn)
        .await
        .map_err(StorageError::from_query)?;

        Ok(StatsRecord { stats })
    }

    async fn record_page_view(&self, view: &PageView) -> StorageResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StorageError::from_acquire)?;

        sqlx::query(
            r#"
            INSERT INTO page_views (url, visitor_id, viewed_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&view.url)
        .bind(&view.visitor_id)
        .bind(view.viewed_at)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::from_query)?;

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
