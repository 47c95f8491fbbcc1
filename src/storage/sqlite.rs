use crate::models::{PageView, StatsRecord, VisitorStats};
use crate::storage::{StatsStorage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl StatsStorage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS page_views (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                visitor_id TEXT NOT NULL,
                viewed_at INTEGER NOT NULL
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
        // Returned to the pool when dropped, whether or not the query succeeds
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
            WHERE (?1 IS NULL OR instr(url, ?1) > 0)
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
            VALUES (?, ?, ?)
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_sqlite() -> SqliteStorage {
        let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
        storage.init().await.unwrap();
        storage
    }

    async fn seed(storage: &SqliteStorage, rows: &[(&str, &str)]) {
        for (url, visitor) in rows {
            storage
                .record_page_view(&PageView {
                    url: url.to_string(),
                    visitor_id: visitor.to_string(),
                    viewed_at: 1_698_768_000,
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_empty_table_yields_zero_row() {
        let storage = setup_sqlite().await;
        let record = storage.site_stats(None).await.unwrap();
        assert_eq!(record.stats, VisitorStats::default());
    }

    #[tokio::test]
    async fn test_unfiltered_aggregates_everything() {
        let storage = setup_sqlite().await;
        seed(
            &storage,
            &[
                ("https://rbg.iitm.ac.in/tpl/", "v1"),
                ("https://rbg.iitm.ac.in/tpl/about", "v1"),
                ("https://example.com/", "v2"),
            ],
        )
        .await;

        let stats = storage.site_stats(None).await.unwrap().stats;
        assert_eq!(stats.total_visitors, 2);
        assert_eq!(stats.total_page_views, 3);
        assert_eq!(stats.unique_pages, 3);
    }

    #[tokio::test]
    async fn test_filter_matches_substring() {
        let storage = setup_sqlite().await;
        seed(
            &storage,
            &[
                ("https://rbg.iitm.ac.in/tpl/", "v1"),
                ("https://rbg.iitm.ac.in/tpl/about", "v2"),
                ("https://rbg.iitm.ac.in/other", "v3"),
            ],
        )
        .await;

        let stats = storage
            .site_stats(Some("https://rbg.iitm.ac.in/tpl"))
            .await
            .unwrap()
            .stats;
        assert_eq!(stats.total_visitors, 2);
        assert_eq!(stats.total_page_views, 2);
    }

    #[tokio::test]
    async fn test_filter_wildcards_are_literal() {
        let storage = setup_sqlite().await;
        seed(
            &storage,
            &[
                ("https://example.com/100%_sale", "v1"),
                ("https://example.com/100xysale", "v2"),
            ],
        )
        .await;

        let stats = storage.site_stats(Some("100%_")).await.unwrap().stats;
        assert_eq!(stats.total_page_views, 1);
    }

    #[tokio::test]
    async fn test_filter_is_case_sensitive() {
        let storage = setup_sqlite().await;
        seed(&storage, &[("https://rbg.iitm.ac.in/TPL/about", "v1")]).await;

        let stats = storage
            .site_stats(Some("https://rbg.iitm.ac.in/tpl"))
            .await
            .unwrap()
            .stats;
        assert_eq!(stats.total_page_views, 0);
    }

    #[tokio::test]
    async fn test_connection_released_after_failed_query() {
        // A single connection: a leaked one would make the next acquire time out
        let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();

        let err = storage.site_stats(None).await.unwrap_err();
        assert!(matches!(err, StorageError::Other(_)), "got {err:?}");

        storage.init().await.unwrap();
        let record = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            storage.site_stats(None),
        )
        .await
        .expect("connection was not returned to the pool")
        .unwrap();
        assert_eq!(record.stats, VisitorStats::default());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let storage = setup_sqlite().await;
        storage.close().await;

        let err = storage.site_stats(None).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)), "got {err:?}");

        let err = storage
            .record_page_view(&PageView::now("https://example.com/", "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_filter_without_match() {
        let storage = setup_sqlite().await;
        seed(&storage, &[("https://example.com/", "v1")]).await;

        let stats = storage.site_stats(Some("nomatch")).await.unwrap().stats;
        assert_eq!(stats, VisitorStats::default());
    }
}
