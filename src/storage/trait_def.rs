use crate::models::{PageView, StatsRecord};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Connection acquisition failures surface as `Unavailable`
    pub(crate) fn from_acquire(err: sqlx::Error) -> Self {
        StorageError::Unavailable(err)
    }

    pub(crate) fn from_query(err: sqlx::Error) -> Self {
        StorageError::Other(err.into())
    }
}

#[async_trait]
pub trait StatsStorage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Aggregate visitor statistics, restricted to URLs containing `url_filter`
    /// (case-sensitive, no wildcards) when present. Always yields exactly one record.
    async fn site_stats(&self, url_filter: Option<&str>) -> StorageResult<StatsRecord>;

    /// Record a single page view
    async fn record_page_view(&self, view: &PageView) -> StorageResult<()>;

    /// Close the connection pool. Later calls fail with `StorageError::Unavailable`.
    async fn close(&self);
}
