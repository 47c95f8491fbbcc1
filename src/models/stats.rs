use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate visitor statistics for one (possibly filtered) query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VisitorStats {
    pub total_visitors: i64,
    pub total_page_views: i64,
    pub unique_pages: i64,
}

/// The single row returned by a stats query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub stats: VisitorStats,
}

/// One recorded page view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub url: String,
    pub visitor_id: String,
    pub viewed_at: i64,
}

impl PageView {
    /// Page view stamped with the current time
    pub fn now(url: impl Into<String>, visitor_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            visitor_id: visitor_id.into(),
            viewed_at: chrono::Utc::now().timestamp(),
        }
    }
}
