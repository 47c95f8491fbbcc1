//! Site/URL filter resolution
//!
//! Turns the `site_filter` and `url_filter` query parameters into the single
//! URL filter applied to the stats query. A registered `site_filter` wins
//! over any `url_filter`; an unknown code means no filter at all.

use tracing::info;

use crate::sites::{SiteRegistry, ALL_SITES};

/// Outcome of resolving one request's filter parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// Raw `site_filter` as received
    pub site_filter: Option<String>,
    /// Registry URL for `site_filter`, if it named a known site
    pub site_url: Option<String>,
    /// Filter actually applied to the stats query
    pub effective_url_filter: Option<String>,
}

impl ResolvedFilter {
    /// First log line: the raw site code and the URL it resolved to
    pub fn resolution_message(&self) -> String {
        format!(
            "Resolved site_filter='{}' to site_url='{}'",
            display_or_none(self.site_filter.as_deref()),
            display_or_none(self.site_url.as_deref()),
        )
    }

    /// Second log line: the filter handed to the stats query
    pub fn filter_message(&self) -> String {
        format!(
            "URL filter: {}",
            display_or_none(self.effective_url_filter.as_deref())
        )
    }
}

fn display_or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

/// Resolve the effective URL filter and log the decision.
pub fn resolve(
    registry: &SiteRegistry,
    site_filter: Option<&str>,
    url_filter: Option<&str>,
) -> ResolvedFilter {
    let resolved = match site_filter {
        Some(code) if code != ALL_SITES => {
            let site_url = registry.lookup(code).map(str::to_string);
            ResolvedFilter {
                site_filter: Some(code.to_string()),
                effective_url_filter: site_url.clone(),
                site_url,
            }
        }
        _ => ResolvedFilter {
            site_filter: site_filter.map(str::to_string),
            site_url: None,
            effective_url_filter: url_filter.map(str::to_string),
        },
    };

    info!("{}", resolved.resolution_message());
    info!("{}", resolved.filter_message());

    resolved
}
