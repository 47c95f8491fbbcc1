//! Site registry
//!
//! Maps short site codes (as used by the dashboard's site selector) to the
//! public URL of each site. The registry is built once at startup and only
//! read afterwards, so it is shared as a plain `Arc<SiteRegistry>`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Sentinel `site_filter` value meaning "no site restriction".
pub const ALL_SITES: &str = "all";

/// Sites known without any configuration file.
const BUILTIN_SITES: &[(&str, &str)] = &[("tpl", "https://rbg.iitm.ac.in/tpl")];

#[derive(Debug, Error)]
pub enum SiteRegistryError {
    #[error("failed to read site registry: {0}")]
    Source(#[from] config::ConfigError),
    #[error("site code must not be empty")]
    EmptyCode,
    #[error("site '{0}' has an empty url")]
    EmptyUrl(String),
    #[error("site code 'all' is reserved")]
    ReservedCode,
}

/// A single registry entry, as listed by the API and the admin CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteEntry {
    pub code: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SitesFile {
    #[serde(default)]
    sites: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<String, String>,
}

impl SiteRegistry {
    /// Registry containing only the built-in sites
    pub fn builtin() -> Self {
        Self {
            sites: BUILTIN_SITES
                .iter()
                .map(|(code, url)| (code.to_string(), url.to_string()))
                .collect(),
        }
    }

    /// Build a registry from explicit `(code, url)` pairs
    pub fn from_entries<I, C, U>(entries: I) -> Result<Self, SiteRegistryError>
    where
        I: IntoIterator<Item = (C, U)>,
        C: Into<String>,
        U: Into<String>,
    {
        let mut sites = BTreeMap::new();
        for (code, url) in entries {
            let (code, url) = validate_entry(code.into(), url.into())?;
            sites.insert(code, url);
        }
        Ok(Self { sites })
    }

    /// Load a registry file and layer its `[sites]` table over the built-in sites.
    ///
    /// The format is picked from the file extension (TOML, JSON, YAML, ...).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SiteRegistryError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let file: SitesFile = settings.try_deserialize()?;

        let mut registry = Self::builtin();
        for (code, url) in file.sites {
            let (code, url) = validate_entry(code, url)?;
            registry.sites.insert(code, url);
        }
        Ok(registry)
    }

    /// Exact, case-sensitive lookup of a site code
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.sites.get(code).map(String::as_str)
    }

    /// Entries ordered by code
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sites.iter().map(|(c, u)| (c.as_str(), u.as_str()))
    }

    pub fn entries(&self) -> Vec<SiteEntry> {
        self.iter()
            .map(|(code, url)| SiteEntry {
                code: code.to_string(),
                url: url.to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

fn validate_entry(code: String, url: String) -> Result<(String, String), SiteRegistryError> {
    let code = code.trim().to_string();
    let url = url.trim().to_string();

    if code.is_empty() {
        return Err(SiteRegistryError::EmptyCode);
    }
    if code == ALL_SITES {
        return Err(SiteRegistryError::ReservedCode);
    }
    if url.is_empty() {
        return Err(SiteRegistryError::EmptyUrl(code));
    }
    Ok((code, url))
}
