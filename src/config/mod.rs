use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub sites: SitesConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    /// Path to a site registry file (TOML, JSON or YAML)
    /// If None, only the built-in registry is used
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origin allowed to call the API. Any origin is allowed when unset.
    pub allowed_origin: Option<String>,
}

impl DatabaseConfig {
    const fn default_max_connections() -> u32 {
        5
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                tracing::warn!(
                    "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres"
                );
                DatabaseBackend::Sqlite
            }
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./sitelens.db?mode=rwc".to_string());

        let max_connections =
            parse_max_connections(std::env::var("DATABASE_MAX_CONNECTIONS").ok().as_deref())?;

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let sites_path = std::env::var("SITES_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            sites: SitesConfig { path: sites_path },
            cors: CorsConfig { allowed_origin },
        })
    }
}

/// A zero-sized pool would stall every acquire, so 0 is rejected
fn parse_max_connections(value: Option<&str>) -> anyhow::Result<u32> {
    match value {
        Some(v) => Ok(v
            .trim()
            .parse::<NonZeroU32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
            .get()),
        None => Ok(DatabaseConfig::default_max_connections()),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_max_connections;

    #[test]
    fn test_max_connections_defaults_when_unset() {
        assert_eq!(parse_max_connections(None).unwrap(), 5);
    }

    #[test]
    fn test_max_connections_parses_positive_value() {
        assert_eq!(parse_max_connections(Some("12")).unwrap(), 12);
    }

    #[test]
    fn test_max_connections_rejects_zero() {
        let err = parse_max_connections(Some("0")).unwrap_err();
        assert!(err
            .to_string()
            .contains("DATABASE_MAX_CONNECTIONS must be a positive integer"));
    }

    #[test]
    fn test_max_connections_rejects_garbage() {
        assert!(parse_max_connections(Some("-3")).is_err());
        assert!(parse_max_connections(Some("many")).is_err());
    }
}
