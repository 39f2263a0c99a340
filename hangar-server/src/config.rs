//! Server configuration loaded from the environment.

use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Runtime settings for the Hangar server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// Maximum pooled database connections.
    pub pool_size: u32,
}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                "DATABASE_URL must be set to a PostgreSQL connection string".to_string()
            })?;
        let host = lookup("HANGAR_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(lookup("HANGAR_PORT"), "HANGAR_PORT", DEFAULT_PORT)?;
        let pool_size = parse_or(
            lookup("HANGAR_DB_POOL_SIZE"),
            "HANGAR_DB_POOL_SIZE",
            DEFAULT_POOL_SIZE,
        )?;
        if pool_size == 0 {
            return Err("HANGAR_DB_POOL_SIZE must be at least 1".to_string());
        }
        let ui_origins = lookup("HANGAR_UI_ORIGINS")
            .unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url,
            host,
            port,
            ui_origins,
            pool_size,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("{key} must be a valid number, got {value:?}")),
        None => Ok(default),
    }
}
