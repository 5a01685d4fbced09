//! Runtime configuration
//! Mission: Read everything the server needs from the process environment

use crate::auth::jwt::{DEFAULT_TTL_SECS, MAX_TTL_SECS};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_CORS_ORIGINS: &str =
    "https://resonant-bonbon-f6dc6a.netlify.app,http://localhost:5173,http://localhost:5174";

#[derive(Debug, Clone)]
pub struct Config {
    pub token_secret: String,
    pub token_ttl_secs: i64,
    pub bind_addr: String,
    pub port: u16,
    pub database_path: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(token_secret) = var("ACCESS_TOKEN_SECRET") else {
            bail!("ACCESS_TOKEN_SECRET must be set");
        };

        let token_ttl_secs = parse_or(var("ACCESS_TOKEN_TTL_SECS"), "ACCESS_TOKEN_TTL_SECS", DEFAULT_TTL_SECS)?;
        if !(1..=MAX_TTL_SECS).contains(&token_ttl_secs) {
            bail!(
                "ACCESS_TOKEN_TTL_SECS must be between 1 and {}, got {}",
                MAX_TTL_SECS,
                token_ttl_secs
            );
        }

        let port = parse_or(var("PORT"), "PORT", 3000u16)?;
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());

        let database_path = resolve_data_path(var("DB_PATH"), "dreambuy.db");

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            token_secret,
            token_ttl_secs,
            bind_addr,
            port,
            database_path,
            cors_origins,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {}: {:?}", key, v)),
        None => Ok(default),
    }
}

/// Relative paths resolve against the crate directory, not the caller's cwd.
fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value else {
        return base.join(default_filename).to_string_lossy().to_string();
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    base.join(p).to_string_lossy().to_string()
}
