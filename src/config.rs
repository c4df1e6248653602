use crate::domain::SourcePair;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub sources: SourcePair,
    pub export_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let source_a = env::var("SOURCE_A").unwrap_or_else(|_| "seloger".to_string());
        let source_b = env::var("SOURCE_B").unwrap_or_else(|_| "leboncoin".to_string());

        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/listings.sqlite3".to_string()),
            schema_path: env::var("SCHEMA_PATH").unwrap_or_else(|_| "sql/schema.sql".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address like 127.0.0.1:3000")?,
            max_workers: env::var("MAX_WORKERS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("MAX_WORKERS must be a valid number")?,
            sources: SourcePair::new(source_a.as_str(), source_b.as_str())
                .context("SOURCE_A and SOURCE_B must name two different sources")?,
            export_dir: env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
        })
    }
}
