//! Configuration module
//!
//! This module provides the application configuration, loaded from the
//! environment with sensible defaults for local development.

use std::env;

use crate::validator::MEGABYTE;

// Common constants
const MAX_FILE_SIZE_MB: usize = 10;
const SERVER_PORT: u16 = 3000;
const FETCH_TIMEOUT_SECS: u64 = 60;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory for stored assets
    pub stored_files_path: String,
    /// Upload size ceiling in bytes
    pub max_file_size_bytes: usize,
    /// Accepted extensions, lowercase with leading dot
    pub permitted_extensions: Vec<String>,
    pub server_port: u16,
    /// Timeout for fetching remote images, in seconds
    pub fetch_timeout_secs: u64,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let stored_files_path =
            env::var("STORED_FILES_PATH").unwrap_or_else(|_| "./uploads".to_string());

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let permitted_extensions = env::var("PERMITTED_EXTENSIONS")
            .unwrap_or_else(|_| ".jpg,.jpeg,.png,.gif".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            stored_files_path,
            max_file_size_bytes: max_file_size_mb * MEGABYTE,
            permitted_extensions,
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| FETCH_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(FETCH_TIMEOUT_SECS),
            cors_origins,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.stored_files_path.trim().is_empty() {
            return Err(anyhow::anyhow!("STORED_FILES_PATH must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.permitted_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "PERMITTED_EXTENSIONS must list at least one extension"
            ));
        }

        for ext in &self.permitted_extensions {
            if !ext.starts_with('.') {
                return Err(anyhow::anyhow!(
                    "PERMITTED_EXTENSIONS entries must start with '.', got '{}'",
                    ext
                ));
            }
        }

        Ok(())
    }
}
