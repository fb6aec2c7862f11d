// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::FitDecodeOptions;
use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Root directory for per-request upload batches
    pub upload_dir: PathBuf,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Frontend assets served for unmatched GET requests
    pub static_dir: Option<PathBuf>,
    /// Sample activity files offered by the "try it" button
    pub sample_dir: PathBuf,
    /// Decode FIT files even when their CRCs do not match
    pub fit_force_decode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: match env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("PORT", v))?,
                Err(_) => DEFAULT_PORT,
            },
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", DEFAULT_PORT)),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_upload_dir()),
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES", v))?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            sample_dir: env::var("SAMPLE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/samples")),
            fit_force_decode: match env::var("FIT_FORCE_DECODE") {
                Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("FIT_FORCE_DECODE", v))?,
                Err(_) => true,
            },
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: None,
            sample_dir: PathBuf::from("data/samples"),
            fit_force_decode: true,
        }
    }

    pub fn fit_decode_options(&self) -> FitDecodeOptions {
        FitDecodeOptions {
            force: self.fit_force_decode,
        }
    }
}

fn default_upload_dir() -> PathBuf {
    env::temp_dir().join("activity-heatmap-uploads")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
