//! App configuration, read from `adwatch.ron` in the working directory.
//!
//! Every field has a default so a missing or partial file still yields a
//! usable configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use adwatch_api::RetryPolicy;
use client_logging::client_warn;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "adwatch.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the monitor backend.
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Log to `./adwatch.log` instead of the terminal.
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 30_000,
            max_retries: 3,
            base_delay_ms: 1_000,
            log_to_file: true,
        }
    }
}

impl AppConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            ..RetryPolicy::default()
        }
    }
}

pub fn load(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            client_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            client_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
