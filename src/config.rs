//! Settings for backend endpoints
//!
//! Resolution order (last wins): built-in defaults, `config.toml` in the user
//! config dir, environment variables, command-line flags.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_PDF_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "VOCAB_QUIZ_API_URL";
pub const PDF_URL_ENV: &str = "VOCAB_QUIZ_PDF_URL";

const CONFIG_DIR: &str = "vocab-quiz";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub pdf_service_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            pdf_service_url: DEFAULT_PDF_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub pdf_service_url: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILENAME)
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let mut settings = match &overrides.config_path {
            Some(path) if !path.exists() => {
                return Err(Error::ConfigNotFound { path: path.clone() });
            }
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env(|key| std::env::var(key).ok());

        if let Some(url) = &overrides.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(url) = &overrides.pdf_service_url {
            settings.pdf_service_url = url.clone();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(PDF_URL_ENV).filter(|v| !v.is_empty()) {
            self.pdf_service_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("pdf_service_url", &self.pdf_service_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config_invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config_invalid(
                "request_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}
