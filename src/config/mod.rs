//! Picker configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.photo-picker.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `PICKER_ACCESS_KEY`, `PICKER_QUERY`, and
//!    friends, plus the `UNSPLASH_ACCESS_KEY` fallback for the key
//! 4. **Command-line arguments** – `--access-key`/`-k`, `--query`/`-q`,
//!    `--pages`/`-p`, `--pick`/`-s`, and the other flags below
//!
//! # Configuration File
//!
//! ```toml
//! access_key = "your-access-key"
//! query = "mountains"
//! per_page = 20
//! pages = 2
//! app_name = "my_picker"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::api::credential::AccessKey;
use crate::api::error::ClientError;
use crate::api::query::{DEFAULT_PER_PAGE, QueryMode, normalise_phrase};
use crate::api::request::DEFAULT_API_BASE;
use crate::api::transport::DEFAULT_TIMEOUT_SECS;

/// Environment variable consulted when no access key is configured.
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Application name used for referral attribution by default.
pub const DEFAULT_APP_NAME: &str = "photo_picker";

const DEFAULT_PAGES: u32 = 1;

/// Picker configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use photo_picker::PickerConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PickerConfig::load().expect("failed to load configuration");
/// let key = config.resolve_access_key().expect("access key required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PICKER",
    discovery(
        dotfile_name = ".photo-picker.toml",
        config_file_name = "photo-picker.toml",
        app_name = "photo-picker"
    )
)]
pub struct PickerConfig {
    /// Access key sent as `client_id`.
    ///
    /// Can be provided via:
    /// - CLI: `--access-key <KEY>` or `-k <KEY>`
    /// - Environment: `PICKER_ACCESS_KEY` or `UNSPLASH_ACCESS_KEY`
    /// - Config file: `access_key = "..."`
    #[ortho_config(cli_short = 'k')]
    pub access_key: Option<String>,

    /// API base URL. Defaults to the public endpoint.
    #[ortho_config(cli_short = 'b')]
    pub api_base: Option<String>,

    /// Search phrase. When set, the picker searches instead of listing.
    ///
    /// Can be provided via:
    /// - CLI: `--query <PHRASE>` or `-q <PHRASE>`
    /// - Environment: `PICKER_QUERY`
    /// - Config file: `query = "..."`
    #[ortho_config(cli_short = 'q')]
    pub query: Option<String>,

    /// Lists curated photos instead of the most recent ones.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so this is only read from the CLI (`--curated`/`-c`)
    /// and configuration files.
    #[ortho_config(cli_short = 'c')]
    pub curated: bool,

    /// Results requested per page.
    #[ortho_config(cli_short = 'P')]
    pub per_page: u32,

    /// Number of pages to load before printing.
    #[ortho_config(cli_short = 'p')]
    pub pages: u32,

    /// Zero-based index of the photo to pick once loading finishes.
    ///
    /// Picking prints referral links for the photo and its photographer and
    /// sends the download notification.
    #[ortho_config(cli_short = 's')]
    pub pick: Option<usize>,

    /// Application name used as `utm_source` in referral links.
    #[ortho_config(cli_short = 'a')]
    pub app_name: String,

    /// Request timeout in seconds.
    #[ortho_config(cli_short = 't')]
    pub timeout_seconds: u64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            api_base: None,
            query: None,
            curated: false,
            per_page: DEFAULT_PER_PAGE,
            pages: DEFAULT_PAGES,
            pick: None,
            app_name: DEFAULT_APP_NAME.to_owned(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PickerConfig {
    /// Resolves the access key from configuration or the
    /// `UNSPLASH_ACCESS_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] when no source provides a
    /// non-blank key.
    pub fn resolve_access_key(&self) -> Result<AccessKey, ClientError> {
        let raw = self
            .access_key
            .clone()
            .or_else(|| env::var(ACCESS_KEY_ENV).ok())
            .ok_or(ClientError::MissingCredential)?;
        AccessKey::new(raw)
    }

    /// Returns the normalised search phrase, if any.
    #[must_use]
    pub fn search_phrase(&self) -> Option<String> {
        normalise_phrase(self.query.as_deref())
    }

    /// Determines the collection to browse.
    ///
    /// A non-blank query selects `Search`; otherwise `curated` selects
    /// `Curated`, and `Recent` is the fallback.
    #[must_use]
    pub fn query_mode(&self) -> QueryMode {
        if self.search_phrase().is_some() {
            QueryMode::Search
        } else if self.curated {
            QueryMode::Curated
        } else {
            QueryMode::Recent
        }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validates configuration consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when a search and `curated` are
    /// both requested, when `per_page`, `pages` or `timeout_seconds` is zero,
    /// or when `app_name` is blank.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.curated && self.search_phrase().is_some() {
            return Err(configuration("--curated cannot be combined with --query"));
        }
        if self.per_page == 0 {
            return Err(configuration("per_page must be at least 1"));
        }
        if self.pages == 0 {
            return Err(configuration("pages must be at least 1"));
        }
        if self.timeout_seconds == 0 {
            return Err(configuration("timeout_seconds must be at least 1"));
        }
        if self.app_name.trim().is_empty() {
            return Err(configuration("app_name must not be blank"));
        }
        Ok(())
    }
}

fn configuration(message: &str) -> ClientError {
    ClientError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
