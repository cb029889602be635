//! User-message catalog configuration.
//!
//! The classifier ships with one built-in user message per category. A
//! [`MessageCatalog`] replaces some of them, loaded from a TOML file and/or
//! environment variables:
//!
//! ```toml
//! [messages]
//! network = "The relay is unreachable. Check your connection."
//! storage = "Could not save. Free up some space and try again."
//! ```
//!
//! Categories, codes and retryability are fixed; only the texts change.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Prefix for environment overrides, e.g. `RELAY_ERRORS__MESSAGES__NETWORK`.
pub const ENV_PREFIX: &str = "RELAY_ERRORS";

/// Errors that can occur when loading a message catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration path is not valid UTF-8.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// An override would leave a category without a user message.
    #[error("user message for {0} must not be empty")]
    EmptyMessage(ErrorCategory),

    /// Failed to read or deserialize the configuration sources.
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Failed to parse TOML text.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Per-category overrides. Unset categories keep the built-in message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryMessages {
    pub network: Option<String>,
    pub auth: Option<String>,
    pub validation: Option<String>,
    pub crypto: Option<String>,
    pub storage: Option<String>,
    pub unknown: Option<String>,
}

impl CategoryMessages {
    fn get(&self, category: ErrorCategory) -> Option<&String> {
        match category {
            ErrorCategory::Network => self.network.as_ref(),
            ErrorCategory::Auth => self.auth.as_ref(),
            ErrorCategory::Validation => self.validation.as_ref(),
            ErrorCategory::Crypto => self.crypto.as_ref(),
            ErrorCategory::Storage => self.storage.as_ref(),
            ErrorCategory::Unknown => self.unknown.as_ref(),
        }
    }

    fn slot(&mut self, category: ErrorCategory) -> &mut Option<String> {
        match category {
            ErrorCategory::Network => &mut self.network,
            ErrorCategory::Auth => &mut self.auth,
            ErrorCategory::Validation => &mut self.validation,
            ErrorCategory::Crypto => &mut self.crypto,
            ErrorCategory::Storage => &mut self.storage,
            ErrorCategory::Unknown => &mut self.unknown,
        }
    }
}

/// User-facing messages, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageCatalog {
    #[serde(default)]
    messages: CategoryMessages,
}

impl MessageCatalog {
    /// Load a catalog from a TOML file, with environment overrides.
    ///
    /// Environment variables use the format `RELAY_ERRORS__MESSAGES__<CATEGORY>`
    /// and take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file does not exist
    /// - The configuration file cannot be parsed
    /// - The path is invalid
    /// - Any override is empty
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use relay_errors::config::MessageCatalog;
    ///
    /// let catalog = MessageCatalog::load("config/relay-errors.toml")?;
    /// # Ok::<(), relay_errors::config::CatalogError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| CatalogError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(CatalogError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let catalog: MessageCatalog = config.try_deserialize()?;
        catalog.validate()
    }

    /// Build a catalog from environment variables only.
    ///
    /// With no `RELAY_ERRORS__MESSAGES__*` variables set this is the built-in catalog.
    pub fn from_env() -> Result<Self, CatalogError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let catalog: MessageCatalog = config.try_deserialize()?;
        catalog.validate()
    }

    /// Parse a catalog from TOML text. Environment variables are not consulted.
    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let catalog: MessageCatalog = toml::from_str(input)?;
        catalog.validate()
    }

    /// Override the message for one category.
    pub fn with_message(mut self, category: ErrorCategory, message: impl Into<String>) -> Self {
        *self.messages.slot(category) = Some(message.into());
        self
    }

    /// The user message for `category`: the override if set, else the built-in text.
    pub fn user_message(&self, category: ErrorCategory) -> &str {
        self.messages
            .get(category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_user_message())
    }

    /// Whether `category` has an override.
    pub fn is_overridden(&self, category: ErrorCategory) -> bool {
        self.messages.get(category).is_some()
    }

    fn validate(self) -> Result<Self, CatalogError> {
        for category in ErrorCategory::ALL {
            if let Some(message) = self.messages.get(category) {
                if message.trim().is_empty() {
                    return Err(CatalogError::EmptyMessage(category));
                }
            }
        }
        Ok(self)
    }
}
