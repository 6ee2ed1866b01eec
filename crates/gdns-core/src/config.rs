//! Configuration types for the GDNS system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Production GoDaddy API endpoint
pub const GODADDY_API_BASE: &str = "https://api.godaddy.com";

/// Main GDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdnsConfig {
    /// Registrar API configuration
    pub registrar: RegistrarConfig,

    /// State store configuration
    #[serde(default)]
    pub state_store: StateStoreConfig,
}

impl GdnsConfig {
    /// Create a new configuration
    pub fn new(registrar: RegistrarConfig) -> Self {
        Self {
            registrar,
            state_store: StateStoreConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.registrar.validate()?;
        self.state_store.validate()?;
        Ok(())
    }
}

/// Registrar API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// API key
    pub api_key: String,

    /// API secret
    /// ⚠️ NEVER log this value
    pub api_secret: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl RegistrarConfig {
    /// Create a configuration for the production endpoint
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: default_base_url(),
        }
    }

    /// Use a different API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate the registrar configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_empty() {
            return Err(crate::Error::config("Registrar API key cannot be empty"));
        }
        if self.api_secret.is_empty() {
            return Err(crate::Error::config("Registrar API secret cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Registrar base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the API secret
impl std::fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_base_url() -> String {
    GODADDY_API_BASE.to_string()
}

/// State store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateStoreConfig {
    /// File-based state store
    File {
        /// Path to the state file
        path: String,
    },

    /// In-memory state store (not persistent)
    #[default]
    Memory,
}

impl StateStoreConfig {
    /// Validate the state store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StateStoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("State file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}
