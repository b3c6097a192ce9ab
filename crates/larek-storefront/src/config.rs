//! Storefront configuration.

use std::path::Path;

use anyhow::{Context, Result};
use larek_commerce::checkout::ContactRules;
use larek_data::ApiConfig;
use larek_observability::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "LAREK_API_URL";
/// Environment variable overriding `api.cdn_url`.
pub const ENV_CDN_URL: &str = "LAREK_CDN_URL";
/// Environment variable overriding `logging.format`.
pub const ENV_LOG_FORMAT: &str = "LAREK_LOG_FORMAT";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Product service.
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Checkout behaviour.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl StorefrontConfig {
    /// Load config from a file; `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `LAREK_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(url) = lookup(ENV_CDN_URL) {
            self.api.cdn_url = url;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format
                .parse::<LogFormat>()
                .with_context(|| format!("Invalid {}: {}", ENV_LOG_FORMAT, format))?;
        }
        Ok(self)
    }

    /// Rules for the contacts form.
    pub fn contact_rules(&self) -> ContactRules {
        if self.checkout.strict_contacts {
            ContactRules::strict()
        } else {
            ContactRules::lenient()
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Check phone and email formats, not just presence.
    #[serde(default)]
    pub strict_contacts: bool,
}

/// Generate a default larek.toml config file.
pub fn generate_default_config() -> String {
    r#"# Web Larek storefront configuration

[api]
base_url = "https://larek-api.nomoreparties.co/api/weblarek"
cdn_url = "https://larek-api.nomoreparties.co/content/weblarek"
timeout_secs = 30

[logging]
format = "human"
level = "info"

[checkout]
strict_contacts = false
"#
    .to_string()
}
