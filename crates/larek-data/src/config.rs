//! Product service connection settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the product service and its image CDN live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API (`/product`, `/order` are appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL that item image paths are resolved against.
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://larek-api.nomoreparties.co/api/weblarek".to_string()
}

fn default_cdn_url() -> String {
    "https://larek-api.nomoreparties.co/content/weblarek".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cdn_url: default_cdn_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
