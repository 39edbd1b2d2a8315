//! # Client configuration: `projects.toml`
//!
//! Tunables of the client side, kept in a small TOML document. The web crate
//! bundles its `projects.toml` and hands the parsed value to the list view.
//!
//! ```toml
//! [notice]
//! ttl_ms = 3000   # how long a success notice stays visible
//! ```
//!
//! Every section derives `Default`, so a missing or empty file is equivalent to
//! the default configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub notice: NoticeConfig,
}

/// Success notice configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// Milliseconds before a success notice is cleared.
    #[serde(default = "default_notice_ttl")]
    pub ttl_ms: u64,
}

fn default_notice_ttl() -> u64 {
    3000
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_notice_ttl(),
        }
    }
}

impl ClientConfig {
    /// Builder method to set the notice lifetime.
    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice.ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice.ttl_ms)
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "projects.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse the bundled file, falling back to the defaults when it is broken.
    pub fn load(text: &str) -> Self {
        Self::from_toml(text).unwrap_or_else(|e| {
            tracing::warn!(
                file = Self::filename(),
                error = %e,
                "invalid client config, using defaults"
            );
            Self::default()
        })
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
