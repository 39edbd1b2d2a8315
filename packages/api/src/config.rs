//! Backend configuration from environment variables.

use crate::error::BackendError;

const DEFAULT_TABLE: &str = "Projects";

/// Where the hosted backend lives and how to address the projects table.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the service, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    pub table: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Read `PROJECTS_BACKEND_URL`, `PROJECTS_BACKEND_ANON_KEY` and the optional
    /// `PROJECTS_TABLE` from the environment (after loading `.env`).
    ///
    /// Browser builds have no process environment, so values baked in at compile
    /// time are used as a fallback.
    pub fn from_env() -> Result<Self, BackendError> {
        dotenvy::dotenv().ok();

        let url = var("PROJECTS_BACKEND_URL", option_env!("PROJECTS_BACKEND_URL"))
            .ok_or_else(|| BackendError::Config("PROJECTS_BACKEND_URL not set".to_string()))?;
        let anon_key = var(
            "PROJECTS_BACKEND_ANON_KEY",
            option_env!("PROJECTS_BACKEND_ANON_KEY"),
        )
        .ok_or_else(|| BackendError::Config("PROJECTS_BACKEND_ANON_KEY not set".to_string()))?;
        let table = var("PROJECTS_TABLE", option_env!("PROJECTS_TABLE"))
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self::new(url, anon_key).with_table(table))
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }

    pub(crate) fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

fn var(name: &str, baked: Option<&'static str>) -> Option<String> {
    std::env::var(name)
        .ok()
        .or_else(|| baked.map(str::to_string))
        .filter(|value| !value.is_empty())
}
