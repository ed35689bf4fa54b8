use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api: ApiSection,
    #[serde(default)]
    pub headers: HeaderSection,
    #[serde(default)]
    pub list: ListSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub name: String,
    pub base_url: String,
}

/// Static headers the backend expects on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSection {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_store_id")]
    pub store_id: String,
    #[serde(default = "default_ratio")]
    pub ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSection {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_language() -> String {
    "English".to_string()
}

fn default_store_id() -> String {
    "1".to_string()
}

fn default_ratio() -> String {
    "1500".to_string()
}

fn default_page_size() -> u32 {
    10
}

impl Default for HeaderSection {
    fn default() -> Self {
        Self {
            language: default_language(),
            store_id: default_store_id(),
            ratio: default_ratio(),
        }
    }
}

impl Default for ListSection {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

impl ApiConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read API config file: {}", path))?;

        let config: ApiConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse API config file: {}", path))?;

        Ok(config)
    }

    /// Headless fallback when no config file is present: everything comes
    /// from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("CATALOG_API_URL")
            .context("Missing environment variable: CATALOG_API_URL")?;

        Ok(ApiConfig {
            api: ApiSection {
                name: "catalog".to_string(),
                base_url,
            },
            headers: HeaderSection::default(),
            list: ListSection::default(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// The bearer token is credential material, not configuration; it is only
/// ever read from the environment, never from the config file.
pub fn token_from_env() -> Option<String> {
    env::var("CATALOG_API_TOKEN").ok().filter(|s| !s.is_empty())
}
