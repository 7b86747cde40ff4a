use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::internal::models::HACKER_NEWS_BASE_URL;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HnConfig {
    /// Site root every relative page path and vote href resolves against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Full-text search API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    HACKER_NEWS_BASE_URL.to_string()
}

fn default_search_endpoint() -> String {
    "https://hn.algolia.com/api/v1/search".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for HnConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_endpoint: default_search_endpoint(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl HnConfig {
    /// Load `config.ron` from the working directory or next to the
    /// executable, falling back to defaults when absent or unparseable.
    pub fn load() -> Self {
        let mut candidates = vec![PathBuf::from("config.ron")];
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match ron::from_str::<HnConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }
}
