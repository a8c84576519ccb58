/// Configuration for the record client and the in-memory backend
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Container used when none is configured
pub const DEFAULT_CONTAINER_IDENTIFIER: &str = "iCloud.com.cloudnotes.app";

/// Records delivered per query page when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest page a single query request may ask for
const MAX_PAGE_SIZE: usize = 400;

/// Client configuration
///
/// All fields use `#[serde(default)]` so partial JSON files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Identifier of the cloud container records live in
    #[serde(default = "default_container_identifier")]
    pub container_identifier: String,

    /// Records delivered per query page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Limit applied to fetches whose filter sets none
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_results_limit: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            container_identifier: default_container_identifier(),
            page_size: default_page_size(),
            default_results_limit: None,
        }
    }
}

fn default_container_identifier() -> String {
    DEFAULT_CONTAINER_IDENTIFIER.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ClientConfig {
    /// Load configuration from a JSON file
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` - Loaded configuration, or defaults if the file doesn't exist
    /// * `Err(String)` - Error if the file cannot be read or parsed
    pub async fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.container_identifier.trim().is_empty() {
            return Err("container_identifier cannot be empty".to_string());
        }

        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size cannot exceed {}", MAX_PAGE_SIZE));
        }

        if self.default_results_limit == Some(0) {
            return Err("default_results_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}
