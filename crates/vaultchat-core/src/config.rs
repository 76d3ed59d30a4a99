use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions recognised as document references.
pub const DEFAULT_REFERENCE_EXTENSIONS: [&str; 9] =
    ["md", "txt", "pdf", "png", "jpg", "jpeg", "gif", "svg", "canvas"];

/// Extension appended when a reference does not resolve as written.
pub const DEFAULT_EXTENSION: &str = "md";

/// Maximum number of document suggestions offered at once.
pub const DEFAULT_FILE_SUGGESTION_LIMIT: usize = 10;

/// Tool name prefix for the document-store integration's tools.
pub const DEFAULT_INTEGRATION_PREFIX: &str = "mcp__obsidian__";

/// Rendering settings for the chat view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub reference_extensions: Vec<String>,
    pub default_extension: String,
    pub file_suggestion_limit: usize,
    pub integration_prefix: String,
    pub user_label: String,
    pub assistant_label: String,
    pub streaming_label: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference_extensions: DEFAULT_REFERENCE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            default_extension: DEFAULT_EXTENSION.to_string(),
            file_suggestion_limit: DEFAULT_FILE_SUGGESTION_LIMIT,
            integration_prefix: DEFAULT_INTEGRATION_PREFIX.to_string(),
            user_label: "You".to_string(),
            assistant_label: "Assistant".to_string(),
            streaming_label: "Thinking...".to_string(),
        }
    }
}

impl RenderConfig {
    /// Case-insensitive check against the configured reference extensions.
    pub fn has_reference_extension(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.reference_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
    }

    /// `path` with the default extension appended, unless it already ends with it.
    pub fn with_default_extension(&self, path: &str) -> Option<String> {
        let suffix = format!(".{}", self.default_extension);
        if path.ends_with(&suffix) {
            None
        } else {
            Some(format!("{path}{suffix}"))
        }
    }

    fn validate(self) -> Result<Self> {
        if self.reference_extensions.is_empty() {
            return Err(Error::Configuration(
                "reference_extensions must not be empty".to_string(),
            ));
        }
        if self.default_extension.is_empty() || self.default_extension.starts_with('.') {
            return Err(Error::Configuration(format!(
                "default_extension must be a bare extension, got '{}'",
                self.default_extension
            )));
        }
        Ok(self)
    }
}

/// Get the path to the render config file
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Configuration("Could not find config directory".to_string()))?
        .join("vaultchat");
    Ok(config_dir.join("render.toml"))
}

/// Load the render configuration, falling back to defaults when no file exists.
pub fn load_config() -> Result<RenderConfig> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        debug!(target: "config", "No config at {}, using defaults", config_path.display());
        return Ok(RenderConfig::default());
    }
    load_config_from(&config_path)
}

/// Load the render configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<RenderConfig> {
    let config_str = fs::read_to_string(path)?;
    let config: RenderConfig = toml::from_str(&config_str)?;
    config.validate()
}
