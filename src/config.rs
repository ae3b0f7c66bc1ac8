use anyhow::{Context, Result};
use std::path::PathBuf;

/// Remote API configuration.
///
/// Built once by the CLI glue (from environment variables) and passed into
/// the client constructor, so the client is testable with injected fake
/// credentials and endpoints. A missing credential aborts the run before any
/// network or file I/O happens.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Static per-process credential attached to every request.
    pub api_key: String,
    /// Base URL of the remote template API, without a trailing slash.
    pub base_url: String,
}

/// Default base URL of the marketing platform's public API.
pub const DEFAULT_API_BASE: &str = "https://api.iterable.com/api";

impl ApiConfig {
    /// Load the API configuration from the environment.
    ///
    /// `ITERABLE_API_KEY` is required; `ITERABLE_API_BASE` overrides the
    /// default base URL (useful for tests against a local stub).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ITERABLE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .context("ITERABLE_API_KEY environment variable is not set")?;

        let base_url = std::env::var("ITERABLE_API_BASE")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(ApiConfig { api_key, base_url })
    }
}

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/template-sync or ~/.config/template-sync
    /// - macOS: ~/Library/Application Support/template-sync
    /// - Windows: %APPDATA%\template-sync
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            // Follow XDG Base Directory Specification
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join("template-sync"))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join("template-sync"))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home
                .join("Library")
                .join("Application Support")
                .join("template-sync"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            if let Some(config) = dirs::config_dir() {
                Ok(config.join("template-sync"))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".template-sync"))
            }
        }
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("template-sync.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}
