//! Client configuration loading.
//!
//! Reads `config.toml` from the user config directory
//! (`~/.config/docuchat/` on Linux) and deserializes it into
//! [`ClientConfig`]. Falls back to defaults when the file is missing or
//! malformed. The base URL resolves in priority order: explicit override
//! (CLI flag) > `DOCUCHAT_API_URL` environment variable > config file >
//! compiled default.

use std::path::{Path, PathBuf};

use docuchat_types::config::ClientConfig;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "DOCUCHAT_API_URL";

/// Default location of the config file, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("docuchat").join("config.toml"))
}

/// Load configuration from a config file path.
///
/// - Missing file: returns [`ClientConfig::default()`].
/// - Unreadable or unparseable file: logs a warning, returns the default.
pub async fn load_config(path: &Path) -> ClientConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            ClientConfig::default()
        }
    }
}

/// Apply the override chain on top of a loaded config.
///
/// `explicit` is a CLI-level override and wins over everything; the
/// environment variable wins over the file value.
pub fn resolve_base_url(config: &mut ClientConfig, explicit: Option<String>) {
    if let Some(url) = explicit {
        config.base_url = url;
        return;
    }
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docuchat_types::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_valid_file_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(
            &path,
            "base_url = \"https://qa.internal:8443\"\nrequest_timeout_secs = 60\n",
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.base_url, "https://qa.internal:8443");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_invalid_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_explicit_override_wins() {
        let mut config = ClientConfig::default();
        resolve_base_url(&mut config, Some("http://flagged:1234".to_string()));
        assert_eq!(config.base_url, "http://flagged:1234");
    }
}
