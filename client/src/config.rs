use std::path::Path;

use serde::Deserialize;
use tracing::info;

/// Top-level client configuration, loaded from lodge.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiSection,
    pub local: LocalSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the notes service API.
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct LocalSection {
    /// Path of the offline data document.
    pub data_path: String,
}

impl Default for LocalSection {
    fn default() -> Self {
        Self {
            data_path: "lodge-data.json".into(),
        }
    }
}

impl ClientConfig {
    /// Load config from a TOML file. Falls back to defaults if the file
    /// doesn't exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = std::env::var("DATA_PATH") {
            self.local.data_path = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.local.data_path, "lodge-data.json");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://notes.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://notes.example.com/api");
        assert_eq!(config.local.data_path, "lodge-data.json");
    }
}
