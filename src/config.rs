//! Configuration handling

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FORMSMITH_DATA_DIR";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormsmithConfig {
    /// Where the form database and log file live
    pub data_dir: Option<PathBuf>,
    /// Acting user id
    pub actor_id: Option<String>,
    /// Grants the admin view
    pub is_admin: bool,
    /// Prefix of share links, e.g. `https://forms.example.com`
    pub share_base_url: Option<String>,
}

impl FormsmithConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "formsmith", "formsmith")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormsmithConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Data directory: `FORMSMITH_DATA_DIR`, then the configured path, then
    /// the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn data_dir_with(&self, env_override: Option<PathBuf>) -> PathBuf {
        env_override
            .or_else(|| self.data_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".formsmith"))
    }

    /// Link respondents open; the bare token when no base URL is configured
    pub fn share_link(&self, token: &str) -> String {
        match self.share_base_url.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => {
                format!("{}/submit/{token}", base.trim_end_matches('/'))
            }
            _ => token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormsmithConfig::default();
        assert!(config.data_dir.is_none());
        assert!(config.actor_id.is_none());
        assert!(!config.is_admin);
        assert!(config.share_base_url.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = FormsmithConfig {
            data_dir: Some(PathBuf::from("/tmp/forms")),
            actor_id: Some("alice".to_string()),
            is_admin: true,
            share_base_url: Some("https://forms.example.com".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: FormsmithConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.data_dir, Some(PathBuf::from("/tmp/forms")));
        assert_eq!(parsed.actor_id, Some("alice".to_string()));
        assert!(parsed.is_admin);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: FormsmithConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.actor_id.is_none());
        assert!(!parsed.is_admin);
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"actor_id": "bob", "unknown_field": "value"}"#;
        let parsed: FormsmithConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.actor_id, Some("bob".to_string()));
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = FormsmithConfig {
            data_dir: Some(PathBuf::from("/configured")),
            ..Default::default()
        };
        assert_eq!(
            config.data_dir_with(Some(PathBuf::from("/from-env"))),
            PathBuf::from("/from-env")
        );
        assert_eq!(config.data_dir_with(None), PathBuf::from("/configured"));
    }

    #[test]
    fn test_share_link() {
        let mut config = FormsmithConfig::default();
        assert_eq!(config.share_link("abc"), "abc");
        config.share_base_url = Some("https://forms.example.com/".to_string());
        assert_eq!(
            config.share_link("abc"),
            "https://forms.example.com/submit/abc"
        );
    }

    #[test]
    fn test_load_returns_ok() {
        // Passes whether or not a config file exists on this machine
        assert!(FormsmithConfig::load().is_ok());
    }
}
