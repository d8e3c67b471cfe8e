use serde::{Deserialize, Serialize};

use crate::common::types::AnyResult;
use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn load() -> AnyResult<Self> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            "config.toml"
        } else if std::path::Path::new("config.default.toml").exists() {
            "config.default.toml"
        } else {
            return Err("config.toml or config.default.toml not found".into());
        };

        let config_str = std::fs::read_to_string(config_path)?;
        if config_str.is_empty() {
            return Err(format!("{} is empty", config_path).into());
        }

        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [gateway]
            base_url = "http://catalog.local:8000"

            [player]
            heartbeat_interval_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.base_url, "http://catalog.local:8000");
        assert_eq!(config.player.heartbeat_interval_secs, 5);
        // Untouched fields fall back to defaults.
        assert_eq!(config.player.resume_grace_secs, 1.0);
        assert!(config.player.record_history);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.player.heartbeat_interval_secs, 10);
        assert_eq!(config.gateway.timeout_secs, 15);
    }
}
