use crate::core::generator::DEFAULT_ATTEMPTS;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::roster::DEFAULT_OBSERVER_MARKER;
use crate::core::ConfigProvider;
use crate::utils::error::{BalancerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HISTORY_PATH: &str = "team_history.json";

/// 歷史紀錄上限的合理範圍
const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    pub history: HistoryConfig,
    pub search: SearchConfig,
    pub roster: RosterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: String,
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_HISTORY_PATH.to_string(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub attempts: usize,
    /// 固定亂數種子，方便重現結果
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub observer_marker: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            observer_marker: DEFAULT_OBSERVER_MARKER.to_string(),
        }
    }
}

impl BalancerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BalancerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BalancerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HISTORY_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BalancerError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("history.path", &self.history.path)?;
        validate_range("history.limit", self.history.limit, 1, MAX_HISTORY_LIMIT)?;
        validate_positive_number("search.attempts", self.search.attempts, 1)?;
        validate_non_empty_string("roster.observer_marker", &self.roster.observer_marker)?;
        Ok(())
    }
}

impl ConfigProvider for BalancerConfig {
    fn history_path(&self) -> &str {
        &self.history.path
    }

    fn history_limit(&self) -> usize {
        self.history.limit
    }

    fn attempts(&self) -> usize {
        self.search.attempts
    }

    fn observer_marker(&self) -> &str {
        &self.roster.observer_marker
    }
}

impl Validate for BalancerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = BalancerConfig::from_toml_str("").unwrap();

        assert_eq!(config, BalancerConfig::default());
        assert_eq!(config.history_path(), "team_history.json");
        assert_eq!(config.history_limit(), 5);
        assert_eq!(config.attempts(), 10);
        assert_eq!(config.observer_marker(), "📺");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[history]
path = "./data/history.json"
limit = 8

[search]
attempts = 25
seed = 42

[roster]
observer_marker = "[obs]"
"#;

        let config = BalancerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.history.path, "./data/history.json");
        assert_eq!(config.history_limit(), 8);
        assert_eq!(config.attempts(), 25);
        assert_eq!(config.search.seed, Some(42));
        assert_eq!(config.observer_marker(), "[obs]");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEAM_BALANCER_TEST_DIR", "/var/lib/teams");

        let toml_content = r#"
[history]
path = "${TEAM_BALANCER_TEST_DIR}/history.json"
"#;

        let config = BalancerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.history.path, "/var/lib/teams/history.json");

        std::env::remove_var("TEAM_BALANCER_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let zero_limit = BalancerConfig::from_toml_str("[history]\nlimit = 0\n").unwrap();
        assert!(zero_limit.validate().is_err());

        let zero_attempts = BalancerConfig::from_toml_str("[search]\nattempts = 0\n").unwrap();
        assert!(zero_attempts.validate().is_err());

        let empty_path = BalancerConfig::from_toml_str("[history]\npath = \"\"\n").unwrap();
        assert!(empty_path.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BalancerConfig::from_toml_str("[history\npath = 1").unwrap_err();
        assert!(matches!(err, BalancerError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[search]\nattempts = 3\n")
            .unwrap();

        let config = BalancerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.attempts(), 3);
        assert_eq!(config.history_limit(), 5);
    }
}
