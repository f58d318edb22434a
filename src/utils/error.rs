use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalancerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Roster is empty: no eligible participants to balance")]
    EmptyRosterError,

    #[error("Failed to commit team history to '{path}': {source}")]
    HistoryCommitError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BalancerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BalancerError::ConfigError { .. }
            | BalancerError::ConfigValidationError { .. }
            | BalancerError::InvalidConfigValueError { .. }
            | BalancerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BalancerError::EmptyRosterError | BalancerError::CsvError(_) => ErrorCategory::Input,
            BalancerError::IoError(_) | BalancerError::HistoryCommitError { .. } => {
                ErrorCategory::Storage
            }
            BalancerError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 沒有可分組的成員，不算失敗
            BalancerError::EmptyRosterError => ErrorSeverity::Low,
            // 寫入失敗可由呼叫端重試
            BalancerError::HistoryCommitError { .. } | BalancerError::IoError(_) => {
                ErrorSeverity::Medium
            }
            BalancerError::ConfigError { .. }
            | BalancerError::ConfigValidationError { .. }
            | BalancerError::InvalidConfigValueError { .. }
            | BalancerError::MissingConfigError { .. }
            | BalancerError::CsvError(_) => ErrorSeverity::High,
            BalancerError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set exactly one of --team-count or --team-size (at least 1), pass --participants or --roster-file, and check the config file"
            }
            ErrorCategory::Input => "Make sure at least one non-bot, non-observer participant is in the roster",
            ErrorCategory::Storage => {
                "Check that the history file location exists and is writable, then retry"
            }
            ErrorCategory::Data => "The history could not be encoded; report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BalancerError::EmptyRosterError => "沒有可分組的成員".to_string(),
            BalancerError::HistoryCommitError { path, .. } => {
                format!("分組結果未能寫入歷史紀錄 ({})", path)
            }
            BalancerError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值錯誤 {}: {}", field, reason)
            }
            BalancerError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            other => other.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        BalancerError::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BalancerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BalancerError::InvalidConfigValueError {
            field: "team_size".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("team_size"));
    }

    #[test]
    fn test_commit_error_is_retryable() {
        let err = BalancerError::HistoryCommitError {
            path: "team_history.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("team_history.json"));
    }

    #[test]
    fn test_empty_roster_is_low_severity() {
        assert_eq!(BalancerError::EmptyRosterError.severity(), ErrorSeverity::Low);
    }
}
