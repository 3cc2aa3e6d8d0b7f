use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarotError {
    #[error("External API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Missing OPENAI_API_KEY (mode '{mode}' requires the external model)")]
    MissingCredential { mode: String },

    #[error("Responses API {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Responses API: empty or unrecognized output")]
    EmptyUpstreamOutput,

    #[error("Responses API did not answer within {seconds}s")]
    UpstreamTimeout { seconds: u64 },
}

/// 錯誤分類，決定 HTTP 狀態碼與是否可回退
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Configuration,
    Upstream,
    Persistence,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TarotError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest { .. } => ErrorCategory::Client,
            Self::ConfigError { .. }
            | Self::TomlError(_)
            | Self::InvalidConfigValueError { .. }
            | Self::MissingCredential { .. } => ErrorCategory::Configuration,
            Self::HttpError(_)
            | Self::UpstreamStatus { .. }
            | Self::EmptyUpstreamOutput
            | Self::UpstreamTimeout { .. } => ErrorCategory::Upstream,
            Self::IoError(_) => ErrorCategory::Persistence,
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client => ErrorSeverity::Low,
            ErrorCategory::Upstream | ErrorCategory::Persistence => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// HTTP 狀態碼：請求錯誤為 400，其餘一律 500
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            _ => 500,
        }
    }

    /// 外部服務錯誤在 auto 模式下可回退至示範內容
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Upstream
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => "Check the request body (cards, question, lang, consent)",
            ErrorCategory::Configuration => {
                "Set OPENAI_API_KEY or switch TAROT_MODE to 'demo' or 'auto'"
            }
            ErrorCategory::Upstream => "Retry later or run in 'auto' mode to fall back to demo output",
            ErrorCategory::Persistence => "Check that the data directory exists and is writable",
            ErrorCategory::Internal => "Report this issue with the request that triggered it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Client => format!("The request could not be processed: {}", self),
            ErrorCategory::Configuration => "The service is not configured correctly".to_string(),
            ErrorCategory::Upstream => "AI request failed".to_string(),
            ErrorCategory::Persistence => "Could not write to the local journal".to_string(),
            ErrorCategory::Internal => "An internal error occurred".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TarotError>;
