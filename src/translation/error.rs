//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// 请求缺少必填字段或字段非法，在任何管道阶段之前被拒绝
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 标记无法完整解析，提取在尽力而为的树上继续进行
    #[error("markup parsed with {errors} recoverable error(s)")]
    ParseDegraded { errors: usize },

    /// 提供者链中的单个后端失败（传输错误、超时、格式错误或长度不匹配）
    #[error("{provider} failed: {reason}")]
    BackendFailure { provider: String, reason: String },

    /// 提供者链中的所有后端均失败
    #[error("All translation providers failed ({attempts} attempted). Last error: {last_error}")]
    AllProvidersExhausted { attempts: usize, last_error: String },

    /// 注入器收到的译文数量与提取单元数量不一致
    #[error("translation count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// 超时错误
    #[error("timed out: {0}")]
    TimeoutError(String),

    /// 配置错误
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("network error: {0}")]
    NetworkError(String),

    /// 序列化错误
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// 内部错误
    #[error("internal error: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 创建后端失败错误
    pub fn backend<P: fmt::Display, R: fmt::Display>(provider: P, reason: R) -> Self {
        TranslationError::BackendFailure {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }

    /// 检查错误是否只影响当前后端（提供者链可以继续尝试下一个后端）
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::BackendFailure { .. } => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::NetworkError(_) => true,
            TranslationError::SerializationError(_) => true,
            TranslationError::ParseDegraded { .. } => true,
            TranslationError::InvalidInput(_) => false,
            TranslationError::AllProvidersExhausted { .. } => false,
            TranslationError::LengthMismatch { .. } => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::ParseDegraded { .. } => ErrorSeverity::Info,
            TranslationError::BackendFailure { .. } => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::SerializationError(_) => ErrorSeverity::Warning,
            TranslationError::AllProvidersExhausted { .. } => ErrorSeverity::Error,
            TranslationError::LengthMismatch { .. } => ErrorSeverity::Critical,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::ParseDegraded { .. } => ErrorCategory::Parsing,
            TranslationError::BackendFailure { .. } => ErrorCategory::Backend,
            TranslationError::AllProvidersExhausted { .. } => ErrorCategory::Backend,
            TranslationError::LengthMismatch { .. } => ErrorCategory::Consistency,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            TranslationError::InvalidInput(msg)
            | TranslationError::TimeoutError(msg)
            | TranslationError::ConfigError(msg)
            | TranslationError::NetworkError(msg)
            | TranslationError::SerializationError(msg)
            | TranslationError::InternalError(msg) => {
                *msg = format!("{} ({})", msg, context);
            }
            TranslationError::BackendFailure { reason, .. } => {
                *reason = format!("{} ({})", reason, context);
            }
            TranslationError::AllProvidersExhausted { last_error, .. } => {
                *last_error = format!("{} ({})", last_error, context);
            }
            TranslationError::ParseDegraded { .. } | TranslationError::LengthMismatch { .. } => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Parsing,
    Backend,
    Consistency,
    Timeout,
    Configuration,
    Network,
    Serialization,
    Internal,
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else if error.is_decode() {
            TranslationError::SerializationError(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::InternalError(format!("I/O error: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(error.to_string())
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }
}
