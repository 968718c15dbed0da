use std::path::PathBuf;
use thiserror::Error;

/// 外部工具所在的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// gol query: 依邊界挑出所有要素，輸出 XML
    Query,
    /// osmium extract: 精確裁切並輸出 PBF
    Clip,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Query => write!(f, "query"),
            Stage::Clip => write!(f, "clip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Pipeline,
    Workspace,
    Audit,
    Configuration,
    Internal,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("'{command}' exited with {}: {stderr}", describe_exit(.exit_code))]
    PipelineError {
        stage: Stage,
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to launch '{command}': {source}")]
    ToolLaunchError {
        stage: Stage,
        command: String,
        #[source]
        source: std::io::Error,
    },

    // 路徑只留給日誌，不放進對外訊息
    #[error("Workspace operation failed: {source}")]
    WorkspaceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audit log append failed: {source}")]
    AuditError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request task failed: {message}")]
    TaskError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ExtractError {
    pub fn validation(message: impl Into<String>) -> Self {
        ExtractError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::ValidationError { .. } => ErrorCategory::Validation,
            ExtractError::PipelineError { .. } | ExtractError::ToolLaunchError { .. } => {
                ErrorCategory::Pipeline
            }
            ExtractError::WorkspaceError { .. } => ErrorCategory::Workspace,
            ExtractError::AuditError { .. } => ErrorCategory::Audit,
            ExtractError::ConfigError { .. }
            | ExtractError::ConfigValidationError { .. }
            | ExtractError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ExtractError::TaskError { .. }
            | ExtractError::IoError(_)
            | ExtractError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// 失敗的工具階段（若有）
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExtractError::PipelineError { stage, .. }
            | ExtractError::ToolLaunchError { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
