//! # Error Types Module / 错误类型模块
//!
//! Generation failures are reported as a typed error so callers can tell a bad
//! request apart from a failed write. Execution failures never surface here:
//! the runner folds them into an `ExecutionResult`.
//!
//! 生成失败以类型化错误报告，调用方可以区分错误的请求和写入失败。
//! 执行失败不会出现在这里：运行器会将其折叠进 `ExecutionResult`。

use crate::core::models::OperationKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a request into a persisted test asset.
/// 将请求转换为持久化测试资产时产生的错误。
#[derive(Error, Debug)]
pub enum GenerationError {
    /// A required request field is absent or empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A request field is present but unusable.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A recognized action, assertion, extraction or scenario is malformed.
    #[error("{kind} #{index} is malformed: {reason}")]
    InvalidOperation {
        kind: OperationKind,
        index: usize,
        reason: String,
    },

    /// Caller-supplied declarative text could not be accepted.
    #[error("declarative document rejected: {0}")]
    InvalidDeclarative(String),

    /// The asset could not be written to disk.
    #[error("failed to write asset to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The declarative document could not be rendered.
    #[error("failed to render declarative document: {0}")]
    Render(#[from] serde_yaml::Error),
}

/// Shorthand for results of generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
