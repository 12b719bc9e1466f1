//! # Core Module / 核心模块
//!
//! This module contains the shared building blocks of TestEngine:
//! engine and result models, the typed request vocabularies, the
//! configuration file and the generation error type.
//!
//! 此模块包含 TestEngine 的共享基础部分：
//! 引擎与结果模型、类型化的请求词汇表、配置文件以及生成错误类型。

pub mod config;
pub mod error;
pub mod models;
pub mod spec;

// Re-exports
pub use config::EngineConfig;
pub use error::{GenerationError, GenerationResult};
pub use models::{CaseFormat, EngineType, ExecutionResult, GeneratedAsset, Statistics};
