//! # Generator Module / 生成器模块
//!
//! Turns typed requests into test assets on disk. Each engine has two
//! generators: a declarative one that writes a keyword-driven YAML document
//! and a script one that writes Python test source. `CaseGeneratorService`
//! picks the right one for an (engine, format) pair.
//!
//! 将类型化请求转换为磁盘上的测试资产。每个引擎有两个生成器：
//! 声明式生成器输出关键字驱动的 YAML 文档，脚本生成器输出 Python 测试源码。
//! `CaseGeneratorService` 根据（引擎，格式）选择对应生成器。

pub mod base;
pub mod declarative;
pub mod naming;
pub mod script;
pub mod service;

use crate::core::error::GenerationResult;
use crate::core::models::GeneratedAsset;

pub use base::BaseGenerator;
pub use service::CaseGeneratorService;

/// A generator for one engine and one output format.
/// 针对单一引擎和单一输出格式的生成器。
pub trait Generator {
    type Request;

    /// Validates the request, renders the asset, writes it and returns the envelope.
    fn generate(&self, request: &Self::Request) -> GenerationResult<GeneratedAsset>;
}
