//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the generators, the
//! runner and the report service: engine and format selectors, generation
//! envelopes, execution results and statistics.
//!
//! 此模块定义了生成器、运行器和报告服务共享的数据结构：
//! 引擎与格式选择器、生成结果封装、执行结果和统计信息。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// The four supported test engines.
/// 支持的四种测试引擎。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// HTTP API tests / HTTP 接口测试
    Api,
    /// Browser UI tests / 浏览器 UI 测试
    Web,
    /// Native app tests / 原生应用测试
    Mobile,
    /// Load tests / 性能测试
    Perf,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [
        EngineType::Api,
        EngineType::Web,
        EngineType::Mobile,
        EngineType::Perf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineType::Api => "api",
            EngineType::Web => "web",
            EngineType::Mobile => "mobile",
            EngineType::Perf => "perf",
        }
    }

    /// Name of the per-engine case directory for the given format,
    /// e.g. `api-cases_yaml` or `perf-cases_pytest`.
    pub fn cases_dir_name(&self, format: CaseFormat) -> String {
        format!("{}-cases_{}", self.as_str(), format.dir_suffix())
    }

    /// Infers the engine from a directory name by substring.
    /// Anything that mentions no other engine is treated as `Api`.
    ///
    /// 通过子串从目录名推断引擎，未匹配时视为 `Api`。
    pub fn from_dir_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("web") {
            EngineType::Web
        } else if lower.contains("mobile") {
            EngineType::Mobile
        } else if lower.contains("perf") {
            EngineType::Perf
        } else {
            EngineType::Api
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api" => Ok(EngineType::Api),
            "web" => Ok(EngineType::Web),
            "mobile" => Ok(EngineType::Mobile),
            "perf" | "performance" => Ok(EngineType::Perf),
            other => Err(format!("unknown engine type `{}`", other)),
        }
    }
}

/// Output format of a generated asset.
/// 生成资产的输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFormat {
    /// Keyword-driven data document (YAML) / 关键字驱动的数据文档（YAML）
    #[serde(alias = "yaml")]
    Declarative,
    /// Executable test source (Python) / 可执行的测试源码（Python）
    #[default]
    #[serde(alias = "pytest")]
    Script,
}

impl CaseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseFormat::Declarative => "declarative",
            CaseFormat::Script => "script",
        }
    }

    fn dir_suffix(&self) -> &'static str {
        match self {
            CaseFormat::Declarative => "yaml",
            CaseFormat::Script => "pytest",
        }
    }

    /// File extension of assets in this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            CaseFormat::Declarative => "yaml",
            CaseFormat::Script => "py",
        }
    }

    /// Picks the format from a file extension; `None` for unrelated files.
    /// 根据文件扩展名选择格式；无关文件返回 `None`。
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(CaseFormat::Declarative),
            "py" => Some(CaseFormat::Script),
            _ => None,
        }
    }
}

impl fmt::Display for CaseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "declarative" | "yaml" => Ok(CaseFormat::Declarative),
            "script" | "pytest" => Ok(CaseFormat::Script),
            other => Err(format!("unknown case format `{}`", other)),
        }
    }
}

/// Which list an operation came from.
/// 操作所属的列表类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Action,
    Assertion,
    Extract,
    Scenario,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Action => "action",
            OperationKind::Assertion => "assertion",
            OperationKind::Extract => "extract",
            OperationKind::Scenario => "scenario",
        };
        f.write_str(name)
    }
}

/// An action or assertion whose `type` is outside the engine's vocabulary.
/// It is skipped during generation and reported back to the caller.
///
/// `type` 不在引擎词汇表中的操作或断言。生成时跳过，并报告给调用方。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrecognizedOperation {
    /// Position in the request list / 在请求列表中的位置
    pub index: usize,
    pub kind: OperationKind,
    /// The unknown type name as given, empty when absent / 原始类型名，缺失时为空
    pub type_name: String,
}

impl fmt::Display for UnrecognizedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} has unknown type `{}`", self.kind, self.index, self.type_name)
    }
}

/// The envelope returned by every successful generation.
/// 每次成功生成返回的结果封装。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAsset {
    pub success: bool,
    pub message: String,
    /// Full text of the asset / 资产的完整文本
    pub content: String,
    /// Where the asset was written / 资产写入的位置
    pub save_path: PathBuf,
    pub engine_type: EngineType,
    pub format: CaseFormat,
    /// Suggested command for running the asset (load-test scripts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_command: Option<String>,
    /// Operations dropped because their type was not recognized.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<UnrecognizedOperation>,
}

/// Counters parsed from the external framework's output.
/// 从外部框架输出中解析出的计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    #[serde(default)]
    pub errors: u32,
    #[serde(default)]
    pub total: u32,
}

impl Statistics {
    /// Builds statistics whose total is `passed + failed + skipped`,
    /// saturating at `u32::MAX` for counts read from untrusted output.
    pub fn new(passed: u32, failed: u32, skipped: u32) -> Self {
        Self {
            passed,
            failed,
            skipped,
            errors: 0,
            total: passed.saturating_add(failed).saturating_add(skipped),
        }
    }

    pub fn with_errors(mut self, errors: u32) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Percentage of passed tests, `0.0` when nothing ran.
    /// 通过率百分比，无结果时为 `0.0`。
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.passed) / f64::from(self.total) * 100.0
        }
    }
}

/// Enumerates the reasons an execution did not succeed.
/// 枚举执行未成功的原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The case directory or file could not be prepared / 无法准备用例目录或文件
    Preparation,
    /// The requested path does not exist / 请求的路径不存在
    NotFound,
    /// The external framework could not be started / 无法启动外部框架
    Launch,
    /// The external framework ran and reported failures / 外部框架运行并报告了失败
    TestsFailed,
    /// The run exceeded its time ceiling / 运行超出时间上限
    Timeout,
}

/// Tails of the framework's output streams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTail {
    pub stdout: String,
    pub stderr: String,
}

/// Metadata of one report artifact.
/// 单个报告文件的元数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInfo {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

/// The structured outcome of one execution request.
/// Every runner entry point returns one of these; none of them raise.
///
/// 一次执行请求的结构化结果。所有运行器入口都返回它，不会抛出错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<EngineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputTail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set for single-file runs / 单文件运行时设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_file: Option<PathBuf>,
    /// Set for directory runs / 目录运行时设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases_dir: Option<PathBuf>,
    /// Number of case files found in a directory run / 目录运行中发现的用例文件数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_count: Option<usize>,
    /// Number of cases submitted in a batch / 批量提交的用例数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cases: Option<usize>,
}

impl ExecutionResult {
    /// A failure that happened before or instead of a framework run.
    pub fn failure(reason: FailureReason, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            duration_seconds: 0.0,
            engine_type: None,
            return_code: None,
            statistics: Statistics::default(),
            report: None,
            output: None,
            failure_reason: Some(reason),
            error: Some(error.into()),
            case_file: None,
            cases_dir: None,
            case_count: None,
            total_cases: None,
        }
    }

    /// The result reported when a run hits its time ceiling.
    /// The duration equals the ceiling and the error is exactly `"Timeout"`.
    ///
    /// 运行达到时间上限时的结果：耗时等于上限，错误固定为 `"Timeout"`。
    pub fn timeout(engine: EngineType, ceiling: Duration) -> Self {
        let mut result = Self::failure(
            FailureReason::Timeout,
            format!("test execution timed out after {} seconds", ceiling.as_secs()),
            "Timeout",
        );
        result.duration_seconds = ceiling.as_secs_f64();
        result.engine_type = Some(engine);
        result
    }

    pub fn with_engine(mut self, engine: EngineType) -> Self {
        self.engine_type = Some(engine);
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.failure_reason == Some(FailureReason::Timeout)
    }
}
