//! # Configuration Module / 配置模块
//!
//! This module defines `TestEngine.toml`, the file that tells the generators
//! where to write assets and tells the runner how to invoke the external
//! test framework, how long to wait for it and where its reports land.
//! Every key has a default, so an empty or missing file is a valid config.
//!
//! 此模块定义 `TestEngine.toml`：它告诉生成器资产写到哪里，
//! 告诉运行器如何调用外部测试框架、等待多久以及报告存放在哪里。
//! 每个键都有默认值，因此空文件或缺失文件也是有效配置。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "TestEngine.toml";

/// Filesystem layout.
/// 文件系统布局。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root under which `<engine>-cases_<format>` directories are created.
    /// 创建 `<engine>-cases_<format>` 目录的根目录。
    pub cases_root: PathBuf,
    /// Directory where the external framework writes its reports.
    /// 外部框架写入报告的目录。
    pub reports_dir: PathBuf,
    /// Base for relative case directories passed to the runner.
    /// 传给运行器的相对用例目录的基准路径。
    pub workspace_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cases_root: PathBuf::from("cases"),
            reports_dir: PathBuf::from("reports"),
            workspace_root: PathBuf::from("."),
        }
    }
}

/// How the external test framework is invoked.
/// 外部测试框架的调用方式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Command line of the dispatcher. It is shell-expanded and split like a shell would.
    /// 调度器命令行，会进行 shell 展开并按 shell 规则拆分。
    pub command: String,
    /// Working directory of the child process / 子进程的工作目录
    pub working_dir: PathBuf,
    /// Hard ceiling for one run, in seconds / 单次运行的硬性时间上限（秒）
    pub timeout_secs: u64,
    /// Extra environment variables / 额外的环境变量
    pub env: BTreeMap<String, String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            command: "python -m testrun.cli".to_string(),
            working_dir: PathBuf::from("."),
            timeout_secs: 600,
            env: BTreeMap::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How much of the framework output is kept in results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub stdout_tail: usize,
    pub stderr_tail: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stdout_tail: 3000,
            stderr_tail: 1000,
        }
    }
}

/// Report discovery settings.
/// 报告发现设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Well-known file preferred as the latest report / 优先作为最新报告的固定文件名
    pub latest_name: String,
    /// Extensions considered report artifacts / 视为报告文件的扩展名
    pub extensions: Vec<String>,
    /// Characters of report text returned by a lookup / 查询时返回的报告文本字符数
    pub preview_chars: usize,
    /// How deep to search below the reports directory / 报告目录下的搜索深度
    pub max_depth: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            latest_name: "summary.txt".to_string(),
            extensions: ["html", "txt", "log", "json", "xml", "md"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            preview_chars: 5000,
            max_depth: 2,
        }
    }
}

/// Settings of the in-process quick API test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickTestConfig {
    pub request_timeout_secs: u64,
    pub body_preview_chars: usize,
}

impl Default for QuickTestConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            body_preview_chars: 2000,
        }
    }
}

/// Represents the entire configuration, loaded from a TOML file.
/// 代表从 TOML 文件加载的整个配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The language for console messages (e.g., "en", "zh-CN").
    /// 控制台消息的语言（例如 "en", "zh-CN"）。
    pub language: String,
    /// Suppresses progress lines on the console.
    /// 关闭控制台上的进度输出。
    pub quiet: bool,
    pub paths: PathsConfig,
    pub dispatcher: DispatcherConfig,
    pub output: OutputConfig,
    pub reports: ReportsConfig,
    pub quick_test: QuickTestConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            quiet: false,
            paths: PathsConfig::default(),
            dispatcher: DispatcherConfig::default(),
            output: OutputConfig::default(),
            reports: ReportsConfig::default(),
            quick_test: QuickTestConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TestEngine configuration")
    }

    /// Loads the configuration at `path`.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid TOML.
    ///
    /// 加载 `path` 处的配置。文件无法读取或 TOML 无效时返回错误。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    /// 若 `path` 存在则加载，否则返回默认配置。
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Renders the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize TestEngine configuration")
    }
}
