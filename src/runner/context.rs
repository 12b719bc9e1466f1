//! Execution context / 执行上下文
//!
//! Runtime settings merged into a run but never into the asset itself. They
//! are written to `context.yaml` next to the cases and mirrored as dispatcher
//! flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::core::models::EngineType;

/// File name of the context document inside a case directory.
pub const CONTEXT_FILE: &str = "context.yaml";

/// Keys written by the engine itself; free variables may not reuse them.
/// 由引擎自身写入的键，自由变量不得复用。
pub const RESERVED_KEYS: &[&str] = &[
    "ENGINE_TYPE",
    "BROWSER",
    "HEADLESS",
    "PLATFORM",
    "SERVER",
    "users",
    "spawn_rate",
    "run_time",
];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Engine-specific runtime configuration plus free variables.
/// 引擎相关的运行时配置以及自由变量。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(rename = "BROWSER", default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(rename = "HEADLESS", default, skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    #[serde(rename = "PLATFORM", default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(rename = "SERVER", default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    /// Variables available to `{{name}}` references / 可供 `{{name}}` 引用的变量
    #[serde(flatten)]
    pub variables: Map<String, Value>,
}

#[derive(Serialize)]
struct ContextDocument<'a> {
    #[serde(rename = "ENGINE_TYPE")]
    engine_type: EngineType,
    #[serde(flatten)]
    context: &'a ExecutionContext,
}

impl ExecutionContext {
    /// Adds a free variable. Reserved keys are ignored; set the typed field instead.
    /// 添加自由变量。保留键会被忽略，请改用对应的类型化字段。
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_key(&key) {
            self.variables.insert(key, value.into());
        }
        self
    }

    /// Dispatcher flags relevant to `engine`; settings of other engines are ignored.
    /// 与 `engine` 相关的调度器参数；其他引擎的设置会被忽略。
    pub fn engine_flags(&self, engine: EngineType) -> Vec<String> {
        let mut flags = Vec::new();
        match engine {
            EngineType::Web => {
                if let Some(browser) = &self.browser {
                    flags.push(format!("--browser={}", browser));
                }
                if let Some(headless) = self.headless {
                    flags.push(format!("--headless={}", headless));
                }
            }
            EngineType::Mobile => {
                if let Some(platform) = &self.platform {
                    flags.push(format!("--platform={}", platform));
                }
                if let Some(server) = &self.server {
                    flags.push(format!("--server={}", server));
                }
            }
            EngineType::Perf => {
                if let Some(users) = self.users {
                    flags.push(format!("--users={}", users));
                }
                if let Some(spawn_rate) = self.spawn_rate {
                    flags.push(format!("--spawn-rate={}", spawn_rate));
                }
                if let Some(run_time) = &self.run_time {
                    flags.push(format!("--run-time={}", run_time));
                }
            }
            EngineType::Api => {}
        }
        flags
    }

    /// Renders the `context.yaml` document for `engine`.
    /// Reserved keys left in `variables` are dropped so each key appears once.
    pub fn to_document(&self, engine: EngineType) -> Result<String> {
        let mut context = self.clone();
        context.variables.retain(|key, _| !is_reserved_key(key));
        let document = ContextDocument {
            engine_type: engine,
            context: &context,
        };
        serde_yaml::to_string(&document).context("Failed to render execution context")
    }
}

/// Reads the `ENGINE_TYPE` marker of a case directory, if any.
/// 读取用例目录中的 `ENGINE_TYPE` 标记（如果存在）。
pub fn read_engine_marker(dir: &Path) -> Option<EngineType> {
    let content = fs::read_to_string(dir.join(CONTEXT_FILE)).ok()?;
    let document: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
    document.get("ENGINE_TYPE")?.as_str()?.parse().ok()
}
