//! # Declarative Format Module / 声明式格式模块
//!
//! The keyword-driven document shared by the four declarative generators.
//! A document has a description, an optional load profile and an ordered list
//! of steps. Each step is a single-entry mapping from a human-readable label
//! to a body holding the keyword under [`KEYWORD_FIELD`] plus its arguments:
//!
//! ```yaml
//! desc: user login
//! steps:
//! - send login request:
//!     关键字: send_request
//!     url: https://example.com/login
//!     method: POST
//! - check status:
//!     关键字: assert_status_code
//!     expected_code: 200
//! ```
//!
//! 四个声明式生成器共享的关键字驱动文档。文档包含描述、可选的负载配置和有序步骤列表。
//! 每个步骤是一个单条目映射：键为可读标签，值为包含关键字（位于 [`KEYWORD_FIELD`]）及其参数的主体。

pub mod api;
pub mod mobile;
pub mod perf;
pub mod web;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{GenerationError, GenerationResult};

pub use api::ApiDeclarativeGenerator;
pub use mobile::MobileDeclarativeGenerator;
pub use perf::PerfDeclarativeGenerator;
pub use web::WebDeclarativeGenerator;

/// Key under which a step body names its keyword.
/// 步骤主体中存放关键字名的键。
pub const KEYWORD_FIELD: &str = "关键字";

/// One labeled keyword invocation.
/// 一次带标签的关键字调用。
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub label: String,
    pub keyword: String,
    pub args: Map<String, Value>,
}

impl Step {
    pub fn new(label: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            keyword: keyword.into(),
            args: Map::new(),
        }
    }

    /// Adds an argument.
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Adds an argument only when `value` is present.
    pub fn arg_opt<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.arg(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }
}

/// Serializes the body with the keyword first, then the arguments in order.
struct StepBody<'a>(&'a Step);

impl Serialize for StepBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.args.len() + 1))?;
        map.serialize_entry(KEYWORD_FIELD, &self.0.keyword)?;
        for (key, value) in &self.0.args {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &StepBody(self))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entry = Map::<String, Value>::deserialize(deserializer)?;
        if entry.len() != 1 {
            return Err(de::Error::custom(format!(
                "a step must have exactly one label, found {}",
                entry.len()
            )));
        }
        let Some((label, body)) = entry.into_iter().next() else {
            return Err(de::Error::custom("empty step"));
        };
        let Value::Object(mut args) = body else {
            return Err(de::Error::custom(format!("step `{}` has no keyword body", label)));
        };
        let keyword = match args.remove(KEYWORD_FIELD) {
            Some(Value::String(keyword)) => keyword,
            _ => {
                return Err(de::Error::custom(format!(
                    "step `{}` is missing `{}`",
                    label, KEYWORD_FIELD
                )));
            }
        };
        Ok(Step { label, keyword, args })
    }
}

/// The load profile carried once at the top of a load-test document.
/// 负载测试文档顶部的负载配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub host: String,
    pub users: u32,
    pub spawn_rate: f64,
    pub run_time: String,
    pub wait_min: f64,
    pub wait_max: f64,
}

/// A complete declarative document.
/// 完整的声明式文档。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeCase {
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<LoadProfile>,
    pub steps: Vec<Step>,
}

impl DeclarativeCase {
    pub fn new(desc: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            name: Some(name.into()),
            config: None,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Keywords of all steps, in order.
    pub fn keywords(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.keyword.as_str()).collect()
    }

    pub fn to_yaml(&self) -> GenerationResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parses a document, rejecting text that is not a declarative case.
    pub fn from_yaml(text: &str) -> GenerationResult<Self> {
        serde_yaml::from_str(text).map_err(|e| GenerationError::InvalidDeclarative(e.to_string()))
    }
}

/// Picks the document description: the request description, or the name.
pub(crate) fn describe(description: &str, name: &str) -> String {
    if description.trim().is_empty() {
        name.to_string()
    } else {
        description.to_string()
    }
}
