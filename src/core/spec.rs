//! # Request Vocabulary Module / 请求词汇表模块
//!
//! Typed forms of the four generation requests and of the per-engine action,
//! assertion, extraction and scenario vocabularies.
//!
//! Lists of actions and assertions arrive as loose JSON objects. Each entry is
//! classified by its `type` first: a known type is decoded strictly and a
//! malformed entry fails the whole generation, while an unknown type is skipped
//! and reported as an [`UnrecognizedOperation`].
//!
//! 四种生成请求以及各引擎的操作、断言、提取和场景词汇表的类型化形式。
//! 操作与断言列表以松散的 JSON 对象传入：先按 `type` 分类，已知类型严格解码，
//! 格式错误会使整个生成失败；未知类型被跳过并作为 [`UnrecognizedOperation`] 报告。

use crate::core::error::{GenerationError, GenerationResult};
use crate::core::models::{EngineType, OperationKind, UnrecognizedOperation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Shared value types / 共享值类型
// ---------------------------------------------------------------------------

/// HTTP method of a request or load scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("unsupported HTTP method `{}`", other)),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_upper().to_string()
    }
}

/// Comparison operator used by JSON assertions and load-test checks.
/// Both the symbolic (`>=`) and the word (`gte`) spellings are accepted.
///
/// JSON 断言和性能检查使用的比较运算符，同时接受符号（`>=`）和单词（`gte`）写法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CompareOp {
    #[default]
    #[serde(rename = "==", alias = "eq", alias = "=")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = ">=", alias = "gte", alias = "ge")]
    Ge,
    #[serde(rename = "<=", alias = "lte", alias = "le")]
    Le,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in", alias = "not_in")]
    NotIn,
}

impl CompareOp {
    /// Python operator text.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        }
    }

    /// `in` and `not in` test membership rather than order or equality.
    pub fn is_membership(&self) -> bool {
        matches!(self, CompareOp::In | CompareOp::NotIn)
    }

    /// Word form used by declarative load-test checks.
    pub fn code(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Ge => "gte",
            CompareOp::Le => "lte",
            CompareOp::In => "in",
            CompareOp::NotIn => "not_in",
        }
    }
}

/// How an element is located on a page or screen.
/// 页面或屏幕上元素的定位方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    #[serde(alias = "css_selector")]
    Css,
    Id,
    Xpath,
    #[serde(alias = "accessibility-id", alias = "accessibility")]
    AccessibilityId,
    #[serde(alias = "class", alias = "class-name")]
    ClassName,
}

impl LocatorStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorStrategy::Css => "css",
            LocatorStrategy::Id => "id",
            LocatorStrategy::Xpath => "xpath",
            LocatorStrategy::AccessibilityId => "accessibility_id",
            LocatorStrategy::ClassName => "class_name",
        }
    }
}

/// A resolved element reference borrowed from an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub locator: &'a str,
    pub strategy: Option<LocatorStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// How `assert_url` compares the current URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMatch {
    #[default]
    Contains,
    Equals,
}

/// Think time between load-test requests, either fixed or a range.
/// 性能测试请求之间的思考时间，固定值或区间。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThinkTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ThinkTime {
    pub fn fixed(seconds: f64) -> Self {
        Self {
            seconds: Some(seconds),
            ..Self::default()
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            seconds: None,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Lower and upper bound in seconds.
    pub fn bounds(&self) -> (f64, f64) {
        let min = self.min.or(self.seconds).unwrap_or(1.0);
        let max = self.max.or(self.seconds).unwrap_or(min);
        (min, max.max(min))
    }

    fn check(&self) -> Result<(), String> {
        let values = [self.seconds, self.min, self.max];
        if values.iter().flatten().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err("think time must be a non-negative number of seconds".to_string());
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("think time min {} exceeds max {}", min, max));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vocabulary parsing / 词汇表解析
// ---------------------------------------------------------------------------

/// Post-decode checks that serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A `type`-tagged vocabulary of actions or assertions.
pub trait Vocabulary: DeserializeOwned + Validate {
    const KIND: OperationKind;
    /// The recognized `type` names.
    const TYPES: &'static [&'static str];
    /// The type assumed when an entry has no `type` key.
    const DEFAULT_TYPE: Option<&'static str> = None;
}

/// Recognized operations paired with their request positions, plus the skipped ones.
#[derive(Debug, Clone)]
pub struct ParsedOperations<T> {
    pub operations: Vec<(usize, T)>,
    pub skipped: Vec<UnrecognizedOperation>,
}

/// Classifies and decodes a list of loosely typed operations.
///
/// # Errors
/// Returns [`GenerationError::InvalidOperation`] when an entry is not an object,
/// has a non-string `type`, or is a known type with malformed fields.
///
/// 对松散类型的操作列表进行分类和解码。
pub fn parse_operations<T: Vocabulary>(raw: &[Value]) -> GenerationResult<ParsedOperations<T>> {
    let mut parsed = ParsedOperations {
        operations: Vec::with_capacity(raw.len()),
        skipped: Vec::new(),
    };

    for (index, value) in raw.iter().enumerate() {
        let invalid = |reason: String| GenerationError::InvalidOperation {
            kind: T::KIND,
            index,
            reason,
        };

        let Some(object) = value.as_object() else {
            return Err(invalid(format!("expected an object, got `{}`", value)));
        };

        let type_name = match object.get("type") {
            Some(Value::String(name)) => name.trim().to_string(),
            Some(other) => return Err(invalid(format!("`type` must be a string, got `{}`", other))),
            None => T::DEFAULT_TYPE.unwrap_or_default().to_string(),
        };

        if !T::TYPES.contains(&type_name.as_str()) {
            parsed.skipped.push(UnrecognizedOperation {
                index,
                kind: T::KIND,
                type_name,
            });
            continue;
        }

        let mut object = object.clone();
        object.insert("type".to_string(), Value::String(type_name));
        let operation: T =
            serde_json::from_value(Value::Object(object)).map_err(|e| invalid(e.to_string()))?;
        operation.validate().map_err(invalid)?;
        parsed.operations.push((index, operation));
    }

    Ok(parsed)
}

/// Decodes a list of untagged records (extractions, scenarios) strictly.
pub fn parse_records<T: DeserializeOwned + Validate>(
    raw: &[Value],
    kind: OperationKind,
) -> GenerationResult<Vec<T>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let invalid = |reason: String| GenerationError::InvalidOperation { kind, index, reason };
            let record: T = serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;
            record.validate().map_err(invalid)?;
            Ok(record)
        })
        .collect()
}

fn require_locator(locator: &str) -> Result<(), String> {
    if locator.trim().is_empty() {
        Err("`locator` must not be empty".to_string())
    } else {
        Ok(())
    }
}

fn default_wait_seconds() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_scroll_distance() -> u32 {
    500
}

fn default_status() -> u16 {
    200
}

fn default_max_ms() -> u64 {
    1000
}

fn default_root_url() -> String {
    "/".to_string()
}

fn default_weight() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// API vocabulary / API 词汇表
// ---------------------------------------------------------------------------

/// A value pulled out of a JSON response into a named variable.
/// 从 JSON 响应中提取到命名变量的值。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiExtract {
    #[serde(alias = "var_name")]
    pub name: String,
    #[serde(alias = "expression", alias = "path")]
    pub jsonpath: String,
    #[serde(default)]
    pub index: usize,
}

impl Validate for ApiExtract {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("`name` must not be empty".to_string());
        }
        if self.jsonpath.trim().is_empty() {
            return Err("`jsonpath` must not be empty".to_string());
        }
        Ok(())
    }
}

/// Assertions understood by the API generators.
/// API 生成器支持的断言。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiAssertion {
    StatusCode {
        #[serde(default = "default_status")]
        expected: u16,
    },
    Contains {
        expected: String,
    },
    Equals {
        value: Value,
        expected: Value,
    },
    Jsonpath {
        #[serde(alias = "path", alias = "expression")]
        jsonpath: String,
        expected: Value,
        #[serde(default)]
        operator: CompareOp,
    },
    ResponseTime {
        #[serde(default = "default_max_ms")]
        max_ms: u64,
    },
    JsonLength {
        #[serde(alias = "path", alias = "expression")]
        jsonpath: String,
        expected: u64,
        #[serde(default)]
        operator: CompareOp,
    },
}

impl Validate for ApiAssertion {
    fn validate(&self) -> Result<(), String> {
        match self {
            ApiAssertion::Jsonpath { jsonpath, .. } | ApiAssertion::JsonLength { jsonpath, .. }
                if jsonpath.trim().is_empty() =>
            {
                Err("`jsonpath` must not be empty".to_string())
            }
            ApiAssertion::JsonLength { operator, .. } if operator.is_membership() => Err(format!(
                "`operator` `{}` cannot compare a length",
                operator.symbol()
            )),
            _ => Ok(()),
        }
    }
}

impl Vocabulary for ApiAssertion {
    const KIND: OperationKind = OperationKind::Assertion;
    const TYPES: &'static [&'static str] = &[
        "status_code",
        "contains",
        "equals",
        "jsonpath",
        "response_time",
        "json_length",
    ];
    const DEFAULT_TYPE: Option<&'static str> = Some("status_code");
}

/// Request for an API test asset.
/// API 测试资产的生成请求。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCaseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Option<Map<String, Value>>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    /// Form body / 表单请求体
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default, alias = "json")]
    pub json_body: Option<Value>,
    #[serde(default)]
    pub extracts: Vec<Value>,
    #[serde(default)]
    pub asserts: Vec<Value>,
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
}

impl ApiCaseRequest {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GenerationResult<()> {
        require_text(&self.name, "name")?;
        require_text(&self.url, "url")
    }
}

// ---------------------------------------------------------------------------
// Web vocabulary / Web 词汇表
// ---------------------------------------------------------------------------

/// Browser actions and checks.
/// 浏览器操作与检查。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebAction {
    Click {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
    },
    Input {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        #[serde(default, alias = "value")]
        text: String,
    },
    Clear {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
    },
    Wait {
        #[serde(default = "default_wait_seconds")]
        seconds: f64,
    },
    Screenshot {
        #[serde(default)]
        filename: Option<String>,
    },
    AssertText {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        expected: String,
    },
    AssertTitle {
        expected: String,
    },
    AssertUrl {
        expected: String,
        #[serde(default, rename = "match")]
        match_mode: UrlMatch,
    },
    AssertElement {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        #[serde(default = "default_true")]
        visible: bool,
    },
    Hover {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
    },
    Select {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        value: String,
    },
    Scroll {
        #[serde(default)]
        direction: Direction,
        #[serde(default = "default_scroll_distance")]
        distance: u32,
    },
}

impl WebAction {
    /// The element this action works on, if any.
    pub fn target(&self) -> Option<Target<'_>> {
        match self {
            WebAction::Click { locator, locator_type }
            | WebAction::Input { locator, locator_type, .. }
            | WebAction::Clear { locator, locator_type }
            | WebAction::AssertText { locator, locator_type, .. }
            | WebAction::AssertElement { locator, locator_type, .. }
            | WebAction::Hover { locator, locator_type }
            | WebAction::Select { locator, locator_type, .. } => Some(Target {
                locator: locator.as_str(),
                strategy: *locator_type,
            }),
            _ => None,
        }
    }
}

impl Validate for WebAction {
    fn validate(&self) -> Result<(), String> {
        if let Some(target) = self.target() {
            require_locator(target.locator)?;
        }
        match self {
            WebAction::Wait { seconds } if *seconds < 0.0 || !seconds.is_finite() => {
                Err("`seconds` must be a non-negative number".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Vocabulary for WebAction {
    const KIND: OperationKind = OperationKind::Action;
    const TYPES: &'static [&'static str] = &[
        "click",
        "input",
        "clear",
        "wait",
        "screenshot",
        "assert_text",
        "assert_title",
        "assert_url",
        "assert_element",
        "hover",
        "select",
        "scroll",
    ];
}

/// Request for a web UI test asset.
/// Web UI 测试资产的生成请求。
#[derive(Debug, Clone, Deserialize)]
pub struct WebCaseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_browser")]
    pub browser: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default)]
    pub actions: Vec<Value>,
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
}

fn default_browser() -> String {
    "chromium".to_string()
}

impl WebCaseRequest {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
            browser: default_browser(),
            headless: true,
            actions: Vec::new(),
            save_path: None,
            class_name: None,
            feature: None,
            story: None,
        }
    }

    pub fn validate(&self) -> GenerationResult<()> {
        require_text(&self.name, "name")?;
        require_text(&self.url, "url")
    }
}

// ---------------------------------------------------------------------------
// Mobile vocabulary / 移动端词汇表
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MobilePlatform {
    #[default]
    #[serde(rename = "Android", alias = "android")]
    Android,
    #[serde(rename = "iOS", alias = "ios", alias = "IOS")]
    Ios,
}

impl MobilePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            MobilePlatform::Android => "Android",
            MobilePlatform::Ios => "iOS",
        }
    }

    /// Appium automation driver for the platform.
    pub fn automation_name(&self) -> &'static str {
        match self {
            MobilePlatform::Android => "UiAutomator2",
            MobilePlatform::Ios => "XCUITest",
        }
    }
}

/// Native app actions and checks.
/// 原生应用操作与检查。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MobileAction {
    Click {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
    },
    Input {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        #[serde(default, alias = "value")]
        text: String,
    },
    Clear {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
    },
    Swipe {
        #[serde(default = "default_swipe")]
        direction: Direction,
    },
    Wait {
        #[serde(default = "default_wait_seconds")]
        seconds: f64,
    },
    Screenshot {
        #[serde(default)]
        filename: Option<String>,
    },
    Back,
    AssertText {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        expected: String,
    },
    AssertElement {
        locator: String,
        #[serde(default)]
        locator_type: Option<LocatorStrategy>,
        #[serde(default = "default_true")]
        visible: bool,
    },
}

fn default_swipe() -> Direction {
    Direction::Up
}

impl MobileAction {
    pub fn target(&self) -> Option<Target<'_>> {
        match self {
            MobileAction::Click { locator, locator_type }
            | MobileAction::Input { locator, locator_type, .. }
            | MobileAction::Clear { locator, locator_type }
            | MobileAction::AssertText { locator, locator_type, .. }
            | MobileAction::AssertElement { locator, locator_type, .. } => Some(Target {
                locator: locator.as_str(),
                strategy: *locator_type,
            }),
            _ => None,
        }
    }
}

impl Validate for MobileAction {
    fn validate(&self) -> Result<(), String> {
        if let Some(target) = self.target() {
            require_locator(target.locator)?;
        }
        match self {
            MobileAction::Wait { seconds } if *seconds < 0.0 || !seconds.is_finite() => {
                Err("`seconds` must be a non-negative number".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Vocabulary for MobileAction {
    const KIND: OperationKind = OperationKind::Action;
    const TYPES: &'static [&'static str] = &[
        "click",
        "input",
        "clear",
        "swipe",
        "wait",
        "screenshot",
        "back",
        "assert_text",
        "assert_element",
    ];
}

/// Request for a mobile app test asset.
/// 移动端应用测试资产的生成请求。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileCaseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: MobilePlatform,
    #[serde(default)]
    pub app_package: String,
    #[serde(default)]
    pub app_activity: String,
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub actions: Vec<Value>,
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
}

impl MobileCaseRequest {
    pub fn validate(&self) -> GenerationResult<()> {
        require_text(&self.name, "name")?;
        match self.platform {
            MobilePlatform::Android => require_text(&self.app_package, "app_package"),
            MobilePlatform::Ios => require_text(&self.bundle_id, "bundle_id"),
        }
    }
}

// ---------------------------------------------------------------------------
// Load-test vocabulary / 性能测试词汇表
// ---------------------------------------------------------------------------

/// A JSON field check inside a load scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonCheck {
    #[serde(alias = "jsonpath")]
    pub path: String,
    pub expected: Value,
    #[serde(default)]
    pub operator: CompareOp,
}

/// One weighted request in a load test.
/// 性能测试中的一个带权重请求场景。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerfScenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default = "default_root_url", alias = "path")]
    pub url: String,
    #[serde(default)]
    pub headers: Option<Map<String, Value>>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default, alias = "json_body", alias = "body")]
    pub json: Option<Value>,
    #[serde(default, alias = "check_status")]
    pub expected_status: Option<u16>,
    #[serde(default)]
    pub max_response_ms: Option<u64>,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default)]
    pub json_checks: Vec<JsonCheck>,
    #[serde(default)]
    pub think_time: Option<ThinkTime>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl PerfScenario {
    /// Display name, falling back to `METHOD url`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} {}", self.method, self.url),
        }
    }
}

impl Validate for PerfScenario {
    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("`url` must not be empty".to_string());
        }
        if self.weight == 0 {
            return Err("`weight` must be at least 1".to_string());
        }
        if self.json_checks.iter().any(|c| c.path.trim().is_empty()) {
            return Err("json check `path` must not be empty".to_string());
        }
        match &self.think_time {
            Some(think_time) => think_time.check(),
            None => Ok(()),
        }
    }
}

/// Request for a load-test asset.
/// 性能测试资产的生成请求。
#[derive(Debug, Clone, Deserialize)]
pub struct PerfCaseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub scenarios: Vec<Value>,
    #[serde(default = "default_users")]
    pub users: u32,
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: f64,
    #[serde(default = "default_run_time")]
    pub run_time: String,
    /// Wait between tasks of one simulated user / 单个虚拟用户任务之间的等待时间
    #[serde(default)]
    pub think_time: Option<ThinkTime>,
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    #[serde(default)]
    pub class_name: Option<String>,
}

fn default_users() -> u32 {
    10
}

fn default_spawn_rate() -> f64 {
    1.0
}

fn default_run_time() -> String {
    "60s".to_string()
}

impl PerfCaseRequest {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            host: host.into(),
            scenarios: Vec::new(),
            users: default_users(),
            spawn_rate: default_spawn_rate(),
            run_time: default_run_time(),
            think_time: None,
            save_path: None,
            class_name: None,
        }
    }

    /// The task wait range in seconds, `(1, 3)` unless configured.
    pub fn wait_range(&self) -> (f64, f64) {
        self.think_time.map(|t| t.bounds()).unwrap_or((1.0, 3.0))
    }

    pub fn validate(&self) -> GenerationResult<()> {
        require_text(&self.name, "name")?;
        require_text(&self.host, "host")?;
        if self.scenarios.is_empty() {
            return Err(GenerationError::MissingField("scenarios"));
        }
        if self.users == 0 {
            return Err(GenerationError::InvalidField {
                field: "users",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.spawn_rate <= 0.0 || !self.spawn_rate.is_finite() {
            return Err(GenerationError::InvalidField {
                field: "spawn_rate",
                reason: "must be a positive number".to_string(),
            });
        }
        if let Some(think_time) = &self.think_time {
            think_time.check().map_err(|reason| GenerationError::InvalidField {
                field: "think_time",
                reason,
            })?;
        }
        Ok(())
    }
}

/// Any of the four generation requests, tagged by `engine_type`.
/// 四种生成请求之一，以 `engine_type` 区分。
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "engine_type", rename_all = "lowercase")]
pub enum GenerationRequest {
    Api(ApiCaseRequest),
    Web(WebCaseRequest),
    Mobile(MobileCaseRequest),
    Perf(PerfCaseRequest),
}

impl GenerationRequest {
    pub fn engine(&self) -> EngineType {
        match self {
            GenerationRequest::Api(_) => EngineType::Api,
            GenerationRequest::Web(_) => EngineType::Web,
            GenerationRequest::Mobile(_) => EngineType::Mobile,
            GenerationRequest::Perf(_) => EngineType::Perf,
        }
    }
}

fn require_text(value: &str, field: &'static str) -> GenerationResult<()> {
    if value.trim().is_empty() {
        Err(GenerationError::MissingField(field))
    } else {
        Ok(())
    }
}
