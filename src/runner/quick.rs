//! # Quick API Test / 快速接口测试
//!
//! One ad-hoc HTTP request checked in process, without generating an asset
//! or starting the external framework. Every supplied assertion is evaluated,
//! so a failing status check still reports the JSON checks that follow it.
//!
//! 在进程内发送一次临时 HTTP 请求并检查结果，不生成资产也不启动外部框架。
//! 所有断言都会被评估，状态码失败时后续的 JSON 检查仍会报告结果。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::core::spec::HttpMethod;
use crate::infra::command::head;
use crate::runner::jsonpath;

fn default_expected_status() -> u16 {
    200
}

/// Input of [`run_api_test`].
/// [`run_api_test`] 的输入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickApiRequest {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// Form body, sent only when `json` is absent / 表单请求体，仅在没有 `json` 时发送
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, alias = "json_body", skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_contains: Option<String>,
    /// JSONPath → expected value / JSONPath → 期望值
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub expected_json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_time_ms: Option<u64>,
}

impl QuickApiRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            data: None,
            json: None,
            expected_status: default_expected_status(),
            expected_contains: None,
            expected_json: Map::new(),
            max_response_time_ms: None,
        }
    }

    pub fn expect_json(mut self, path: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.expected_json.insert(path.into(), expected.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    StatusCode,
    ResponseTime,
    Contains,
    JsonPath,
}

/// Outcome of one in-process assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionOutcome {
    pub name: String,
    pub kind: AssertionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub expected: Value,
    /// `null` when nothing could be observed / 无法观察到时为 `null`
    pub actual: Value,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    /// Body text, cut to the configured preview length / 截断到预览长度的响应文本
    pub text: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl AssertionSummary {
    pub fn of(outcomes: &[AssertionOutcome]) -> Self {
        let passed = outcomes.iter().filter(|o| o.passed).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
        }
    }
}

/// Result of [`run_api_test`]. `success` holds only when the request went
/// through and every assertion passed.
///
/// [`run_api_test`] 的结果。仅当请求成功且所有断言通过时 `success` 为真。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickApiResult {
    pub success: bool,
    pub message: String,
    pub duration_seconds: f64,
    pub request: QuickApiRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,
    pub assertions: Vec<AssertionOutcome>,
    pub summary: AssertionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Evaluates every assertion of `request` against an observed response.
///
/// Order: status code, response time, body substring, then the JSON checks in
/// the order given. The response time and substring checks only exist when
/// requested. A JSON check against a body that is not JSON fails with an
/// error note; a path that matches nothing fails with a `null` actual value.
///
/// 针对观察到的响应评估 `request` 的全部断言，不会提前中断。
pub fn evaluate(request: &QuickApiRequest, status: u16, elapsed: Duration, body: &str) -> Vec<AssertionOutcome> {
    let mut outcomes = Vec::new();

    outcomes.push(AssertionOutcome {
        name: format!("status code == {}", request.expected_status),
        kind: AssertionKind::StatusCode,
        path: None,
        expected: Value::from(request.expected_status),
        actual: Value::from(status),
        passed: status == request.expected_status,
        error: None,
    });

    if let Some(max_ms) = request.max_response_time_ms {
        let elapsed_ms = elapsed.as_millis() as u64;
        outcomes.push(AssertionOutcome {
            name: format!("response time <= {} ms", max_ms),
            kind: AssertionKind::ResponseTime,
            path: None,
            expected: Value::from(max_ms),
            actual: Value::from(elapsed_ms),
            passed: elapsed_ms <= max_ms,
            error: None,
        });
    }

    if let Some(needle) = &request.expected_contains {
        outcomes.push(AssertionOutcome {
            name: format!("body contains {:?}", needle),
            kind: AssertionKind::Contains,
            path: None,
            expected: Value::from(needle.as_str()),
            actual: Value::Null,
            passed: body.contains(needle.as_str()),
            error: None,
        });
    }

    if !request.expected_json.is_empty() {
        let parsed: Result<Value, _> = serde_json::from_str(body);
        for (path, expected) in &request.expected_json {
            let mut outcome = AssertionOutcome {
                name: format!("{} == {}", path, expected),
                kind: AssertionKind::JsonPath,
                path: Some(path.clone()),
                expected: expected.clone(),
                actual: Value::Null,
                passed: false,
                error: None,
            };
            match &parsed {
                Err(e) => outcome.error = Some(format!("response body is not JSON: {}", e)),
                Ok(document) => match jsonpath::first(document, path) {
                    Err(e) => outcome.error = Some(e.to_string()),
                    Ok(None) => outcome.error = Some(format!("no value at {}", path)),
                    Ok(Some(actual)) => {
                        outcome.passed = values_match(actual, expected);
                        outcome.actual = actual.clone();
                    }
                },
            }
            outcomes.push(outcome);
        }
    }

    outcomes
}

/// JSON equality where `1` and `1.0` are the same number.
pub fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

/// Sends `request` with `client` and checks the response in process.
///
/// Transport failures (bad URL, refused connection, client timeout) come back
/// as `success: false` with `error` set; this function never fails.
///
/// 使用 `client` 发送 `request` 并在进程内检查响应。传输失败会以
/// `success: false` 和 `error` 返回，此函数本身不会失败。
pub async fn run_api_test(client: &reqwest::Client, request: QuickApiRequest, body_preview_chars: usize) -> QuickApiResult {
    let started = Instant::now();

    let method = match reqwest::Method::from_bytes(request.method.as_upper().as_bytes()) {
        Ok(method) => method,
        Err(e) => return transport_failure(request, started, e.to_string()),
    };
    let mut builder = client.request(method, &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !request.params.is_empty() {
        builder = builder.query(&request.params);
    }
    if let Some(json) = &request.json {
        builder = builder.json(json);
    } else if let Some(data) = &request.data {
        builder = builder.form(data);
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => return transport_failure(request, started, e.to_string()),
    };
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return transport_failure(request, started, e.to_string()),
    };
    let elapsed = started.elapsed();

    let assertions = evaluate(&request, status, elapsed, &body);
    let summary = AssertionSummary::of(&assertions);
    let success = summary.failed == 0;
    let message = if success {
        format!("all {} assertions passed", summary.total)
    } else {
        format!("{} of {} assertions failed", summary.failed, summary.total)
    };

    let text = head(&body, body_preview_chars);
    let snapshot = ResponseSnapshot {
        status,
        headers,
        elapsed_ms: elapsed.as_millis() as u64,
        json: serde_json::from_str(&body).ok(),
        truncated: text.len() < body.len(),
        text,
    };

    QuickApiResult {
        success,
        message,
        duration_seconds: started.elapsed().as_secs_f64(),
        request,
        response: Some(snapshot),
        assertions,
        summary,
        error: None,
    }
}

fn transport_failure(request: QuickApiRequest, started: Instant, error: String) -> QuickApiResult {
    QuickApiResult {
        success: false,
        message: "request failed".to_string(),
        duration_seconds: started.elapsed().as_secs_f64(),
        request,
        response: None,
        assertions: Vec::new(),
        summary: AssertionSummary::default(),
        error: Some(error),
    }
}
