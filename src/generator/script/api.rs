//! API script generator / API 脚本生成器
//!
//! Renders an async pytest test that sends the request through the
//! `api_client` fixture, extracts values with `jsonpath` and asserts on the
//! response. A request without assertions gets a status-200 check.

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, OperationKind, UnrecognizedOperation};
use crate::core::spec::{parse_operations, parse_records, ApiAssertion, ApiCaseRequest, ApiExtract};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::describe;
use crate::generator::naming::snake_identifier;
use crate::generator::script::literal::{py_dict, py_literal, py_str};
use crate::generator::script::{ScriptWriter, SuiteHeader};
use crate::generator::Generator;
use serde_json::Value;

pub struct ApiScriptGenerator {
    base: BaseGenerator,
}

impl ApiScriptGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Api, CaseFormat::Script).quiet(quiet),
        }
    }

    /// Renders the test module source.
    /// 渲染测试模块源码。
    pub fn render(&self, request: &ApiCaseRequest) -> GenerationResult<(String, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let extracts: Vec<ApiExtract> = parse_records(&request.extracts, OperationKind::Extract)?;
        let parsed = parse_operations::<ApiAssertion>(&request.asserts)?;
        let mut assertions = parsed.operations;
        if assertions.is_empty() {
            assertions.push((0, ApiAssertion::StatusCode { expected: 200 }));
        }

        let needs_jsonpath = !extracts.is_empty()
            || assertions.iter().any(|(_, a)| {
                matches!(a, ApiAssertion::Jsonpath { .. } | ApiAssertion::JsonLength { .. })
            });
        let mut imports = vec!["import allure"];
        if needs_jsonpath {
            imports.push("import jsonpath");
        }
        imports.push("import pytest");

        let title = describe(&request.description, &request.name);
        let header = SuiteHeader::new(
            &request.name,
            &title,
            request.class_name.as_deref(),
            request.feature.as_deref(),
            "API Tests",
            request.story.as_deref(),
        );

        let mut out = ScriptWriter::new();
        header.write_preamble(&mut out, &imports);
        out.line(1, "@pytest.mark.asyncio");
        out.line(
            1,
            format!("async def test_{}(self, api_client):", snake_identifier(&request.name)),
        );
        out.docstring(2, &format!("Test case: {}", title));

        write_request(&mut out, request);

        let mut variables = BTreeSet::new();
        if !extracts.is_empty() {
            out.line(2, "with allure.step(\"Extract response data\"):");
            out.line(3, "result = response.json()");
            for extract in &extracts {
                let var = snake_identifier(&extract.name);
                out.line(
                    3,
                    format!("{}_values = jsonpath.jsonpath(result, {})", var, py_str(&extract.jsonpath)),
                );
                out.line(
                    3,
                    format!(
                        "{var} = {var}_values[{idx}] if {var}_values and len({var}_values) > {idx} else None",
                        var = var,
                        idx = extract.index
                    ),
                );
                out.line(3, format!("allure.attach(str({}), {}, allure.attachment_type.TEXT)", var, py_str(&var)));
                variables.insert(var);
            }
        }

        out.line(2, "with allure.step(\"Verify response\"):");
        for (index, assertion) in &assertions {
            write_assertion(&mut out, *index, assertion, &variables);
        }

        Ok((out.finish(), parsed.skipped))
    }
}

impl Generator for ApiScriptGenerator {
    type Request = ApiCaseRequest;

    fn generate(&self, request: &ApiCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (content, skipped) = self.render(request)?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

fn write_request(out: &mut ScriptWriter, request: &ApiCaseRequest) {
    let mut kwargs = Vec::new();
    out.line(2, "with allure.step(\"Prepare request\"):");
    out.line(3, format!("url = {}", py_str(&request.url)));
    if let Some(headers) = &request.headers {
        out.line(3, format!("headers = {}", py_dict(headers)));
        kwargs.push("headers=headers");
    }
    if let Some(params) = &request.params {
        out.line(3, format!("params = {}", py_dict(params)));
        kwargs.push("params=params");
    }
    if let Some(data) = &request.data {
        out.line(3, format!("data = {}", py_dict(data)));
        kwargs.push("data=data");
    }
    if let Some(body) = &request.json_body {
        out.line(3, format!("payload = {}", py_literal(body)));
        kwargs.push("json=payload");
    }

    let mut call = format!("response = await api_client.request({}, url", py_str(request.method.as_upper()));
    for kwarg in kwargs {
        call.push_str(", ");
        call.push_str(kwarg);
    }
    call.push(')');

    out.line(2, "with allure.step(\"Send request\"):");
    out.line(3, call);
    out.line(3, "allure.attach(response.text, \"response body\", allure.attachment_type.TEXT)");
}

/// An extracted variable is referenced by name, anything else becomes a literal.
fn value_expr(value: &Value, variables: &BTreeSet<String>) -> String {
    match value {
        Value::String(name) if variables.contains(name) => name.clone(),
        other => py_literal(other),
    }
}

fn write_assertion(out: &mut ScriptWriter, index: usize, assertion: &ApiAssertion, variables: &BTreeSet<String>) {
    match assertion {
        ApiAssertion::StatusCode { expected } => {
            out.line(
                3,
                format!(
                    "assert response.status_code == {0}, f\"expected status {0}, got {{response.status_code}}\"",
                    expected
                ),
            );
        }
        ApiAssertion::Contains { expected } => {
            out.line(
                3,
                format!(
                    "assert {} in response.text, {}",
                    py_str(expected),
                    py_str(&format!("response does not contain: {}", expected))
                ),
            );
        }
        ApiAssertion::Equals { value, expected } => {
            out.line(
                3,
                format!(
                    "assert {} == {}, {}",
                    value_expr(value, variables),
                    py_literal(expected),
                    py_str(&format!("expected {}", expected))
                ),
            );
        }
        ApiAssertion::Jsonpath { jsonpath, expected, operator } => {
            let var = format!("assert_values_{}", index);
            out.line(3, format!("{} = jsonpath.jsonpath(response.json(), {})", var, py_str(jsonpath)));
            out.line(
                3,
                format!("assert {}, {}", var, py_str(&format!("JSONPath matched nothing: {}", jsonpath))),
            );
            out.line(
                3,
                format!(
                    "assert {}[0] {} {}, {}",
                    var,
                    operator.symbol(),
                    py_literal(expected),
                    py_str(&format!("JSONPath assertion failed: {} {} {}", jsonpath, operator.symbol(), expected))
                ),
            );
        }
        ApiAssertion::ResponseTime { max_ms } => {
            out.line(
                3,
                format!(
                    "assert response.elapsed.total_seconds() * 1000 < {}, {}",
                    max_ms,
                    py_str(&format!("response time exceeded {} ms", max_ms))
                ),
            );
        }
        ApiAssertion::JsonLength { jsonpath, expected, operator } => {
            let var = format!("assert_lengths_{}", index);
            out.line(3, format!("{} = jsonpath.jsonpath(response.json(), {})", var, py_str(jsonpath)));
            out.line(
                3,
                format!("assert {}, {}", var, py_str(&format!("JSONPath matched nothing: {}", jsonpath))),
            );
            out.line(
                3,
                format!(
                    "assert len({}[0]) {} {}, {}",
                    var,
                    operator.symbol(),
                    expected,
                    py_str(&format!("length assertion failed: {}", jsonpath))
                ),
            );
        }
    }
}
