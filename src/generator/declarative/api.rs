//! API declarative generator / API 声明式生成器
//!
//! Request step, then extraction steps, then assertion steps. `jsonpath` and
//! `json_length` assertions expand to an extraction into a positional
//! temporary variable followed by a comparison that references it.

use serde_json::Value;
use std::path::Path;

use crate::core::error::{GenerationError, GenerationResult};
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, OperationKind, UnrecognizedOperation};
use crate::core::spec::{parse_operations, parse_records, ApiAssertion, ApiCaseRequest, ApiExtract};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::{describe, DeclarativeCase, Step};
use crate::generator::Generator;

/// Prefix of the variable holding a `jsonpath` assertion's actual value.
pub const ASSERT_VALUE_PREFIX: &str = "_assert_value_";
/// Prefix of the variable holding a `json_length` assertion's actual value.
pub const ASSERT_LENGTH_PREFIX: &str = "_assert_length_";

/// `{{name}}` reference understood by the declarative runner.
pub fn var_ref(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

pub struct ApiDeclarativeGenerator {
    base: BaseGenerator,
}

impl ApiDeclarativeGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Api, CaseFormat::Declarative).quiet(quiet),
        }
    }

    pub fn base(&self) -> &BaseGenerator {
        &self.base
    }

    /// Builds the document without touching the disk.
    pub fn build(&self, request: &ApiCaseRequest) -> GenerationResult<(DeclarativeCase, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let extracts: Vec<ApiExtract> = parse_records(&request.extracts, OperationKind::Extract)?;
        let assertions = parse_operations::<ApiAssertion>(&request.asserts)?;
        for (index, assertion) in &assertions.operations {
            check_compare_operator(*index, assertion)?;
        }

        let mut case = DeclarativeCase::new(describe(&request.description, &request.name), &request.name);
        case.push(request_step(request));

        for extract in &extracts {
            case.push(
                Step::new(format!("extract {}", extract.name), "extract_json")
                    .arg("expression", extract.jsonpath.as_str())
                    .arg("index", extract.index)
                    .arg("var_name", extract.name.as_str()),
            );
        }

        for (index, assertion) in &assertions.operations {
            for step in assertion_steps(*index, assertion) {
                case.push(step);
            }
        }

        Ok((case, assertions.skipped))
    }
}

impl Generator for ApiDeclarativeGenerator {
    type Request = ApiCaseRequest;

    fn generate(&self, request: &ApiCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (case, skipped) = self.build(request)?;
        let content = case.to_yaml()?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

fn request_step(request: &ApiCaseRequest) -> Step {
    Step::new(format!("send {} request", request.method), "send_request")
        .arg("url", request.url.as_str())
        .arg("method", request.method.as_upper())
        .arg_opt("headers", request.headers.clone())
        .arg_opt("params", request.params.clone())
        .arg_opt("data", request.data.clone())
        .arg_opt("json", request.json_body.clone())
}

/// `assert_compare` only understands ordering and equality operators.
fn check_compare_operator(index: usize, assertion: &ApiAssertion) -> GenerationResult<()> {
    match assertion {
        ApiAssertion::Jsonpath { operator, .. } if operator.is_membership() => {
            Err(GenerationError::InvalidOperation {
                kind: OperationKind::Assertion,
                index,
                reason: format!(
                    "`operator` `{}` is not supported by declarative assert_compare",
                    operator.symbol()
                ),
            })
        }
        _ => Ok(()),
    }
}

/// Maps one assertion to its steps. `index` is the assertion's position in the
/// request list and keys the temporary variable of the two-step expansions.
///
/// 将一个断言映射为步骤。`index` 是断言在请求列表中的位置，用作两步展开中临时变量的键。
pub fn assertion_steps(index: usize, assertion: &ApiAssertion) -> Vec<Step> {
    match assertion {
        ApiAssertion::StatusCode { expected } => vec![
            Step::new(format!("assert status code is {}", expected), "assert_status_code")
                .arg("expected_code", *expected),
        ],
        ApiAssertion::Contains { expected } => vec![
            Step::new("assert response contains text", "assert_contains")
                .arg("expected_text", expected.as_str()),
        ],
        ApiAssertion::Equals { value, expected } => vec![
            Step::new("assert values are equal", "assert_compare")
                .arg("value", value.clone())
                .arg("expected", expected.clone())
                .arg("operator", "=="),
        ],
        ApiAssertion::Jsonpath { jsonpath, expected, operator } => {
            let var_name = format!("{}{}", ASSERT_VALUE_PREFIX, index);
            vec![
                Step::new(format!("extract {}", jsonpath), "extract_json")
                    .arg("expression", jsonpath.as_str())
                    .arg("index", 0)
                    .arg("var_name", var_name.as_str()),
                Step::new(format!("assert {} {}", jsonpath, operator.symbol()), "assert_compare")
                    .arg("value", var_ref(&var_name))
                    .arg("expected", expected.clone())
                    .arg("operator", operator.symbol()),
            ]
        }
        ApiAssertion::ResponseTime { max_ms } => vec![
            Step::new(format!("assert response time under {} ms", max_ms), "assert_response_time")
                .arg("max_time", Value::from(*max_ms as f64 / 1000.0)),
        ],
        ApiAssertion::JsonLength { jsonpath, expected, operator } => {
            let var_name = format!("{}{}", ASSERT_LENGTH_PREFIX, index);
            vec![
                Step::new(format!("extract {}", jsonpath), "extract_json")
                    .arg("expression", jsonpath.as_str())
                    .arg("index", 0)
                    .arg("var_name", var_name.as_str()),
                Step::new(format!("assert length of {}", jsonpath), "assert_length")
                    .arg("value", var_ref(&var_name))
                    .arg("expected", *expected)
                    .arg("operator", operator.symbol()),
            ]
        }
    }
}
