//! Load-test declarative generator / 性能测试声明式生成器
//!
//! The load profile goes into the document's `config` block once; each
//! scenario contributes its request step followed by its checks.

use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, OperationKind, UnrecognizedOperation};
use crate::core::spec::{parse_records, PerfCaseRequest, PerfScenario};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::{describe, DeclarativeCase, LoadProfile, Step};
use crate::generator::Generator;

pub struct PerfDeclarativeGenerator {
    base: BaseGenerator,
}

impl PerfDeclarativeGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Perf, CaseFormat::Declarative).quiet(quiet),
        }
    }

    pub fn build(&self, request: &PerfCaseRequest) -> GenerationResult<(DeclarativeCase, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let scenarios: Vec<PerfScenario> = parse_records(&request.scenarios, OperationKind::Scenario)?;

        let (wait_min, wait_max) = request.wait_range();
        let mut case = DeclarativeCase::new(describe(&request.description, &request.name), &request.name);
        case.config = Some(LoadProfile {
            host: request.host.clone(),
            users: request.users,
            spawn_rate: request.spawn_rate,
            run_time: request.run_time.clone(),
            wait_min,
            wait_max,
        });

        for scenario in &scenarios {
            case.steps.extend(scenario_steps(scenario));
        }

        // Scenarios are untyped records, so nothing is ever skipped here.
        Ok((case, Vec::new()))
    }
}

impl Generator for PerfDeclarativeGenerator {
    type Request = PerfCaseRequest;

    fn generate(&self, request: &PerfCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (case, skipped) = self.build(request)?;
        let content = case.to_yaml()?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

/// The request step and checks of one scenario.
/// 单个场景的请求步骤和检查步骤。
pub fn scenario_steps(scenario: &PerfScenario) -> Vec<Step> {
    let name = scenario.display_name();
    let mut request = Step::new(name.clone(), scenario.method.as_lower())
        .arg("url", scenario.url.as_str())
        .arg("name", name.as_str())
        .arg("catch_response", true)
        .arg_opt("headers", scenario.headers.clone())
        .arg_opt("params", scenario.params.clone())
        .arg_opt("json", scenario.json.clone());
    if scenario.weight != 1 {
        request = request.arg("weight", scenario.weight);
    }

    let mut steps = vec![request];
    if let Some(expected) = scenario.expected_status {
        steps.push(Step::new(format!("{}: check status", name), "assert_status").arg("expected", expected));
    }
    if let Some(max_ms) = scenario.max_response_ms {
        steps.push(Step::new(format!("{}: check response time", name), "assert_response_time").arg("max_ms", max_ms));
    }
    if let Some(text) = &scenario.contains {
        steps.push(Step::new(format!("{}: check content", name), "assert_contains").arg("text", text.as_str()));
    }
    for check in &scenario.json_checks {
        steps.push(
            Step::new(format!("{}: check {}", name, check.path), "assert_json")
                .arg("path", check.path.as_str())
                .arg("expected", check.expected.clone())
                .arg("operator", check.operator.code()),
        );
    }
    if let Some(think_time) = &scenario.think_time {
        let step = Step::new(format!("{}: think time", name), "think_time");
        let step = match (think_time.min, think_time.max) {
            (None, None) => step.arg("seconds", think_time.bounds().0),
            _ => {
                let (min, max) = think_time.bounds();
                step.arg("min", min).arg("max", max)
            }
        };
        steps.push(step);
    }
    steps
}
