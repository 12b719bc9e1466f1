//! Load-test script generator / 性能测试脚本生成器
//!
//! Renders a Locust file: one `HttpUser` class, one `@task` per scenario.
//! The load profile is documented as a run command rather than executed.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, OperationKind};
use crate::core::spec::{parse_records, PerfCaseRequest, PerfScenario};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::describe;
use crate::generator::naming::{is_identifier, load_user_class_name, snake_identifier};
use crate::generator::script::literal::{py_dict, py_float, py_literal, py_str};
use crate::generator::script::ScriptWriter;
use crate::generator::Generator;

pub struct PerfScriptGenerator {
    base: BaseGenerator,
}

impl PerfScriptGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Perf, CaseFormat::Script).quiet(quiet),
        }
    }

    /// Renders the Locust file that will be saved at `save_path`.
    /// 渲染将保存到 `save_path` 的 Locust 文件。
    pub fn render(&self, request: &PerfCaseRequest, save_path: &Path) -> GenerationResult<String> {
        request.validate()?;
        let scenarios: Vec<PerfScenario> = parse_records(&request.scenarios, OperationKind::Scenario)?;

        let title = describe(&request.description, &request.name);
        let class_name = match request.class_name.as_deref() {
            Some(name) if is_identifier(name) => name.to_string(),
            _ => load_user_class_name(&request.name),
        };
        let (wait_min, wait_max) = request.wait_range();
        let paced = scenarios.iter().any(|s| s.think_time.is_some());
        let checks_json = scenarios.iter().any(|s| !s.json_checks.is_empty());

        let mut out = ScriptWriter::new();
        out.docstring(
            0,
            &format!("{}\n\nRun command:\n    {}", title, run_command(request, save_path)),
        );
        if paced {
            out.line(0, "import random");
            out.line(0, "import time");
            out.blank();
        }
        if checks_json {
            out.line(0, "import jsonpath");
        }
        out.line(0, "from locust import HttpUser, between, task");
        out.blank().blank();

        out.line(0, format!("class {}(HttpUser):", class_name));
        out.docstring(
            1,
            &format!(
                "{}\n\nHost: {}\nUsers: {}\nSpawn rate: {} per second\nRun time: {}",
                title, request.host, request.users, request.spawn_rate, request.run_time
            ),
        );
        out.blank();
        out.line(1, format!("host = {}", py_str(&request.host)));
        out.line(1, format!("wait_time = between({}, {})", py_float(wait_min), py_float(wait_max)));

        let mut used = HashSet::new();
        for scenario in &scenarios {
            let base_name = format!("task_{}", snake_identifier(&scenario.display_name()));
            let mut method = base_name.clone();
            let mut counter = 2;
            while !used.insert(method.clone()) {
                method = format!("{}_{}", base_name, counter);
                counter += 1;
            }
            out.blank();
            write_task(&mut out, &method, scenario);
        }

        Ok(out.finish())
    }
}

impl Generator for PerfScriptGenerator {
    type Request = PerfCaseRequest;

    fn generate(&self, request: &PerfCaseRequest) -> GenerationResult<GeneratedAsset> {
        request.validate()?;
        let path = self.base.derive_path(request.save_path.as_deref(), &request.name);
        let content = self.render(request, &path)?;
        self.base.persist(&path, &content)?;

        let command = run_command(request, &path);
        let mut asset = self.base.wrap_result(content, path, Vec::new());
        asset.run_command = Some(command);
        Ok(asset)
    }
}

fn shell_word(text: &str) -> Cow<'_, str> {
    shlex::try_quote(text).unwrap_or(Cow::Borrowed(text))
}

/// The documented `locust` invocation for the asset at `save_path`.
/// 保存在 `save_path` 的资产对应的 `locust` 命令。
pub fn run_command(request: &PerfCaseRequest, save_path: &Path) -> String {
    let path = save_path.display().to_string();
    format!(
        "locust -f {} --host={} -u {} -r {} -t {}",
        shell_word(&path),
        shell_word(&request.host),
        request.users,
        request.spawn_rate,
        shell_word(&request.run_time)
    )
}

fn write_task(out: &mut ScriptWriter, method: &str, scenario: &PerfScenario) {
    let name = scenario.display_name();
    if scenario.weight == 1 {
        out.line(1, "@task");
    } else {
        out.line(1, format!("@task({})", scenario.weight));
    }
    out.line(1, format!("def {}(self):", method));
    out.docstring(2, &name);

    let mut call = format!(
        "with self.client.{}({}, name={}",
        scenario.method.as_lower(),
        py_str(&scenario.url),
        py_str(&name)
    );
    if let Some(headers) = &scenario.headers {
        call.push_str(&format!(", headers={}", py_dict(headers)));
    }
    if let Some(params) = &scenario.params {
        call.push_str(&format!(", params={}", py_dict(params)));
    }
    if let Some(json) = &scenario.json {
        call.push_str(&format!(", json={}", py_literal(json)));
    }
    call.push_str(", catch_response=True) as response:");
    out.line(2, call);

    let fail = |out: &mut ScriptWriter, message: String| {
        out.line(4, format!("response.failure({})", message));
        out.line(4, "return");
    };

    if let Some(expected) = scenario.expected_status {
        out.line(3, format!("if response.status_code != {}:", expected));
        fail(out, "f\"unexpected status code: {response.status_code}\"".to_string());
    }
    if let Some(max_ms) = scenario.max_response_ms {
        out.line(3, format!("if response.elapsed.total_seconds() * 1000 > {}:", max_ms));
        fail(out, py_str(&format!("response time exceeded {} ms", max_ms)));
    }
    if let Some(text) = &scenario.contains {
        out.line(3, format!("if {} not in response.text:", py_str(text)));
        fail(out, py_str(&format!("response does not contain: {}", text)));
    }
    if !scenario.json_checks.is_empty() {
        out.line(3, "try:");
        out.line(4, "data = response.json()");
        out.line(3, "except ValueError:");
        fail(out, py_str("response is not valid JSON"));
        for (i, check) in scenario.json_checks.iter().enumerate() {
            let var = format!("values_{}", i);
            out.line(3, format!("{} = jsonpath.jsonpath(data, {})", var, py_str(&check.path)));
            out.line(
                3,
                format!(
                    "if not {var} or not ({var}[0] {op} {expected}):",
                    var = var,
                    op = check.operator.symbol(),
                    expected = py_literal(&check.expected)
                ),
            );
            fail(
                out,
                py_str(&format!(
                    "JSON check failed: {} {} {}",
                    check.path,
                    check.operator.symbol(),
                    check.expected
                )),
            );
        }
    }
    out.line(3, "response.success()");

    if let Some(think_time) = &scenario.think_time {
        let (min, max) = think_time.bounds();
        if min == max {
            out.line(2, format!("time.sleep({})", py_float(min)));
        } else {
            out.line(2, format!("time.sleep(random.uniform({}, {}))", py_float(min), py_float(max)));
        }
    }
}
