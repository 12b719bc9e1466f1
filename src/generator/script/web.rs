//! Web script generator / Web 脚本生成器
//!
//! Renders a pytest test driving Playwright's sync API. Interactive actions
//! wait for their element to become visible first.

use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, UnrecognizedOperation};
use crate::core::spec::{parse_operations, Direction, LocatorStrategy, Target, UrlMatch, WebAction, WebCaseRequest};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::describe;
use crate::generator::naming::snake_identifier;
use crate::generator::script::literal::py_str;
use crate::generator::script::{ScriptWriter, SuiteHeader};
use crate::generator::Generator;

pub struct WebScriptGenerator {
    base: BaseGenerator,
}

impl WebScriptGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Web, CaseFormat::Script).quiet(quiet),
        }
    }

    pub fn render(&self, request: &WebCaseRequest) -> GenerationResult<(String, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let actions = parse_operations::<WebAction>(&request.actions)?;

        let title = describe(&request.description, &request.name);
        let header = SuiteHeader::new(
            &request.name,
            &title,
            request.class_name.as_deref(),
            request.feature.as_deref(),
            "Web UI Tests",
            request.story.as_deref(),
        );

        let mut out = ScriptWriter::new();
        header.write_preamble(
            &mut out,
            &["import allure", "import pytest", "from playwright.sync_api import Page, expect"],
        );
        out.line(
            1,
            format!("def test_{}(self, page: Page):", snake_identifier(&request.name)),
        );
        out.docstring(2, &format!("Test case: {}", title));

        out.line(2, "with allure.step(\"Open page\"):");
        out.line(3, format!("page.goto({})", py_str(&request.url)));
        out.line(3, "page.wait_for_load_state(\"load\")");
        out.line(3, "allure.attach(page.url, \"current url\", allure.attachment_type.TEXT)");

        for (index, action) in &actions.operations {
            write_action(&mut out, *index, action);
        }

        Ok((out.finish(), actions.skipped))
    }
}

impl Generator for WebScriptGenerator {
    type Request = WebCaseRequest;

    fn generate(&self, request: &WebCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (content, skipped) = self.render(request)?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

/// The Playwright expression locating `target`; CSS is the default strategy.
/// 定位 `target` 的 Playwright 表达式，默认策略为 CSS。
pub fn locator_expr(target: Target<'_>) -> String {
    let locator = target.locator;
    match target.strategy.unwrap_or(LocatorStrategy::Css) {
        LocatorStrategy::Css => format!("page.locator({})", py_str(locator)),
        LocatorStrategy::Id => format!("page.locator({})", py_str(&format!("#{}", locator))),
        LocatorStrategy::Xpath => format!("page.locator({})", py_str(&format!("xpath={}", locator))),
        LocatorStrategy::ClassName => format!("page.locator({})", py_str(&format!(".{}", locator))),
        LocatorStrategy::AccessibilityId => format!("page.get_by_label({})", py_str(locator)),
    }
}

fn step_title(index: usize, what: &str) -> String {
    format!("with allure.step({}):", py_str(&format!("Step {}: {}", index + 1, what)))
}

fn write_action(out: &mut ScriptWriter, index: usize, action: &WebAction) {
    // Every targeted action binds `element` first.
    let bind = |out: &mut ScriptWriter, wait: bool| {
        if let Some(target) = action.target() {
            out.line(3, format!("element = {}", locator_expr(target)));
            if wait {
                out.line(3, "element.wait_for(state=\"visible\")");
            }
        }
    };

    match action {
        WebAction::Click { locator, .. } => {
            out.line(2, step_title(index, &format!("click {}", locator)));
            bind(out, true);
            out.line(3, "element.click()");
        }
        WebAction::Input { locator, text, .. } => {
            out.line(2, step_title(index, &format!("input into {}", locator)));
            bind(out, true);
            out.line(3, format!("element.fill({})", py_str(text)));
        }
        WebAction::Clear { locator, .. } => {
            out.line(2, step_title(index, &format!("clear {}", locator)));
            bind(out, true);
            out.line(3, "element.clear()");
        }
        WebAction::Wait { seconds } => {
            out.line(2, step_title(index, &format!("wait {}s", seconds)));
            out.line(3, format!("page.wait_for_timeout({})", (seconds * 1000.0).round() as u64));
        }
        WebAction::Screenshot { filename } => {
            let name = filename.clone().unwrap_or_else(|| format!("screenshot_{}", index + 1));
            out.line(2, step_title(index, "screenshot"));
            out.line(
                3,
                format!(
                    "allure.attach(page.screenshot(full_page=True), {}, allure.attachment_type.PNG)",
                    py_str(&name)
                ),
            );
        }
        WebAction::AssertText { locator, expected, .. } => {
            out.line(2, step_title(index, &format!("assert text of {}", locator)));
            bind(out, false);
            out.line(3, format!("expect(element).to_contain_text({})", py_str(expected)));
        }
        WebAction::AssertTitle { expected } => {
            out.line(2, step_title(index, "assert title"));
            out.line(
                3,
                format!(
                    "assert {} in page.title(), f\"unexpected page title: {{page.title()}}\"",
                    py_str(expected)
                ),
            );
        }
        WebAction::AssertUrl { expected, match_mode } => {
            out.line(2, step_title(index, "assert url"));
            let condition = match match_mode {
                UrlMatch::Contains => format!("{} in page.url", py_str(expected)),
                UrlMatch::Equals => format!("page.url == {}", py_str(expected)),
            };
            out.line(3, format!("assert {}, f\"unexpected url: {{page.url}}\"", condition));
        }
        WebAction::AssertElement { locator, visible, .. } => {
            out.line(2, step_title(index, &format!("assert element {}", locator)));
            bind(out, false);
            if *visible {
                out.line(3, "expect(element).to_be_visible()");
            } else {
                out.line(3, "expect(element).to_be_hidden()");
            }
        }
        WebAction::Hover { locator, .. } => {
            out.line(2, step_title(index, &format!("hover {}", locator)));
            bind(out, true);
            out.line(3, "element.hover()");
        }
        WebAction::Select { locator, value, .. } => {
            out.line(2, step_title(index, &format!("select in {}", locator)));
            bind(out, true);
            out.line(3, format!("element.select_option({})", py_str(value)));
        }
        WebAction::Scroll { direction, distance } => {
            out.line(2, step_title(index, &format!("scroll {}", direction.as_str())));
            let (dx, dy) = match direction {
                Direction::Up => (0, -i64::from(*distance)),
                Direction::Down => (0, i64::from(*distance)),
                Direction::Left => (-i64::from(*distance), 0),
                Direction::Right => (i64::from(*distance), 0),
            };
            out.line(3, format!("page.mouse.wheel({}, {})", dx, dy));
            out.line(3, "page.wait_for_timeout(300)");
        }
    }
}
