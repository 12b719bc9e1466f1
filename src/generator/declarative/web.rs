//! Web declarative generator / Web 声明式生成器

use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, UnrecognizedOperation};
use crate::core::spec::{parse_operations, LocatorStrategy, Target, UrlMatch, WebAction, WebCaseRequest};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::{describe, DeclarativeCase, Step};
use crate::generator::Generator;

pub struct WebDeclarativeGenerator {
    base: BaseGenerator,
}

impl WebDeclarativeGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Web, CaseFormat::Declarative).quiet(quiet),
        }
    }

    /// Open browser, navigate, wait for load, the user actions, close browser.
    /// 打开浏览器、导航、等待加载、执行用户操作、关闭浏览器。
    pub fn build(&self, request: &WebCaseRequest) -> GenerationResult<(DeclarativeCase, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let actions = parse_operations::<WebAction>(&request.actions)?;

        let mut case = DeclarativeCase::new(describe(&request.description, &request.name), &request.name);
        case.push(
            Step::new("open browser", "open_browser")
                .arg("browser", request.browser.as_str())
                .arg("headless", request.headless),
        );
        case.push(Step::new("open page", "navigate_to").arg("url", request.url.as_str()));
        case.push(Step::new("wait for page load", "wait_for_page_load"));

        for (index, action) in &actions.operations {
            case.push(action_step(*index, action));
        }

        case.push(Step::new("close browser", "close_browser"));
        Ok((case, actions.skipped))
    }
}

impl Generator for WebDeclarativeGenerator {
    type Request = WebCaseRequest;

    fn generate(&self, request: &WebCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (case, skipped) = self.build(request)?;
        let content = case.to_yaml()?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

fn with_target(step: Step, target: Target<'_>) -> Step {
    step.arg("locator_type", target.strategy.unwrap_or(LocatorStrategy::Css).as_str())
        .arg("element", target.locator)
}

fn action_step(index: usize, action: &WebAction) -> Step {
    let label = |what: &str| format!("step {}: {}", index + 1, what);
    let targeted = |step: Step| match action.target() {
        Some(target) => with_target(step, target),
        None => step,
    };

    match action {
        WebAction::Click { .. } => targeted(Step::new(label("click"), "click_element")),
        WebAction::Input { text, .. } => {
            targeted(Step::new(label("input text"), "input_text")).arg("text", text.as_str())
        }
        WebAction::Clear { .. } => targeted(Step::new(label("clear"), "clear_element")),
        WebAction::Wait { seconds } => Step::new(label("wait"), "sleep").arg("time", *seconds),
        WebAction::Screenshot { filename } => {
            let filename = filename.clone().unwrap_or_else(|| format!("screenshot_{}", index + 1));
            Step::new(label("screenshot"), "take_screenshot").arg("filename", filename)
        }
        WebAction::AssertText { expected, .. } => {
            targeted(Step::new(label("assert text"), "assert_text_contains")).arg("expected", expected.as_str())
        }
        WebAction::AssertTitle { expected } => {
            Step::new(label("assert title"), "assert_title_contains").arg("expected", expected.as_str())
        }
        WebAction::AssertUrl { expected, match_mode } => {
            let keyword = match match_mode {
                UrlMatch::Contains => "assert_url_contains",
                UrlMatch::Equals => "assert_url_equals",
            };
            Step::new(label("assert url"), keyword).arg("expected", expected.as_str())
        }
        WebAction::AssertElement { visible, .. } => {
            let keyword = if *visible {
                "assert_element_visible"
            } else {
                "assert_element_hidden"
            };
            targeted(Step::new(label("assert element"), keyword))
        }
        WebAction::Hover { .. } => targeted(Step::new(label("hover"), "hover_element")),
        WebAction::Select { value, .. } => {
            targeted(Step::new(label("select option"), "select_dropdown")).arg("value", value.as_str())
        }
        WebAction::Scroll { direction, distance } => Step::new(label("scroll"), "scroll_page")
            .arg("direction", direction.as_str())
            .arg("distance", *distance),
    }
}
