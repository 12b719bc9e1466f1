//! Mobile declarative generator / 移动端声明式生成器

use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, UnrecognizedOperation};
use crate::core::spec::{parse_operations, LocatorStrategy, MobileAction, MobileCaseRequest, MobilePlatform};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::{describe, DeclarativeCase, Step};
use crate::generator::Generator;

/// Seconds waited after launching the app before the first action.
pub const STARTUP_DELAY_SECS: u64 = 3;

pub struct MobileDeclarativeGenerator {
    base: BaseGenerator,
}

impl MobileDeclarativeGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Mobile, CaseFormat::Declarative).quiet(quiet),
        }
    }

    /// Launch app, fixed startup delay, the user actions, close app.
    pub fn build(
        &self,
        request: &MobileCaseRequest,
    ) -> GenerationResult<(DeclarativeCase, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let actions = parse_operations::<MobileAction>(&request.actions)?;

        let mut case = DeclarativeCase::new(describe(&request.description, &request.name), &request.name);
        let launch = Step::new("launch app", "launch_app").arg("platform", request.platform.as_str());
        let launch = match request.platform {
            MobilePlatform::Android => launch
                .arg("app_package", request.app_package.as_str())
                .arg("app_activity", request.app_activity.as_str()),
            MobilePlatform::Ios => launch.arg("bundle_id", request.bundle_id.as_str()),
        };
        case.push(launch);
        case.push(Step::new("wait for app start", "sleep").arg("time", STARTUP_DELAY_SECS));

        for (index, action) in &actions.operations {
            case.push(action_step(*index, action));
        }

        case.push(Step::new("close app", "close_app"));
        Ok((case, actions.skipped))
    }
}

impl Generator for MobileDeclarativeGenerator {
    type Request = MobileCaseRequest;

    fn generate(&self, request: &MobileCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (case, skipped) = self.build(request)?;
        let content = case.to_yaml()?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

fn action_step(index: usize, action: &MobileAction) -> Step {
    let label = |what: &str| format!("step {}: {}", index + 1, what);
    let targeted = |step: Step| match action.target() {
        Some(target) => step
            .arg("locator_type", target.strategy.unwrap_or(LocatorStrategy::Id).as_str())
            .arg("element", target.locator),
        None => step,
    };

    match action {
        MobileAction::Click { .. } => targeted(Step::new(label("tap"), "click_element")),
        MobileAction::Input { text, .. } => {
            targeted(Step::new(label("input text"), "input_text")).arg("text", text.as_str())
        }
        MobileAction::Clear { .. } => targeted(Step::new(label("clear"), "clear_element")),
        MobileAction::Swipe { direction } => {
            Step::new(label("swipe"), "swipe").arg("direction", direction.as_str())
        }
        MobileAction::Wait { seconds } => Step::new(label("wait"), "sleep").arg("time", *seconds),
        MobileAction::Screenshot { filename } => {
            let filename = filename.clone().unwrap_or_else(|| format!("screenshot_{}", index + 1));
            Step::new(label("screenshot"), "take_screenshot").arg("filename", filename)
        }
        MobileAction::Back => Step::new(label("go back"), "press_back"),
        MobileAction::AssertText { expected, .. } => {
            targeted(Step::new(label("assert text"), "assert_text_contains")).arg("expected", expected.as_str())
        }
        MobileAction::AssertElement { visible, .. } => {
            let keyword = if *visible {
                "assert_element_visible"
            } else {
                "assert_element_hidden"
            };
            targeted(Step::new(label("assert element"), keyword))
        }
    }
}
