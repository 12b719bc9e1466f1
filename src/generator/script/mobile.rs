//! Mobile script generator / 移动端脚本生成器
//!
//! Renders a pytest test driving Appium. The driver comes from a class-level
//! fixture built from the platform capabilities; every element lookup goes
//! through an explicit `WebDriverWait`.

use serde_json::{Map, Value};
use std::path::Path;

use crate::core::error::GenerationResult;
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, UnrecognizedOperation};
use crate::core::spec::{parse_operations, Direction, LocatorStrategy, MobileAction, MobileCaseRequest, MobilePlatform, Target};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::describe;
use crate::generator::declarative::mobile::STARTUP_DELAY_SECS;
use crate::generator::naming::snake_identifier;
use crate::generator::script::literal::{py_dict, py_float, py_str};
use crate::generator::script::{ScriptWriter, SuiteHeader};
use crate::generator::Generator;

/// Seconds an explicit wait polls for an element.
pub const ELEMENT_WAIT_SECS: u64 = 10;

pub struct MobileScriptGenerator {
    base: BaseGenerator,
}

impl MobileScriptGenerator {
    pub fn new(cases_root: &Path, quiet: bool) -> Self {
        Self {
            base: BaseGenerator::new(cases_root, EngineType::Mobile, CaseFormat::Script).quiet(quiet),
        }
    }

    pub fn render(&self, request: &MobileCaseRequest) -> GenerationResult<(String, Vec<UnrecognizedOperation>)> {
        request.validate()?;
        let actions = parse_operations::<MobileAction>(&request.actions)?;

        let title = describe(&request.description, &request.name);
        let header = SuiteHeader::new(
            &request.name,
            &title,
            request.class_name.as_deref(),
            request.feature.as_deref(),
            "Mobile App Tests",
            request.story.as_deref(),
        );

        let mut out = ScriptWriter::new();
        header.write_header(
            &mut out,
            &[
                "import os",
                "import time",
                "",
                "import allure",
                "import pytest",
                "from appium import webdriver",
                "from appium.options.common import AppiumOptions",
                "from appium.webdriver.common.appiumby import AppiumBy",
                "from selenium.webdriver.support import expected_conditions as EC",
                "from selenium.webdriver.support.ui import WebDriverWait",
            ],
            &["APPIUM_SERVER = os.environ.get(\"APPIUM_SERVER\", \"http://127.0.0.1:4723\")".to_string()],
        );

        out.line(1, "@pytest.fixture");
        out.line(1, "def driver(self):");
        out.line(2, "options = AppiumOptions()");
        out.line(2, format!("options.load_capabilities({})", py_dict(&capabilities(request))));
        out.line(2, "driver = webdriver.Remote(APPIUM_SERVER, options=options)");
        out.line(2, "yield driver");
        out.line(2, "driver.quit()");
        out.blank();

        header.write_test_decorators(&mut out);
        out.line(
            1,
            format!("def test_{}(self, driver):", snake_identifier(&request.name)),
        );
        out.docstring(2, &format!("Test case: {}", title));
        out.line(2, format!("wait = WebDriverWait(driver, {})", ELEMENT_WAIT_SECS));
        out.line(2, format!("time.sleep({})", STARTUP_DELAY_SECS));

        for (index, action) in &actions.operations {
            write_action(&mut out, *index, action);
        }

        Ok((out.finish(), actions.skipped))
    }
}

impl Generator for MobileScriptGenerator {
    type Request = MobileCaseRequest;

    fn generate(&self, request: &MobileCaseRequest) -> GenerationResult<GeneratedAsset> {
        let (content, skipped) = self.render(request)?;
        self.base
            .emit(request.save_path.as_deref(), &request.name, content, skipped)
    }
}

fn capabilities(request: &MobileCaseRequest) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("platformName".into(), request.platform.as_str().into());
    caps.insert("appium:automationName".into(), request.platform.automation_name().into());
    match request.platform {
        MobilePlatform::Android => {
            caps.insert("appium:appPackage".into(), request.app_package.as_str().into());
            if !request.app_activity.trim().is_empty() {
                caps.insert("appium:appActivity".into(), request.app_activity.as_str().into());
            }
        }
        MobilePlatform::Ios => {
            caps.insert("appium:bundleId".into(), request.bundle_id.as_str().into());
        }
    }
    caps.insert("appium:noReset".into(), Value::Bool(true));
    caps
}

/// The `(AppiumBy.X, "value")` tuple for `target`; `id` is the default strategy.
/// 目标元素的 `(AppiumBy.X, "value")` 元组，默认策略为 `id`。
pub fn locator_tuple(target: Target<'_>) -> String {
    let by = match target.strategy.unwrap_or(LocatorStrategy::Id) {
        LocatorStrategy::Id => "AppiumBy.ID",
        LocatorStrategy::Xpath => "AppiumBy.XPATH",
        LocatorStrategy::AccessibilityId => "AppiumBy.ACCESSIBILITY_ID",
        LocatorStrategy::ClassName => "AppiumBy.CLASS_NAME",
        LocatorStrategy::Css => "AppiumBy.CSS_SELECTOR",
    };
    format!("({}, {})", by, py_str(target.locator))
}

fn write_action(out: &mut ScriptWriter, index: usize, action: &MobileAction) {
    let title = |what: &str| format!("with allure.step({}):", py_str(&format!("Step {}: {}", index + 1, what)));
    let locator = action.target().map(locator_tuple).unwrap_or_default();

    match action {
        MobileAction::Click { locator: raw, .. } => {
            out.line(2, title(&format!("tap {}", raw)));
            out.line(3, format!("element = wait.until(EC.element_to_be_clickable({}))", locator));
            out.line(3, "element.click()");
        }
        MobileAction::Input { locator: raw, text, .. } => {
            out.line(2, title(&format!("input into {}", raw)));
            out.line(3, format!("element = wait.until(EC.presence_of_element_located({}))", locator));
            out.line(3, "element.clear()");
            out.line(3, format!("element.send_keys({})", py_str(text)));
        }
        MobileAction::Clear { locator: raw, .. } => {
            out.line(2, title(&format!("clear {}", raw)));
            out.line(3, format!("element = wait.until(EC.presence_of_element_located({}))", locator));
            out.line(3, "element.clear()");
        }
        MobileAction::Swipe { direction } => {
            out.line(2, title(&format!("swipe {}", direction.as_str())));
            let (x1, y1, x2, y2) = match direction {
                Direction::Up => ("0.5", "0.8", "0.5", "0.2"),
                Direction::Down => ("0.5", "0.2", "0.5", "0.8"),
                Direction::Left => ("0.8", "0.5", "0.2", "0.5"),
                Direction::Right => ("0.2", "0.5", "0.8", "0.5"),
            };
            out.line(3, "size = driver.get_window_size()");
            out.line(3, "width, height = size[\"width\"], size[\"height\"]");
            out.line(
                3,
                format!(
                    "driver.swipe(int(width * {}), int(height * {}), int(width * {}), int(height * {}), 500)",
                    x1, y1, x2, y2
                ),
            );
        }
        MobileAction::Wait { seconds } => {
            out.line(2, title(&format!("wait {}s", seconds)));
            out.line(3, format!("time.sleep({})", py_float(*seconds)));
        }
        MobileAction::Screenshot { filename } => {
            let name = filename.clone().unwrap_or_else(|| format!("screenshot_{}", index + 1));
            out.line(2, title("screenshot"));
            out.line(
                3,
                format!(
                    "allure.attach(driver.get_screenshot_as_png(), {}, allure.attachment_type.PNG)",
                    py_str(&name)
                ),
            );
        }
        MobileAction::Back => {
            out.line(2, title("go back"));
            out.line(3, "driver.back()");
        }
        MobileAction::AssertText { locator: raw, expected, .. } => {
            out.line(2, title(&format!("assert text of {}", raw)));
            out.line(3, format!("element = wait.until(EC.visibility_of_element_located({}))", locator));
            out.line(
                3,
                format!(
                    "assert {} in element.text, f\"unexpected text: {{element.text}}\"",
                    py_str(expected)
                ),
            );
        }
        MobileAction::AssertElement { locator: raw, visible, .. } => {
            out.line(2, title(&format!("assert element {}", raw)));
            let condition = if *visible {
                "visibility_of_element_located"
            } else {
                "invisibility_of_element_located"
            };
            out.line(
                3,
                format!(
                    "assert wait.until(EC.{}({})), {}",
                    condition,
                    locator,
                    py_str(&format!("element state check failed: {}", raw))
                ),
            );
        }
    }
}
