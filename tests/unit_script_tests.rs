//! # Script Generator Unit Tests / 脚本生成器单元测试
//!
//! Tests the Python sources rendered by the four script generators and the
//! literal helpers that keep user text inside string literals.
//!
//! 测试四个脚本生成器渲染的 Python 源码，以及确保用户文本留在字符串字面量内的辅助函数。

use serde_json::json;
use std::path::Path;
use testengine::core::error::GenerationError;
use testengine::core::models::OperationKind;
use testengine::core::spec::{ApiCaseRequest, MobileCaseRequest, MobilePlatform, PerfCaseRequest, ThinkTime, WebCaseRequest};
use testengine::generator::script::literal::{py_float, py_literal, py_str};
use testengine::generator::script::perf::run_command;
use testengine::generator::script::{ApiScriptGenerator, MobileScriptGenerator, PerfScriptGenerator, WebScriptGenerator};

fn root() -> &'static Path {
    Path::new("unused-cases-root")
}

#[cfg(test)]
mod literal_tests {
    use super::*;

    #[test]
    fn test_py_str_escapes_quotes_and_newlines() {
        assert_eq!(py_str("plain"), "\"plain\"");
        assert_eq!(py_str("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(py_str("a\nb"), "\"a\\nb\"");
        assert_eq!(py_str("c:\\path"), "\"c:\\\\path\"");
    }

    #[test]
    fn test_py_literal_maps_json_values() {
        assert_eq!(py_literal(&json!(null)), "None");
        assert_eq!(py_literal(&json!(true)), "True");
        assert_eq!(py_literal(&json!([1, "a"])), "[1, \"a\"]");
        assert_eq!(py_literal(&json!({"k": false})), "{\"k\": False}");
    }

    #[test]
    fn test_py_float_keeps_decimal_point() {
        assert_eq!(py_float(1.0), "1.0");
        assert_eq!(py_float(2.5), "2.5");
    }
}

#[cfg(test)]
mod api_script_tests {
    use super::*;

    #[test]
    fn test_defaults_to_status_assertion() {
        let request = ApiCaseRequest::new("get user", "https://api.example.com/users/1");
        let (source, skipped) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();

        assert!(skipped.is_empty());
        assert!(source.contains("class TestGetUser:"));
        assert!(source.contains("async def test_get_user(self, api_client):"));
        assert!(source.contains("assert response.status_code == 200"));
        assert!(!source.contains("import jsonpath"));
    }

    #[test]
    fn test_jsonpath_assertion_imports_jsonpath() {
        let mut request = ApiCaseRequest::new("login", "https://api.example.com/login");
        request.asserts = vec![json!({"type": "jsonpath", "jsonpath": "$.code", "expected": 0})];
        let (source, _) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();

        assert!(source.contains("import jsonpath"));
        assert!(source.contains("$.code"));
        assert!(!source.contains("assert response.status_code == 200"));
    }

    #[test]
    fn test_jsonpath_membership_renders_python_in() {
        let mut request = ApiCaseRequest::new("role", "https://api.example.com/me");
        request.asserts = vec![json!({"type": "jsonpath", "jsonpath": "$.role", "expected": ["admin"], "operator": "in"})];
        let (source, _) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();
        assert!(source.contains(" in [\"admin\"]"));
    }

    #[test]
    fn test_json_length_rejects_membership_operator() {
        let mut request = ApiCaseRequest::new("list", "https://api.example.com/items");
        request.asserts = vec![json!({"type": "json_length", "jsonpath": "$.items", "expected": 2, "operator": "not in"})];
        let error = ApiScriptGenerator::new(root(), true).render(&request).unwrap_err();
        assert!(matches!(
            error,
            GenerationError::InvalidOperation { kind: OperationKind::Assertion, index: 0, .. }
        ));
    }

    #[test]
    fn test_user_text_cannot_break_out_of_literals() {
        let mut request = ApiCaseRequest::new("inject", "https://example.com/\"); import os; (\"");
        request.description = "ends with a quote\"".to_string();
        let (source, _) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();

        assert!(source.contains(&py_str("https://example.com/\"); import os; (\"")));
        assert!(!source.contains("\nimport os"));
    }

    #[test]
    fn test_invalid_class_name_is_replaced() {
        let mut request = ApiCaseRequest::new("order list", "https://api.example.com/orders");
        request.class_name = Some("not a class".to_string());
        let (source, _) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();
        assert!(source.contains("class TestOrderList:"));

        request.class_name = Some("TestOrders".to_string());
        let (source, _) = ApiScriptGenerator::new(root(), true).render(&request).unwrap();
        assert!(source.contains("class TestOrders:"));
    }
}

#[cfg(test)]
mod web_script_tests {
    use super::*;

    #[test]
    fn test_playwright_source() {
        let mut request = WebCaseRequest::new("search", "https://example.com");
        request.actions = vec![
            json!({"type": "input", "locator": "q", "locator_type": "id", "text": "rust"}),
            json!({"type": "assert_url", "expected": "/results"}),
            json!({"type": "teleport"}),
        ];
        let (source, skipped) = WebScriptGenerator::new(root(), true).render(&request).unwrap();

        assert_eq!(skipped.len(), 1);
        assert!(source.contains("from playwright.sync_api import Page, expect"));
        assert!(source.contains("def test_search(self, page: Page):"));
        assert!(source.contains("page.goto(\"https://example.com\")"));
        assert!(source.contains("page.locator(\"#q\")"));
        assert!(source.contains("\"/results\" in page.url"));
    }
}

#[cfg(test)]
mod mobile_script_tests {
    use super::*;

    #[test]
    fn test_ios_capabilities() {
        let request = MobileCaseRequest {
            name: "login".to_string(),
            platform: MobilePlatform::Ios,
            bundle_id: "com.example.app".to_string(),
            actions: vec![json!({"type": "swipe", "direction": "left"})],
            ..MobileCaseRequest::default()
        };
        let (source, _) = MobileScriptGenerator::new(root(), true).render(&request).unwrap();

        assert!(source.contains("\"platformName\": \"iOS\""));
        assert!(source.contains("\"appium:automationName\": \"XCUITest\""));
        assert!(source.contains("\"appium:bundleId\": \"com.example.app\""));
        assert!(!source.contains("appPackage"));
        assert!(source.contains("def test_login(self, driver):"));
    }
}

#[cfg(test)]
mod perf_script_tests {
    use super::*;

    #[test]
    fn test_locust_user_with_tasks() {
        let mut request = PerfCaseRequest::new("checkout flow", "https://shop.example.com");
        request.think_time = Some(ThinkTime::range(0.5, 2.0));
        request.scenarios = vec![
            json!({"name": "browse", "url": "/products", "weight": 3, "expected_status": 200}),
            json!({"name": "browse", "url": "/products?page=2"}),
        ];
        let save_path = Path::new("cases/perf-cases_pytest/locustfile_x.py");
        let source = PerfScriptGenerator::new(root(), true).render(&request, save_path).unwrap();

        assert!(source.contains("from locust import HttpUser, between, task"));
        assert!(source.contains("class CheckoutFlowUser(HttpUser):"));
        assert!(source.contains("wait_time = between(0.5, 2.0)"));
        assert!(source.contains("@task(3)"));
        assert!(source.contains("def task_browse(self):"));
        assert!(source.contains("def task_browse_2(self):"));
        assert!(source.contains("if response.status_code != 200:"));
        assert!(source.contains("Run command:"));
        assert!(source.contains("-u 10 -r 1 -t 60s"));
    }

    #[test]
    fn test_run_command_quotes_arguments() {
        let mut request = PerfCaseRequest::new("soak", "https://shop.example.com");
        request.users = 25;
        request.spawn_rate = 5.0;
        request.run_time = "10m".to_string();
        let command = run_command(&request, Path::new("my cases/locustfile.py"));
        let words = shlex::split(&command).unwrap();
        assert_eq!(
            words,
            vec![
                "locust",
                "-f",
                "my cases/locustfile.py",
                "--host=https://shop.example.com",
                "-u",
                "25",
                "-r",
                "5",
                "-t",
                "10m"
            ]
        );
    }
}
