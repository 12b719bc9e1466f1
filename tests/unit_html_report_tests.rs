//! # HTML Report Unit Tests / HTML 报告单元测试
//!
//! Tests the HTML page rendered for an execution result.
//!
//! 测试为执行结果渲染的 HTML 页面。

use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use testengine::models::{EngineType, ExecutionResult, FailureReason, Statistics};
use testengine::reporting::generate_html_report;
use testengine::reporting::html::render_html_report;

#[cfg(test)]
mod html_report_tests {
    use super::*;

    #[test]
    fn test_timeout_page_shows_error_and_engine() {
        let result = ExecutionResult::timeout(EngineType::Perf, Duration::from_secs(600));
        let page = render_html_report(&result).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Timeout"));
        assert!(page.contains("perf"));
        assert!(page.contains("600.00s"));
    }

    #[test]
    fn test_statistics_and_pass_rate_are_rendered() {
        let mut result = ExecutionResult::failure(FailureReason::TestsFailed, "done", "exit 1");
        result.statistics = Statistics::new(12, 3, 0);
        let page = render_html_report(&result).into_string();

        assert!(page.contains(">12<"));
        assert!(page.contains(">3<"));
        assert!(page.contains("80.0%"));
    }

    #[test]
    fn test_output_is_escaped() {
        let result = ExecutionResult::failure(FailureReason::Launch, "<b>boom</b>", "launch failed");
        let page = render_html_report(&result).into_string();

        assert!(page.contains("&lt;b&gt;boom&lt;/b&gt;"));
        assert!(!page.contains("<b>boom</b>"));
    }

    #[test]
    fn test_generate_writes_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out").join("run.html");
        let result = ExecutionResult::timeout(EngineType::Api, Duration::from_secs(5));

        generate_html_report(&result, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Timeout"));
    }
}
