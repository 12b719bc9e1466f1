//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders one [`ExecutionResult`] as a standalone HTML page with the
//! statistics, the latest report reference and the captured output tails.
//!
//! 将一个 [`ExecutionResult`] 渲染为独立的 HTML 页面，包含统计信息、
//! 最新报告引用以及捕获的输出片段。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::path::Path;

use crate::core::models::ExecutionResult;
use crate::infra::fs::write_atomic;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #24292f; }
h1 { font-size: 1.6em; }
.summary-container { display: flex; gap: 1em; margin: 1.5em 0; }
.summary-item { border: 1px solid #d0d7de; border-radius: 6px; padding: 0.8em 1.2em; text-align: center; }
.summary-item .count { display: block; font-size: 1.8em; font-weight: 600; }
.summary-item .label { color: #57606a; }
.passed-text { color: #1a7f37; }
.failed-text { color: #cf222e; }
.skipped-text { color: #9a6700; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { text-align: left; padding: 0.3em 1em 0.3em 0; }
pre.output-content { background: #f6f8fa; padding: 1em; overflow-x: auto; white-space: pre-wrap; }
"#;

/// Builds the page for `result`.
/// 为 `result` 构建页面。
pub fn render_html_report(result: &ExecutionResult) -> Markup {
    let stats = &result.statistics;
    let status_class = if result.success { "passed-text" } else { "failed-text" };
    let status = if result.success {
        t!("html_report.status_passed")
    } else {
        t!("html_report.status_failed")
    };

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header")) }
                p class=(status_class) { strong { (status) } " - " (result.message) }

                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (stats.total) }
                        span class="label" { (t!("html_report.summary.total")) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (stats.passed) }
                        span class="label" { (t!("html_report.summary.passed")) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (stats.failed) }
                        span class="label" { (t!("html_report.summary.failed")) }
                    }
                    div class="summary-item" {
                        span class="count skipped-text" { (stats.skipped) }
                        span class="label" { (t!("html_report.summary.skipped")) }
                    }
                    div class="summary-item" {
                        span class="count" { (format!("{:.1}%", stats.pass_rate())) }
                        span class="label" { (t!("html_report.summary.pass_rate")) }
                    }
                }

                table {
                    @if let Some(engine) = result.engine_type {
                        tr { th { (t!("html_report.engine")) } td { (engine) } }
                    }
                    tr { th { (t!("html_report.duration")) } td { (format!("{:.2}s", result.duration_seconds)) } }
                    @if let Some(code) = result.return_code {
                        tr { th { (t!("html_report.return_code")) } td { (code) } }
                    }
                    @if let Some(report) = &result.report {
                        tr { th { (t!("html_report.report")) } td { (report.path.display()) } }
                    }
                    @if let Some(dir) = &result.cases_dir {
                        tr { th { (t!("html_report.cases_dir")) } td { (dir.display()) } }
                    }
                    @if let Some(error) = &result.error {
                        tr { th { (t!("html_report.error")) } td class="failed-text" { (error) } }
                    }
                }

                @if let Some(output) = &result.output {
                    @if !output.stdout.is_empty() {
                        h2 { "stdout" }
                        pre class="output-content" { (output.stdout) }
                    }
                    @if !output.stderr.is_empty() {
                        h2 { "stderr" }
                        pre class="output-content" { (output.stderr) }
                    }
                }
            }
        }
    }
}

/// Writes the HTML page for `result` to `output_path`.
///
/// # Errors
/// Fails when the file cannot be written.
pub fn generate_html_report(result: &ExecutionResult, output_path: &Path) -> Result<()> {
    let page = render_html_report(result).into_string();
    write_atomic(output_path, &page)
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
