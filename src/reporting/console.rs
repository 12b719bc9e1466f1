//! # Console Reporting Module / 控制台报告模块
//!
//! Coloured, localized summaries of generation, execution, quick-test and
//! report results.
//!
//! 生成、执行、快速测试和报告结果的彩色本地化摘要。

use colored::*;

use crate::core::models::{ExecutionResult, GeneratedAsset};
use crate::infra::t;
use crate::reporting::service::{ReportListing, ReportSummary, SummaryStatus};
use crate::runner::quick::QuickApiResult;

/// Prints where an asset went and what was skipped on the way.
/// 打印资产的保存位置以及生成过程中跳过的内容。
pub fn print_generated_asset(asset: &GeneratedAsset) {
    println!("\n{}", t!("console.generated_banner").bold());
    println!("  - {:<10} {}", t!("console.engine"), asset.engine_type.to_string().cyan());
    println!("  - {:<10} {}", t!("console.format"), asset.format.to_string().cyan());
    println!("  - {:<10} {}", t!("console.path"), asset.save_path.display());
    if let Some(command) = &asset.run_command {
        println!("  - {:<10} {}", t!("console.run_command"), command.yellow());
    }
    for skipped in &asset.skipped {
        println!("  {} {}", "!".yellow().bold(), skipped.to_string().yellow());
    }
}

/// Prints the outcome of one run.
///
/// # Output Format / 输出格式
/// ```text
/// --- Execution Summary ---
///   - Status     | Passed
///   - Engine     | api
///   - Duration   | 3.12s
///   - Results    | 12 passed, 3 failed, 0 skipped (15 total)
/// ```
pub fn print_execution_result(result: &ExecutionResult) {
    println!("\n{}", t!("console.execution_banner").bold());

    let status = if result.success {
        t!("console.status_passed").green()
    } else if result.is_timeout() {
        t!("console.status_timeout").red()
    } else {
        t!("console.status_failed").red()
    };
    println!("  - {:<10} | {}", t!("console.status"), status);
    if let Some(engine) = result.engine_type {
        println!("  - {:<10} | {}", t!("console.engine"), engine);
    }
    println!("  - {:<10} | {:.2}s", t!("console.duration"), result.duration_seconds);

    let stats = &result.statistics;
    println!(
        "  - {:<10} | {}",
        t!("console.results"),
        t!(
            "console.results_line",
            passed = stats.passed.to_string().green(),
            failed = stats.failed.to_string().red(),
            skipped = stats.skipped.to_string().dimmed(),
            total = stats.total
        )
    );
    if let Some(report) = &result.report {
        println!("  - {:<10} | {}", t!("console.report"), report.path.display());
    }
    if let Some(error) = &result.error {
        println!("  - {:<10} | {}", t!("console.error"), error.red());
    }

    if !result.success {
        if let Some(output) = &result.output {
            if !output.stderr.trim().is_empty() {
                println!("\n--- {} ---\n", t!("console.stderr_tail").yellow());
                println!("{}", output.stderr.trim_end());
                println!("\n{}", "-".repeat(80));
            }
        }
    }
}

/// Prints every in-process assertion with its verdict.
pub fn print_quick_result(result: &QuickApiResult) {
    println!("\n{}", t!("console.quick_banner").bold());
    if let Some(response) = &result.response {
        println!(
            "  - {} {} -> {} ({} ms)",
            result.request.method,
            result.request.url,
            response.status.to_string().cyan(),
            response.elapsed_ms
        );
    }
    for outcome in &result.assertions {
        let mark = if outcome.passed { "PASS".green() } else { "FAIL".red() };
        match &outcome.error {
            Some(error) => println!("  [{}] {} ({})", mark, outcome.name, error.dimmed()),
            None => println!("  [{}] {}", mark, outcome.name),
        }
    }
    if let Some(error) = &result.error {
        println!("  {}", error.red());
    }
    let summary = t!(
        "console.quick_summary",
        passed = result.summary.passed,
        total = result.summary.total
    );
    if result.success {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}

pub fn print_report_summary(summary: &ReportSummary) {
    let text = match summary.status {
        SummaryStatus::AllPassed => summary.text.green(),
        SummaryStatus::SomeFailed => summary.text.red(),
        SummaryStatus::NoResults => summary.text.dimmed(),
    };
    println!("{}", text);
    if !summary.success {
        println!("{}", summary.message.yellow());
    }
}

/// Prints a listing as a table, newest first.
pub fn print_report_listing(listing: &ReportListing) {
    if listing.reports.is_empty() {
        println!("{}", t!("console.no_reports").dimmed());
        return;
    }
    println!("\n{}", t!("console.reports_banner", shown = listing.reports.len(), total = listing.total).bold());
    for report in &listing.reports {
        println!(
            "  - {:<40} | {:>10} | {}",
            report.name.cyan(),
            format!("{} B", report.size_bytes),
            report.modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
}
