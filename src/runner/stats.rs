//! Statistics parsing / 统计解析
//!
//! The dispatcher is expected to print one machine-readable summary line:
//!
//! ```text
//! TESTENGINE-SUMMARY {"passed": 12, "failed": 3, "skipped": 0}
//! ```
//!
//! When no such line exists the counts are recovered on a best-effort basis
//! by searching for `<n> passed`, `<n> failed`, `<n> skipped` and
//! `<n> error(s)` tokens.
//!
//! 调度器应输出一行机器可读的摘要。若不存在，则尽力通过搜索
//! `<n> passed`、`<n> failed`、`<n> skipped` 和 `<n> error(s)` 标记恢复计数。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::core::models::Statistics;

/// Prefix of the structured summary line.
pub const SUMMARY_SENTINEL: &str = "TESTENGINE-SUMMARY";

static PASSED: Lazy<Option<Regex>> = Lazy::new(|| counter_pattern("passed"));
static FAILED: Lazy<Option<Regex>> = Lazy::new(|| counter_pattern("failed"));
static SKIPPED: Lazy<Option<Regex>> = Lazy::new(|| counter_pattern("skipped"));
static ERRORS: Lazy<Option<Regex>> = Lazy::new(|| counter_pattern("errors?"));

fn counter_pattern(word: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)(\d+)\s*{}\b", word)).ok()
}

#[derive(Deserialize)]
struct SummaryLine {
    #[serde(default)]
    passed: u32,
    #[serde(default)]
    failed: u32,
    #[serde(default)]
    skipped: u32,
    #[serde(default)]
    errors: u32,
}

/// Structured summary first, regex scan second.
/// 优先使用结构化摘要，其次使用正则扫描。
pub fn parse_statistics(output: &str) -> Statistics {
    parse_sentinel(output).unwrap_or_else(|| scan_counts(output))
}

/// Reads the last well-formed sentinel line, if any.
pub fn parse_sentinel(output: &str) -> Option<Statistics> {
    output.lines().rev().find_map(|line| {
        let payload = line.trim().strip_prefix(SUMMARY_SENTINEL)?;
        let summary: SummaryLine = serde_json::from_str(payload.trim()).ok()?;
        Some(Statistics::new(summary.passed, summary.failed, summary.skipped).with_errors(summary.errors))
    })
}

/// Best-effort count recovery from free-form text; the first match of each token wins.
/// 从自由文本中尽力恢复计数；每种标记取第一次匹配。
pub fn scan_counts(text: &str) -> Statistics {
    Statistics::new(
        first_count(&PASSED, text),
        first_count(&FAILED, text),
        first_count(&SKIPPED, text),
    )
    .with_errors(first_count(&ERRORS, text))
}

fn first_count(pattern: &Option<Regex>, text: &str) -> u32 {
    pattern
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
