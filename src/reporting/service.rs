//! # Report Service / 报告服务
//!
//! Read-only access to the reports directory the external framework writes
//! into. Nothing here raises for a missing or empty directory; callers get a
//! structured "no report found" value instead.
//!
//! 对外部框架写入的报告目录进行只读访问。目录缺失或为空时不会报错，
//! 调用方会得到结构化的“未找到报告”结果。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::{EngineConfig, ReportsConfig};
use crate::core::models::{ReportInfo, Statistics};
use crate::infra::command::head;
use crate::runner::stats::parse_statistics;

/// Qualitative outcome derived from report statistics.
/// 由报告统计得出的定性结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    AllPassed,
    SomeFailed,
    NoResults,
}

impl SummaryStatus {
    pub fn from_statistics(statistics: &Statistics) -> Self {
        if statistics.total == 0 {
            SummaryStatus::NoResults
        } else if statistics.failed > 0 || statistics.errors > 0 {
            SummaryStatus::SomeFailed
        } else {
            SummaryStatus::AllPassed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryStatus::AllPassed => "all passed",
            SummaryStatus::SomeFailed => "some failed",
            SummaryStatus::NoResults => "no results",
        }
    }
}

/// One report with parsed counts and a bounded preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportInfo>,
    pub statistics: Statistics,
    pub content: String,
    pub truncated: bool,
}

impl ReportDetail {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            report: None,
            statistics: Statistics::default(),
            content: String::new(),
            truncated: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportListing {
    pub success: bool,
    pub message: String,
    /// Newest first / 最新的在前
    pub reports: Vec<ReportInfo>,
    /// Number of reports found before the limit was applied / 应用上限前发现的报告数
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub success: bool,
    pub message: String,
    pub status: SummaryStatus,
    pub statistics: Statistics,
    /// e.g. `80.0%`
    pub pass_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportInfo>,
    /// Preformatted block for humans / 供人阅读的预格式化文本
    pub text: String,
}

/// Stateless reader over one reports directory.
/// 针对单个报告目录的无状态读取器。
#[derive(Debug, Clone)]
pub struct ReportService {
    reports_dir: PathBuf,
    settings: ReportsConfig,
}

impl ReportService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self::with_settings(reports_dir, ReportsConfig::default())
    }

    pub fn with_settings(reports_dir: impl Into<PathBuf>, settings: ReportsConfig) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            settings,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_settings(config.paths.reports_dir.clone(), config.reports.clone())
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// The well-known latest file if present, else the most recently modified report.
    /// 若存在固定名称的最新文件则返回它，否则返回最近修改的报告。
    pub fn find_latest(&self) -> Option<ReportInfo> {
        let preferred = self.reports_dir.join(&self.settings.latest_name);
        if preferred.is_file() {
            if let Some(info) = self.report_info(&preferred) {
                return Some(info);
            }
        }
        self.scan().into_iter().next()
    }

    /// Loads `name` or the latest report. `name` is the path relative to the
    /// reports directory, exactly as `list_reports` returns it.
    ///
    /// Absolute names and names with `..` or `.` components are rejected so
    /// lookups cannot leave the reports directory.
    ///
    /// 加载 `name` 或最新报告。`name` 是相对报告目录的路径，与 `list_reports` 返回的一致。
    /// 绝对路径以及含 `..` 或 `.` 的名称会被拒绝。
    pub fn get_report(&self, name: Option<&str>) -> ReportDetail {
        let info = match name {
            Some(name) => {
                if !is_relative_report_name(name) {
                    return ReportDetail::not_found(format!("invalid report name: {}", name));
                }
                let path = self.reports_dir.join(name);
                if !path.is_file() {
                    return ReportDetail::not_found(format!("report not found: {}", name));
                }
                match self.report_info(&path) {
                    Some(info) => info,
                    None => return ReportDetail::not_found(format!("report not readable: {}", name)),
                }
            }
            None => match self.find_latest() {
                Some(info) => info,
                None => return ReportDetail::not_found("no report found"),
            },
        };

        let text = match fs::read(&info.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => return ReportDetail::not_found(format!("failed to read {}: {}", info.path.display(), e)),
        };
        let content = head(&text, self.settings.preview_chars);
        let truncated = content.len() < text.len();

        ReportDetail {
            success: true,
            message: format!("report {}", info.name),
            statistics: parse_statistics(&text),
            report: Some(info),
            content,
            truncated,
        }
    }

    /// Up to `limit` reports, newest first.
    pub fn list_reports(&self, limit: usize) -> ReportListing {
        let mut reports = self.scan();
        let total = reports.len();
        reports.truncate(limit);
        ReportListing {
            success: true,
            message: format!("{} report(s) found", total),
            reports,
            total,
        }
    }

    /// Status, pass rate and a printable block for the latest report.
    /// 最新报告的状态、通过率和可打印文本。
    pub fn generate_summary(&self) -> ReportSummary {
        let detail = self.get_report(None);
        let statistics = detail.statistics;
        let status = SummaryStatus::from_statistics(&statistics);
        let pass_rate = format!("{:.1}%", statistics.pass_rate());

        let mut text = String::new();
        text.push_str("Test Report Summary\n");
        text.push_str("===================\n");
        text.push_str(&format!("Status:    {}\n", status.label()));
        text.push_str(&format!("Total:     {}\n", statistics.total));
        text.push_str(&format!("Passed:    {}\n", statistics.passed));
        text.push_str(&format!("Failed:    {}\n", statistics.failed));
        text.push_str(&format!("Skipped:   {}\n", statistics.skipped));
        if statistics.errors > 0 {
            text.push_str(&format!("Errors:    {}\n", statistics.errors));
        }
        text.push_str(&format!("Pass rate: {}\n", pass_rate));
        if let Some(report) = &detail.report {
            text.push_str(&format!("Report:    {}\n", report.path.display()));
        }

        ReportSummary {
            success: detail.success,
            message: if detail.success {
                format!("{}, pass rate {}", status.label(), pass_rate)
            } else {
                detail.message
            },
            status,
            statistics,
            pass_rate,
            report: detail.report,
            text,
        }
    }

    /// Every report file within `max_depth`, newest first.
    fn scan(&self) -> Vec<ReportInfo> {
        if !self.reports_dir.is_dir() {
            return Vec::new();
        }
        let mut reports: Vec<ReportInfo> = WalkDir::new(&self.reports_dir)
            .max_depth(self.settings.max_depth.max(1))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.is_report_file(entry.path()))
            .filter_map(|entry| self.report_info(entry.path()))
            .collect();
        reports.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        reports
    }

    fn is_report_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.settings
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Metadata of `path`, named relative to the reports directory with `/` separators.
    fn report_info(&self, path: &Path) -> Option<ReportInfo> {
        let metadata = fs::metadata(path).ok()?;
        let modified: DateTime<Local> = metadata.modified().ok()?.into();
        let relative = path.strip_prefix(&self.reports_dir).ok()?;
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(ReportInfo {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified,
        })
    }
}

/// A non-empty relative path made only of normal components.
fn is_relative_report_name(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
