//! # Report Service Unit Tests / 报告服务单元测试
//!
//! Tests report discovery, lookup, listing and summaries over a temporary
//! reports directory.
//!
//! 基于临时报告目录测试报告的发现、查询、列表和摘要。

mod common;

use common::write_report;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;
use testengine::config::ReportsConfig;
use testengine::models::Statistics;
use testengine::reporting::{ReportService, SummaryStatus};

/// Sets the modification time of `path` to `age` before now.
fn age_file(path: &Path, age: Duration) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_status_from_statistics() {
        assert_eq!(SummaryStatus::from_statistics(&Statistics::default()), SummaryStatus::NoResults);
        assert_eq!(SummaryStatus::from_statistics(&Statistics::new(3, 0, 1)), SummaryStatus::AllPassed);
        assert_eq!(SummaryStatus::from_statistics(&Statistics::new(3, 1, 0)), SummaryStatus::SomeFailed);
        assert_eq!(
            SummaryStatus::from_statistics(&Statistics::new(3, 0, 0).with_errors(1)),
            SummaryStatus::SomeFailed
        );
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn test_missing_directory_yields_no_report() {
        let temp = tempdir().unwrap();
        let service = ReportService::new(temp.path().join("does-not-exist"));

        assert!(service.find_latest().is_none());
        let detail = service.get_report(None);
        assert!(!detail.success);
        assert_eq!(detail.message, "no report found");

        let listing = service.list_reports(10);
        assert!(listing.success);
        assert!(listing.reports.is_empty());
        assert_eq!(listing.total, 0);
    }

    #[test]
    fn test_latest_name_is_preferred_over_newer_files() {
        let temp = tempdir().unwrap();
        let summary = write_report(temp.path(), "summary.txt", "1 passed");
        age_file(&summary, Duration::from_secs(3600));
        write_report(temp.path(), "run.html", "<html>2 passed</html>");

        let latest = ReportService::new(temp.path()).find_latest().unwrap();
        assert_eq!(latest.name, "summary.txt");
    }

    #[test]
    fn test_newest_report_wins_without_latest_name() {
        let temp = tempdir().unwrap();
        let old = write_report(temp.path(), "old.html", "old");
        age_file(&old, Duration::from_secs(600));
        write_report(temp.path(), "new.html", "new");
        write_report(temp.path(), "notes.bin", "ignored extension");

        let latest = ReportService::new(temp.path()).find_latest().unwrap();
        assert_eq!(latest.name, "new.html");
    }

    #[test]
    fn test_get_report_by_name_parses_statistics() {
        let temp = tempdir().unwrap();
        write_report(temp.path(), "run.txt", "=== 12 passed, 3 failed in 9.1s ===");

        let detail = ReportService::new(temp.path()).get_report(Some("run.txt"));
        assert!(detail.success);
        assert_eq!(detail.statistics, Statistics::new(12, 3, 0));
        assert_eq!(detail.report.unwrap().name, "run.txt");
        assert!(!detail.truncated);
    }

    #[test]
    fn test_get_report_rejects_traversal() {
        let temp = tempdir().unwrap();
        let reports = temp.path().join("reports");
        write_report(&reports, "run.txt", "1 passed");
        write_report(temp.path(), "secret.txt", "top secret");

        let service = ReportService::new(&reports);
        for name in ["../secret.txt", "/etc/passwd", "nested/../../secret.txt", "./run.txt", "..", ""] {
            let detail = service.get_report(Some(name));
            assert!(!detail.success, "{}", name);
            assert!(detail.message.starts_with("invalid report name"), "{}", name);
            assert!(detail.content.is_empty());
        }
        assert_eq!(service.get_report(Some("absent.txt")).message, "report not found: absent.txt");
    }

    #[test]
    fn test_preview_is_bounded() {
        let temp = tempdir().unwrap();
        write_report(temp.path(), "big.log", &"x".repeat(500));
        let settings = ReportsConfig {
            preview_chars: 100,
            ..ReportsConfig::default()
        };

        let detail = ReportService::with_settings(temp.path(), settings).get_report(Some("big.log"));
        assert_eq!(detail.content.len(), 100);
        assert!(detail.truncated);
    }
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_list_is_newest_first_and_limited() {
        let temp = tempdir().unwrap();
        for i in 0..8u64 {
            let path = write_report(temp.path(), &format!("report_{}.html", i), "ok");
            // report_7 is the newest
            age_file(&path, Duration::from_secs(100 * (8 - i)));
        }

        let listing = ReportService::new(temp.path()).list_reports(5);
        assert_eq!(listing.total, 8);
        let names: Vec<&str> = listing.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["report_7.html", "report_6.html", "report_5.html", "report_4.html", "report_3.html"]
        );
    }

    #[test]
    fn test_list_respects_depth() {
        let temp = tempdir().unwrap();
        write_report(temp.path(), "top.html", "ok");
        write_report(temp.path(), "allure/index.html", "ok");
        write_report(temp.path(), "a/b/c/deep.html", "ok");

        let listing = ReportService::new(temp.path()).list_reports(20);
        let mut names: Vec<&str> = listing.reports.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["allure/index.html", "top.html"]);
    }

    #[test]
    fn test_listed_nested_report_can_be_opened() {
        let temp = tempdir().unwrap();
        write_report(temp.path(), "allure/run.html", "5 passed, 1 failed");

        let service = ReportService::new(temp.path());
        let listing = service.list_reports(10);
        assert_eq!(listing.reports.len(), 1);
        let name = listing.reports[0].name.clone();
        assert_eq!(name, "allure/run.html");

        let detail = service.get_report(Some(&name));
        assert!(detail.success, "{}", detail.message);
        assert_eq!(detail.statistics, Statistics::new(5, 1, 0));
        assert_eq!(detail.report.unwrap().path, temp.path().join("allure").join("run.html"));
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_summary_of_partially_failed_run() {
        let temp = tempdir().unwrap();
        write_report(temp.path(), "summary.txt", "12 passed, 3 failed");

        let summary = ReportService::new(temp.path()).generate_summary();
        assert!(summary.success);
        assert_eq!(summary.status, SummaryStatus::SomeFailed);
        assert_eq!(summary.pass_rate, "80.0%");
        assert_eq!(summary.statistics.total, 15);
        assert!(summary.text.contains("Status:    some failed"));
        assert!(summary.text.contains("Pass rate: 80.0%"));
        assert!(summary.text.contains("Report:"));
    }

    #[test]
    fn test_summary_without_reports() {
        let temp = tempdir().unwrap();
        let summary = ReportService::new(temp.path()).generate_summary();

        assert!(!summary.success);
        assert_eq!(summary.status, SummaryStatus::NoResults);
        assert_eq!(summary.pass_rate, "0.0%");
        assert_eq!(summary.message, "no report found");
        assert!(!summary.text.contains("Report:"));
    }
}
