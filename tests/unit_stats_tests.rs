//! # Statistics Parsing Unit Tests / 统计解析单元测试
//!
//! Tests how pass/fail counts are recovered from dispatcher output.
//!
//! 测试如何从调度器输出中恢复通过/失败计数。

use testengine::models::Statistics;
use testengine::runner::stats::{parse_sentinel, parse_statistics, scan_counts, SUMMARY_SENTINEL};

#[cfg(test)]
mod sentinel_tests {
    use super::*;

    #[test]
    fn test_sentinel_line_is_preferred() {
        let output = format!(
            "collected 20 items\n99 passed in noise\n{} {{\"passed\": 12, \"failed\": 3, \"skipped\": 1}}\n",
            SUMMARY_SENTINEL
        );
        let stats = parse_statistics(&output);
        assert_eq!(stats, Statistics::new(12, 3, 1));
        assert_eq!(stats.total, 16);
    }

    #[test]
    fn test_last_valid_sentinel_wins() {
        let output = format!(
            "{s} {{\"passed\": 1}}\n{s} {{\"passed\": 5, \"errors\": 2}}\n{s} not json\n",
            s = SUMMARY_SENTINEL
        );
        let stats = parse_sentinel(&output).unwrap();
        assert_eq!(stats.passed, 5);
        assert_eq!(stats.errors, 2);
    }

    #[test]
    fn test_malformed_sentinel_falls_back_to_scan() {
        let output = format!("{} {{broken\n=== 4 passed, 2 failed in 1.2s ===\n", SUMMARY_SENTINEL);
        assert_eq!(parse_sentinel(&output), None);
        assert_eq!(parse_statistics(&output), Statistics::new(4, 2, 0));
    }
}

#[cfg(test)]
mod scan_tests {
    use super::*;

    #[test]
    fn test_scan_pytest_summary() {
        let stats = scan_counts("==== 10 passed, 2 failed, 3 skipped, 1 error in 4.56s ====");
        assert_eq!(stats.passed, 10);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total, 15);
    }

    #[test]
    fn test_scan_is_case_insensitive_and_tolerates_missing_tokens() {
        let stats = scan_counts("Tests: 7 PASSED");
        assert_eq!(stats, Statistics::new(7, 0, 0));
    }

    #[test]
    fn test_scan_without_counts_is_empty() {
        let stats = parse_statistics("Traceback (most recent call last):\nImportError");
        assert!(stats.is_empty());
        assert_eq!(stats.pass_rate(), 0.0);
    }

    #[test]
    fn test_huge_counts_saturate_total() {
        let stats = parse_statistics("4294967295 passed, 1 failed");
        assert_eq!(stats.passed, u32::MAX);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total, u32::MAX);
        assert!(stats.pass_rate() <= 100.0);

        let output = format!(
            "{} {{\"passed\": 4294967295, \"failed\": 4294967295, \"skipped\": 7}}",
            SUMMARY_SENTINEL
        );
        assert_eq!(parse_sentinel(&output).unwrap().total, u32::MAX);
    }

    #[test]
    fn test_pass_rate() {
        let stats = Statistics::new(12, 3, 0);
        assert!((stats.pass_rate() - 80.0).abs() < 1e-9);
    }
}
