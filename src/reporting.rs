//! # Reporting Module / 报告模块
//!
//! This module reads the reports the external framework leaves behind and
//! presents results to people: coloured console summaries and a standalone
//! HTML page for one execution.
//!
//! 此模块读取外部框架留下的报告，并以彩色控制台摘要和独立 HTML 页面的形式展示结果。

pub mod console;
pub mod html;
pub mod service;

// Re-export common reporting functions
pub use console::{print_execution_result, print_generated_asset, print_quick_result, print_report_summary};
pub use html::generate_html_report;
pub use service::{ReportDetail, ReportListing, ReportService, ReportSummary, SummaryStatus};
