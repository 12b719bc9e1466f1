// src/commands/report.rs

use anyhow::Result;
use colored::*;

use crate::{
    commands::print_json,
    core::config::EngineConfig,
    reporting::{console::print_report_listing, print_report_summary, ReportService},
    t,
};

pub enum ReportAction {
    /// A named report, or the latest one.
    Show(Option<String>),
    List(usize),
    Summary,
}

pub fn execute(config: &EngineConfig, action: ReportAction) -> Result<bool> {
    let service = ReportService::from_config(config);

    match action {
        ReportAction::Show(name) => {
            let detail = service.get_report(name.as_deref());
            if detail.success {
                println!("{}", detail.content);
                if detail.truncated {
                    println!("{}", t!("report_truncated").dimmed());
                }
            } else {
                println!("{}", detail.message.yellow());
            }
            print_json(&detail)?;
            Ok(detail.success)
        }
        ReportAction::List(limit) => {
            let listing = service.list_reports(limit);
            print_report_listing(&listing);
            print_json(&listing)?;
            Ok(listing.success)
        }
        ReportAction::Summary => {
            let summary = service.generate_summary();
            print_report_summary(&summary);
            print_json(&summary)?;
            Ok(summary.success)
        }
    }
}
