// src/commands/run.rs

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    commands::print_json,
    core::{
        config::EngineConfig,
        models::{CaseFormat, EngineType},
    },
    reporting::{generate_html_report, print_execution_result},
    runner::{ExecutionContext, TestRunnerService},
    t,
};

/// What a `run` invocation points at.
pub enum RunTarget {
    File(PathBuf),
    Directory {
        path: PathBuf,
        engine: Option<EngineType>,
        format: CaseFormat,
    },
    Case {
        engine: EngineType,
        path: PathBuf,
    },
    Batch {
        engine: EngineType,
        paths: Vec<PathBuf>,
    },
}

pub struct RunArgs {
    pub target: RunTarget,
    pub context: ExecutionContext,
    pub html: Option<PathBuf>,
}

/// Loads a declarative case document as a JSON value.
fn read_case(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file: {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Invalid case document: {}", path.display()))
}

pub async fn execute(config: &EngineConfig, args: RunArgs) -> Result<bool> {
    let runner = TestRunnerService::from_config(config)?;
    let context = Some(&args.context);

    let result = match &args.target {
        RunTarget::File(path) => runner.run_test_from_file(path, context).await,
        RunTarget::Directory { path, engine, format } => {
            runner.run_test_directory(path, *engine, *format, context).await
        }
        RunTarget::Case { engine, path } => {
            let case = read_case(path)?;
            runner.run_test_case(*engine, &case, context).await
        }
        RunTarget::Batch { engine, paths } => {
            let cases = paths
                .iter()
                .map(|path| read_case(path))
                .collect::<Result<Vec<_>>>()?;
            runner.run_test_cases_batch(*engine, &cases, context).await
        }
    };

    print_execution_result(&result);

    if let Some(html_path) = &args.html {
        generate_html_report(&result, html_path)?;
        println!(
            "\n{}",
            t!("html_report_generated", path = html_path.display()).green()
        );
    }

    print_json(&result)?;
    Ok(result.success)
}
