//! # Test Execution Module / 测试执行模块
//!
//! [`TestRunnerService`] drives every run through the same phases:
//!
//! 1. **Prepare** - materialize an isolated workspace (context file plus case files)
//! 2. **Dispatch** - hand the workspace to the [`Dispatcher`] under a hard time ceiling
//! 3. **Collect** - keep the exit code, output tails and elapsed time
//! 4. **Parse** - recover pass/fail/skip counts from the output
//! 5. **Cleanup** - remove the workspace, whatever happened before
//!
//! None of the entry points return an error. Timeouts, launch failures and
//! preparation problems all come back as an [`ExecutionResult`].
//!
//! [`TestRunnerService`] 让每次运行都经过相同的阶段：准备、调度、收集、解析、清理。
//! 所有入口都不会返回错误，超时、启动失败和准备问题都以 [`ExecutionResult`] 返回。

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::core::config::EngineConfig;
use crate::core::models::{CaseFormat, EngineType, ExecutionResult, FailureReason, OutputTail, Statistics};
use crate::infra::command::tail;
use crate::infra::fs::{is_directory, resolve_against};
use crate::infra::t;
use crate::reporting::service::{ReportDetail, ReportListing, ReportService, ReportSummary};
use crate::runner::context::{read_engine_marker, ExecutionContext, CONTEXT_FILE};
use crate::runner::dispatcher::{DispatchInvocation, Dispatcher, ProcessDispatcher};
use crate::runner::quick::{self, QuickApiRequest, QuickApiResult};
use crate::runner::stats::parse_statistics;
use crate::runner::workspace::{batch_case_file, RunWorkspace, SINGLE_CASE_FILE};

/// The phases of one run, used to tag progress lines.
/// 单次运行的阶段，用于标记进度输出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Prepare,
    Dispatch,
    Collect,
    Parse,
    Cleanup,
}

impl RunPhase {
    fn label(&self) -> String {
        match self {
            RunPhase::Prepare => t!("runner.phase.prepare").to_string(),
            RunPhase::Dispatch => t!("runner.phase.dispatch").to_string(),
            RunPhase::Collect => t!("runner.phase.collect").to_string(),
            RunPhase::Parse => t!("runner.phase.parse").to_string(),
            RunPhase::Cleanup => t!("runner.phase.cleanup").to_string(),
        }
    }
}

/// Where the cases of an isolated run come from.
enum CaseSource<'a> {
    Single(&'a Value),
    Batch(&'a [Value]),
    File(&'a Path),
}

impl CaseSource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            CaseSource::Single(_) => "case",
            CaseSource::Batch(_) => "batch",
            CaseSource::File(_) => "file",
        }
    }
}

/// Executes test assets through a [`Dispatcher`] and reads back reports.
/// 通过 [`Dispatcher`] 执行测试资产并读取报告。
pub struct TestRunnerService {
    dispatcher: Arc<dyn Dispatcher>,
    reports: ReportService,
    workspace_root: PathBuf,
    timeout: Duration,
    stdout_tail: usize,
    stderr_tail: usize,
    http: reqwest::Client,
    body_preview_chars: usize,
    quiet: bool,
}

impl TestRunnerService {
    /// Builds a runner around `dispatcher`, taking every other setting from `config`.
    ///
    /// # Errors
    /// Fails only when the HTTP client for quick tests cannot be built.
    pub fn new(dispatcher: Arc<dyn Dispatcher>, config: &EngineConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.quick_test.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            dispatcher,
            reports: ReportService::from_config(config),
            workspace_root: config.paths.workspace_root.clone(),
            timeout: config.dispatcher.timeout(),
            stdout_tail: config.output.stdout_tail,
            stderr_tail: config.output.stderr_tail,
            http,
            body_preview_chars: config.quick_test.body_preview_chars,
            quiet: config.quiet,
        })
    }

    /// Builds a runner that spawns the configured dispatcher command.
    /// 构建一个启动配置中调度器命令的运行器。
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let dispatcher = ProcessDispatcher::from_config(&config.dispatcher)?;
        Self::new(Arc::new(dispatcher), config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn reports(&self) -> &ReportService {
        &self.reports
    }

    /// Runs one in-memory declarative case, written as `test_case.yaml`.
    /// 运行一个内存中的声明式用例，写入为 `test_case.yaml`。
    pub async fn run_test_case(
        &self,
        engine: EngineType,
        case: &Value,
        context: Option<&ExecutionContext>,
    ) -> ExecutionResult {
        let context = context.cloned().unwrap_or_default();
        self.run_isolated(engine, CaseFormat::Declarative, CaseSource::Single(case), &context)
            .await
    }

    /// Runs a case file that already exists on disk.
    ///
    /// The file is copied into an isolated workspace. The engine is detected
    /// from the file's parent directory and the format from its extension.
    ///
    /// 运行磁盘上已存在的用例文件。文件会被复制到独立工作区，
    /// 引擎根据父目录检测，格式根据扩展名确定。
    pub async fn run_test_from_file(&self, path: &Path, context: Option<&ExecutionContext>) -> ExecutionResult {
        let path = resolve_against(&self.workspace_root, path);
        if !path.is_file() {
            let mut result = ExecutionResult::failure(
                FailureReason::NotFound,
                format!("test case file does not exist: {}", path.display()),
                "NotFound",
            );
            result.case_file = Some(path);
            return result;
        }

        let engine = path
            .parent()
            .map(detect_engine_type)
            .unwrap_or(EngineType::Api);
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(CaseFormat::from_extension)
            .unwrap_or(CaseFormat::Declarative);
        let context = context.cloned().unwrap_or_default();

        let mut result = self
            .run_isolated(engine, format, CaseSource::File(&path), &context)
            .await;
        result.case_file = Some(path);
        result
    }

    /// Runs every case in a directory, in place.
    ///
    /// Relative paths resolve against the workspace root. Without an explicit
    /// engine it is detected from the directory's `context.yaml` marker, then
    /// from its name.
    ///
    /// 就地运行目录中的全部用例。相对路径基于工作区根目录解析；
    /// 未指定引擎时先读取 `context.yaml` 标记，再根据目录名推断。
    pub async fn run_test_directory(
        &self,
        dir: &Path,
        engine: Option<EngineType>,
        format: CaseFormat,
        context: Option<&ExecutionContext>,
    ) -> ExecutionResult {
        let dir = resolve_against(&self.workspace_root, dir);
        if !is_directory(&dir) {
            let mut result = ExecutionResult::failure(
                FailureReason::NotFound,
                format!("test case directory does not exist: {}", dir.display()),
                "NotFound",
            );
            result.cases_dir = Some(dir);
            return result;
        }

        let engine = engine.unwrap_or_else(|| detect_engine_type(&dir));
        let case_count = count_case_files(&dir, format);
        let context = context.cloned().unwrap_or_default();
        self.announce(
            RunPhase::Prepare,
            t!("runner.directory", engine = engine, count = case_count, path = dir.display()),
        );

        let mut result = self.dispatch(engine, format, &dir, &context).await;
        result.cases_dir = Some(dir);
        result.case_count = Some(case_count);
        result
    }

    /// Runs several in-memory cases together as `001_test_case.yaml`, `002_...`.
    /// 将多个内存用例作为 `001_test_case.yaml`、`002_...` 一起运行。
    pub async fn run_test_cases_batch(
        &self,
        engine: EngineType,
        cases: &[Value],
        context: Option<&ExecutionContext>,
    ) -> ExecutionResult {
        if cases.is_empty() {
            let mut result =
                ExecutionResult::failure(FailureReason::Preparation, "no test cases supplied", "EmptyBatch")
                    .with_engine(engine);
            result.total_cases = Some(0);
            return result;
        }

        let context = context.cloned().unwrap_or_default();
        let mut result = self
            .run_isolated(engine, CaseFormat::Declarative, CaseSource::Batch(cases), &context)
            .await;
        result.total_cases = Some(cases.len());
        result
    }

    /// Sends one ad-hoc HTTP request and checks it in process.
    /// The dispatcher is not involved.
    pub async fn run_api_test(&self, request: QuickApiRequest) -> QuickApiResult {
        if !self.quiet {
            println!(
                "{}",
                t!("runner.quick_test", method = request.method, url = request.url).blue()
            );
        }
        quick::run_api_test(&self.http, request, self.body_preview_chars).await
    }

    pub fn get_report(&self, name: Option<&str>) -> ReportDetail {
        self.reports.get_report(name)
    }

    pub fn list_reports(&self, limit: usize) -> ReportListing {
        self.reports.list_reports(limit)
    }

    pub fn generate_summary(&self) -> ReportSummary {
        self.reports.generate_summary()
    }

    /// Prepare, dispatch, then always clean up.
    async fn run_isolated(
        &self,
        engine: EngineType,
        format: CaseFormat,
        source: CaseSource<'_>,
        context: &ExecutionContext,
    ) -> ExecutionResult {
        self.announce(
            RunPhase::Prepare,
            t!("runner.preparing", engine = engine, kind = source.kind()),
        );
        // A workspace that fails half-way is removed when it is dropped here.
        let workspace = match prepare_workspace(engine, &source, context) {
            Ok(workspace) => workspace,
            Err(e) => {
                eprintln!("{}", t!("runner.prepare_failed", error = format!("{:#}", e)).red());
                return ExecutionResult::failure(
                    FailureReason::Preparation,
                    "failed to prepare test workspace",
                    format!("{:#}", e),
                )
                .with_engine(engine);
            }
        };

        let result = self.dispatch(engine, format, workspace.path(), context).await;

        let path = workspace.path().to_path_buf();
        match workspace.close() {
            Ok(()) => self.announce(RunPhase::Cleanup, t!("runner.cleaned", path = path.display())),
            Err(e) => eprintln!(
                "{}",
                t!("runner.cleanup_failed", path = path.display(), error = e).yellow()
            ),
        }
        result
    }

    /// Dispatch, collect and parse for a prepared case directory.
    async fn dispatch(
        &self,
        engine: EngineType,
        format: CaseFormat,
        cases_dir: &Path,
        context: &ExecutionContext,
    ) -> ExecutionResult {
        let invocation = DispatchInvocation {
            engine,
            format,
            cases_dir: cases_dir.to_path_buf(),
            flags: context.engine_flags(engine),
        };
        self.announce(
            RunPhase::Dispatch,
            t!("runner.dispatching", args = invocation.arguments().join(" ")),
        );

        let started = Instant::now();
        let output = match tokio::time::timeout(self.timeout, self.dispatcher.execute(&invocation)).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                eprintln!("{}", t!("runner.launch_failed", error = format!("{:#}", e)).red());
                let mut result = ExecutionResult::failure(
                    FailureReason::Launch,
                    format!("test execution raised an error: {:#}", e),
                    format!("{:#}", e),
                )
                .with_engine(engine);
                result.duration_seconds = round_secs(started.elapsed());
                return result;
            }
            Err(_) => {
                println!(
                    "{}",
                    t!("runner.timeout", engine = engine, timeout = self.timeout.as_secs()).red()
                );
                return ExecutionResult::timeout(engine, self.timeout);
            }
        };

        let success = output.succeeded();
        let code = output
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string());
        self.announce(
            RunPhase::Collect,
            t!("runner.collected", code = code, elapsed = format!("{:.2}", output.elapsed.as_secs_f64())),
        );

        let statistics: Statistics = parse_statistics(&output.stdout);
        self.announce(
            RunPhase::Parse,
            t!(
                "runner.parsed",
                passed = statistics.passed,
                failed = statistics.failed,
                skipped = statistics.skipped
            ),
        );

        ExecutionResult {
            success,
            message: if success {
                "test execution completed".to_string()
            } else {
                format!("test execution failed (exit code {})", code)
            },
            duration_seconds: round_secs(started.elapsed()),
            engine_type: Some(engine),
            return_code: output.exit_code,
            statistics,
            report: self.reports.find_latest(),
            output: Some(OutputTail {
                stdout: tail(&output.stdout, self.stdout_tail),
                stderr: tail(&output.stderr, self.stderr_tail),
            }),
            failure_reason: (!success).then_some(FailureReason::TestsFailed),
            error: None,
            case_file: None,
            cases_dir: None,
            case_count: None,
            total_cases: None,
        }
    }

    fn announce(&self, phase: RunPhase, message: impl Display) {
        if self.quiet {
            return;
        }
        let tag = format!("[{}]", phase.label());
        let tag = match phase {
            RunPhase::Prepare | RunPhase::Dispatch => tag.blue(),
            RunPhase::Collect | RunPhase::Parse => tag.cyan(),
            RunPhase::Cleanup => tag.dimmed(),
        };
        println!("{} {}", tag.bold(), message);
    }
}

fn prepare_workspace(
    engine: EngineType,
    source: &CaseSource<'_>,
    context: &ExecutionContext,
) -> Result<RunWorkspace> {
    let workspace = RunWorkspace::create(engine, source.kind())?;
    workspace.write_context(engine, context)?;
    match source {
        CaseSource::Single(case) => {
            workspace.write_case(SINGLE_CASE_FILE, case)?;
        }
        CaseSource::Batch(cases) => {
            for (position, case) in cases.iter().enumerate() {
                workspace.write_case(&batch_case_file(position), case)?;
            }
        }
        CaseSource::File(path) => {
            workspace.copy_case(path)?;
        }
    }
    Ok(workspace)
}

/// Engine of a case directory: its `context.yaml` marker, else a guess from its name.
/// 用例目录的引擎：优先读取 `context.yaml` 标记，否则根据目录名推断。
pub fn detect_engine_type(dir: &Path) -> EngineType {
    if let Some(engine) = read_engine_marker(dir) {
        return engine;
    }
    let name = match dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => dir
            .canonicalize()
            .ok()
            .and_then(|full| full.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_default(),
    };
    EngineType::from_dir_name(&name)
}

/// Number of case files directly inside `dir` for `format`.
///
/// Declarative: `*.yaml` / `*.yml` except `context.yaml`.
/// Script: `test_*.py` and `locustfile_*.py`.
pub fn count_case_files(dir: &Path, format: CaseFormat) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            match format {
                CaseFormat::Declarative => {
                    (name.ends_with(".yaml") || name.ends_with(".yml")) && name != CONTEXT_FILE
                }
                CaseFormat::Script => {
                    name.ends_with(".py") && (name.starts_with("test_") || name.starts_with("locustfile_"))
                }
            }
        })
        .count()
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
