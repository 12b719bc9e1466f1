//! # Dispatcher Port / 调度器端口
//!
//! The external test framework sits behind the [`Dispatcher`] trait so the
//! runner can be driven by a fake in tests. [`ProcessDispatcher`] is the real
//! adapter: it spawns the configured command as a child process.
//!
//! 外部测试框架位于 [`Dispatcher`] trait 之后，测试中可用假实现驱动运行器。
//! [`ProcessDispatcher`] 是真实适配器：它将配置的命令作为子进程启动。

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::config::DispatcherConfig;
use crate::core::models::{CaseFormat, EngineType};
use crate::infra::command::spawn_and_capture;

/// Everything the dispatcher is told about one run.
/// 一次运行中传给调度器的全部信息。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchInvocation {
    pub engine: EngineType,
    pub format: CaseFormat,
    pub cases_dir: PathBuf,
    /// Engine-specific flags such as `--browser=firefox`.
    pub flags: Vec<String>,
}

impl DispatchInvocation {
    /// Command-line arguments in dispatcher order.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = vec![
            format!("--engine-type={}", self.engine),
            format!("--type={}", self.format),
            format!("--cases={}", self.cases_dir.display()),
        ];
        args.extend(self.flags.iter().cloned());
        args
    }
}

/// What came back from one dispatcher run.
/// 一次调度器运行的返回内容。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl DispatchOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs prepared cases with the external test framework.
///
/// An `Err` means the framework could not be run at all; a run that executed
/// and reported failures is an `Ok` with a non-zero exit code.
///
/// 使用外部测试框架运行已准备好的用例。`Err` 表示框架根本无法运行；
/// 已执行但报告失败的运行返回带非零退出码的 `Ok`。
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn execute(&self, invocation: &DispatchInvocation) -> Result<DispatchOutput>;
}

/// Spawns the configured dispatcher command as a child process.
/// 将配置的调度器命令作为子进程启动。
#[derive(Debug, Clone)]
pub struct ProcessDispatcher {
    program: String,
    base_args: Vec<String>,
    working_dir: PathBuf,
    env: BTreeMap<String, String>,
}

impl ProcessDispatcher {
    /// Parses a command line such as `python -m testrun.cli`.
    /// `~` and environment variables are expanded before splitting.
    ///
    /// # Errors
    /// Fails on unbalanced quotes, undefined variables or an empty command.
    pub fn from_command_line(command_line: &str, working_dir: &Path) -> Result<Self> {
        let expanded = shellexpand::full(command_line)
            .with_context(|| format!("Failed to expand dispatcher command: {}", command_line))?;
        let mut parts = shlex::split(&expanded)
            .with_context(|| format!("Failed to parse dispatcher command: {}", command_line))?
            .into_iter();
        let program = parts
            .next()
            .with_context(|| "Dispatcher command is empty".to_string())?;

        Ok(Self {
            program,
            base_args: parts.collect(),
            working_dir: working_dir.to_path_buf(),
            env: BTreeMap::new(),
        })
    }

    pub fn from_config(config: &DispatcherConfig) -> Result<Self> {
        let mut dispatcher = Self::from_command_line(&config.command, &config.working_dir)?;
        dispatcher.env = config.env.clone();
        Ok(dispatcher)
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full command line for `invocation`, program first.
    pub fn command_line(&self, invocation: &DispatchInvocation) -> Vec<String> {
        let mut line = Vec::with_capacity(self.base_args.len() + 4);
        line.push(self.program.clone());
        line.extend(self.base_args.iter().cloned());
        line.extend(invocation.arguments());
        line
    }
}

#[async_trait]
impl Dispatcher for ProcessDispatcher {
    async fn execute(&self, invocation: &DispatchInvocation) -> Result<DispatchOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .args(invocation.arguments())
            .current_dir(&self.working_dir)
            .kill_on_drop(true);
        // The dispatcher package lives in the working directory unless told otherwise.
        if !self.env.contains_key("PYTHONPATH") {
            cmd.env("PYTHONPATH", &self.working_dir);
        }
        cmd.envs(&self.env);

        let started = Instant::now();
        let (status, captured) = spawn_and_capture(cmd).await;
        let status = status.with_context(|| format!("Failed to launch dispatcher `{}`", self.program))?;

        Ok(DispatchOutput {
            exit_code: status.code(),
            stdout: captured.stdout,
            stderr: captured.stderr,
            elapsed: started.elapsed(),
        })
    }
}
