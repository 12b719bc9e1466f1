//! # Commands Module / 命令模块
//!
//! One module per CLI subcommand. Each `execute` prints a coloured summary,
//! then the structured result as pretty JSON, and reports whether the
//! outcome counts as a success for the exit code.
//!
//! 每个 CLI 子命令一个模块。每个 `execute` 先打印彩色摘要，再以格式化 JSON
//! 输出结构化结果，并返回结果是否成功以决定退出码。

pub mod generate;
pub mod init;
pub mod quick;
pub mod report;
pub mod run;

use anyhow::{Context, Result};
use serde::Serialize;

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
