//! # Command Execution Module / 命令执行模块
//!
//! Spawns the external test framework and captures its standard output and
//! standard error as two separate streams.
//!
//! 派生外部测试框架进程，并分别捕获其标准输出和标准错误。

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// The text captured from a finished child process.
/// 从已结束子进程捕获的文本。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Everything written to stdout / 写入 stdout 的全部内容
    pub stdout: String,
    /// Everything written to stderr / 写入 stderr 的全部内容
    pub stderr: String,
}

/// Spawns a command and captures its stdout and stderr.
/// Both streams are read concurrently so a chatty child cannot block on a full pipe.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured stdout and stderr.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 两个流被并发读取，避免子进程因管道写满而阻塞。
///
/// # Returns
/// 一个元组，包含：
/// - 进程的 `ExitStatus`（包装在 `io::Result` 中）。
/// - 捕获的 stdout 和 stderr。
pub async fn spawn_and_capture(mut cmd: Command) -> (std::io::Result<ExitStatus>, CapturedOutput) {
    // 配置命令以捕获 stdout 和 stderr。
    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), CapturedOutput::default()),
    };

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return (
            Err(std::io::Error::other("failed to capture child process output")),
            CapturedOutput::default(),
        );
    };

    let stdout_buf = Arc::new(tokio::sync::Mutex::new(String::new()));
    let stderr_buf = Arc::new(tokio::sync::Mutex::new(String::new()));

    // 派生任务逐行读取 stdout 和 stderr。
    let stdout_handle = tokio::spawn(drain_lines(stdout, Arc::clone(&stdout_buf)));
    let stderr_handle = tokio::spawn(drain_lines(stderr, Arc::clone(&stderr_buf)));

    let status = child.wait().await;

    // Wait for the reader tasks so that all output is captured.
    // 等待读取任务完成，以确保所有输出都被捕获。
    if let Err(e) = stdout_handle.await {
        eprintln!("Failed to join stdout task: {}", e);
    }
    if let Err(e) = stderr_handle.await {
        eprintln!("Failed to join stderr task: {}", e);
    }

    let captured = CapturedOutput {
        stdout: stdout_buf.lock().await.clone(),
        stderr: stderr_buf.lock().await.clone(),
    };
    (status, captured)
}

/// Reads `stream` line by line until EOF, appending each line to `sink`.
/// Bytes that are not valid UTF-8 are replaced rather than ending the read,
/// so the child never writes into a closed pipe.
///
/// 逐行读取 `stream` 直到 EOF 并追加到 `sink`。非 UTF-8 字节会被替换而不是中止读取，
/// 因此子进程不会写入已关闭的管道。
async fn drain_lines<R>(stream: R, sink: Arc<tokio::sync::Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(stream).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(bytes)) => {
                let line = String::from_utf8_lossy(&bytes);
                let mut output = sink.lock().await;
                output.push_str(line.trim_end_matches('\r'));
                output.push('\n');
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Failed to read child output: {}", e);
                break;
            }
        }
    }
}

/// Keeps the last `max_chars` characters of `text`.
/// 保留 `text` 的最后 `max_chars` 个字符。
pub fn tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}

/// Keeps the first `max_chars` characters of `text`.
pub fn head(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

