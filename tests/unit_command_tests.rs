//! # Command Module Unit Tests / 命令模块单元测试
//!
//! This module contains unit tests for process spawning and output capture
//! in `infra::command`, and for the command line built by `ProcessDispatcher`.
//!
//! 此模块包含 `infra::command` 中进程启动与输出捕获的单元测试，
//! 以及 `ProcessDispatcher` 构建命令行的测试。

use std::path::PathBuf;
use tempfile::tempdir;
use testengine::infra::command::{head, spawn_and_capture, tail};
use testengine::models::{CaseFormat, EngineType};
use testengine::runner::{DispatchInvocation, Dispatcher, ProcessDispatcher};
use tokio::process::Command;

fn invocation(cases_dir: PathBuf, flags: &[&str]) -> DispatchInvocation {
    DispatchInvocation {
        engine: EngineType::Web,
        format: CaseFormat::Declarative,
        cases_dir,
        flags: flags.iter().map(|f| f.to_string()).collect(),
    }
}

#[cfg(test)]
mod truncation_tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_characters() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("abc", 10), "abc");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn test_head_and_tail_respect_char_boundaries() {
        // 多字节字符不能被截断
        let text = "测试用例执行完成";
        assert_eq!(head(text, 2), "测试");
        assert_eq!(tail(text, 2), "完成");
        assert_eq!(head("héllo", 2), "hé");
    }
}

#[cfg(test)]
mod spawn_and_capture_tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_and_capture_separates_streams() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");

        let (status, output) = spawn_and_capture(cmd).await;

        let status = status.unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_and_capture_survives_invalid_utf8() {
        // 非 UTF-8 字节之后的大量输出仍需完整读取
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("printf '\\377\\n'; head -c 200000 /dev/zero | tr '\\0' a; echo; echo '5 passed'");

        let (status, output) = spawn_and_capture(cmd).await;

        let status = status.unwrap();
        assert_eq!(status.code(), Some(0));
        assert!(output.stdout.starts_with('\u{FFFD}'));
        assert!(output.stdout.len() > 200_000);
        assert!(output.stdout.ends_with("5 passed\n"));
    }

    #[tokio::test]
    async fn test_spawn_and_capture_nonexistent_command() {
        let cmd = Command::new("this_command_does_not_exist_12345");

        let (status, output) = spawn_and_capture(cmd).await;

        assert!(status.is_err());
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }
}

#[cfg(test)]
mod process_dispatcher_tests {
    use super::*;

    #[test]
    fn test_command_line_order() {
        let temp = tempdir().unwrap();
        let dispatcher = ProcessDispatcher::from_command_line("python -m testrun.cli", temp.path()).unwrap();
        assert_eq!(dispatcher.program(), "python");

        let cases = temp.path().join("cases");
        let line = dispatcher.command_line(&invocation(cases.clone(), &["--browser=firefox"]));
        assert_eq!(
            line,
            vec![
                "python".to_string(),
                "-m".to_string(),
                "testrun.cli".to_string(),
                "--engine-type=web".to_string(),
                "--type=declarative".to_string(),
                format!("--cases={}", cases.display()),
                "--browser=firefox".to_string(),
            ]
        );
    }

    #[test]
    fn test_quoted_arguments_stay_whole() {
        let temp = tempdir().unwrap();
        let dispatcher =
            ProcessDispatcher::from_command_line("runner --label 'smoke suite'", temp.path()).unwrap();
        let line = dispatcher.command_line(&invocation(temp.path().to_path_buf(), &[]));
        assert_eq!(line[1], "--label");
        assert_eq!(line[2], "smoke suite");
    }

    #[test]
    fn test_invalid_command_lines_are_rejected() {
        let temp = tempdir().unwrap();
        assert!(ProcessDispatcher::from_command_line("", temp.path()).is_err());
        assert!(ProcessDispatcher::from_command_line("   ", temp.path()).is_err());
        assert!(ProcessDispatcher::from_command_line("python 'unbalanced", temp.path()).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_passes_arguments_to_program() {
        let temp = tempdir().unwrap();
        let dispatcher = ProcessDispatcher::from_command_line("echo dispatch", temp.path()).unwrap();

        let output = dispatcher
            .execute(&invocation(temp.path().join("cases"), &["--headless=true"]))
            .await
            .unwrap();

        assert!(output.succeeded());
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.starts_with("dispatch --engine-type=web --type=declarative --cases="));
        assert!(output.stdout.trim_end().ends_with("--headless=true"));
    }

    #[tokio::test]
    async fn test_execute_missing_program_is_an_error() {
        let temp = tempdir().unwrap();
        let dispatcher =
            ProcessDispatcher::from_command_line("this_command_does_not_exist_12345", temp.path()).unwrap();

        let result = dispatcher.execute(&invocation(temp.path().to_path_buf(), &[])).await;
        let error = result.unwrap_err();
        assert!(format!("{:#}", error).contains("Failed to launch dispatcher"));
    }
}
