mod common;

use assert_cmd::prelude::*;
use common::{setup_test_environment, test_config, write_config_file};
use predicates::prelude::*;
use std::fs;
use std::process::Command;

/// This test checks that `--help` lists the subcommands and exits successfully.
///
/// 这个测试检查 `--help` 列出子命令并成功退出。
#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang").arg("en").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("report"));
}

/// This test generates a declarative API case from a parameters file.
/// It asserts that the command succeeds and that exactly one YAML file lands
/// in the engine's case directory.
///
/// 这个测试根据参数文件生成声明式接口用例。
/// 它断言命令成功，并且引擎的用例目录中恰好生成一个 YAML 文件。
#[test]
fn test_generate_declarative_api_case() {
    let temp = setup_test_environment();
    let config_path = write_config_file(&temp);
    let params = temp.path().join("params.yaml");
    fs::write(
        &params,
        "name: Login\nurl: https://api.example.com/login\nmethod: POST\njson:\n  user: ada\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(&config_path)
        .arg("generate")
        .arg("-e")
        .arg("api")
        .arg("-f")
        .arg("declarative")
        .arg("-p")
        .arg(&params);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"));

    let generated: Vec<_> = fs::read_dir(temp.path().join("cases").join("api-cases_yaml"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(generated.len(), 1);
    let content = fs::read_to_string(&generated[0]).unwrap();
    assert!(content.contains("send_request"));
}

/// This test checks that invalid generation parameters fail the command.
///
/// 这个测试检查无效的生成参数会导致命令失败。
#[test]
fn test_generate_without_url_fails() {
    let temp = setup_test_environment();
    let config_path = write_config_file(&temp);
    let params = temp.path().join("params.yaml");
    fs::write(&params, "name: Login\n").unwrap();

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(&config_path)
        .arg("generate")
        .arg("-e")
        .arg("api")
        .arg("-p")
        .arg(&params);

    cmd.assert().failure();
}

/// This test runs `init --non-interactive` in an empty directory.
/// It asserts that a loadable `TestEngine.toml` is written.
///
/// 这个测试在空目录中运行 `init --non-interactive`。
/// 它断言写出了可加载的 `TestEngine.toml`。
#[test]
fn test_init_non_interactive_writes_config() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.current_dir(temp.path())
        .arg("--lang")
        .arg("en")
        .arg("init")
        .arg("--non-interactive");

    cmd.assert().success();

    let path = temp.path().join("TestEngine.toml");
    assert!(path.exists());
    let config = testengine::config::EngineConfig::load(&path).unwrap();
    assert_eq!(config.language, "en");
}

/// This test asks for a summary while the reports directory is empty.
/// It asserts that the command fails and says that no report was found.
///
/// 这个测试在报告目录为空时请求摘要。
/// 它断言命令失败，并提示没有找到报告。
#[test]
fn test_report_summary_without_reports_fails() {
    let temp = setup_test_environment();
    let config_path = write_config_file(&temp);

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(&config_path)
        .arg("report")
        .arg("summary");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("no report found"));
}

/// This test runs a single case through a dispatcher that only echoes.
/// The echoed `3 passed` is parsed back as statistics, so the run succeeds.
///
/// 这个测试通过只会回显的调度器运行单个用例。
/// 回显的 `3 passed` 被解析为统计信息，因此运行成功。
#[cfg(unix)]
#[test]
fn test_run_case_with_echo_dispatcher() {
    let temp = setup_test_environment();
    let mut config = test_config(temp.path());
    config.dispatcher.command = "echo 3 passed".to_string();
    let config_path = temp.path().join("TestEngine.toml");
    fs::write(&config_path, config.to_toml_string().unwrap()).unwrap();
    let case = temp.path().join("ping.yaml");
    fs::write(
        &case,
        "desc: ping\nsteps:\n  - send request:\n      关键字: send_request\n      url: https://api.example.com/ping\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("case")
        .arg("-e")
        .arg("api")
        .arg(&case);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"passed\": 3"));
}

/// This test passes a reserved key through `--var`.
/// It asserts that the run is refused before the dispatcher is launched.
///
/// 这个测试通过 `--var` 传入保留键。
/// 它断言运行在启动调度器之前被拒绝。
#[test]
fn test_run_rejects_reserved_var() {
    let temp = setup_test_environment();
    let config_path = write_config_file(&temp);
    let case = temp.path().join("ping.yaml");
    fs::write(&case, "desc: ping\nsteps: []\n").unwrap();

    let mut cmd = Command::cargo_bin("testengine").unwrap();
    cmd.arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("case")
        .arg("-e")
        .arg("api")
        .arg("--var")
        .arg("ENGINE_TYPE=web")
        .arg(&case);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("reserved context key"));
}
