// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use testengine::config::EngineConfig;
use testengine::runner::{DispatchInvocation, DispatchOutput, Dispatcher};

/// What the fake dispatcher saw during one call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub invocation: DispatchInvocation,
    /// Sorted file names present in the cases directory during the call.
    pub files: Vec<String>,
    /// Contents of `context.yaml`, if the directory had one.
    pub context: Option<String>,
}

/// A dispatcher that never spawns anything.
pub struct FakeDispatcher {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    delay: Option<Duration>,
    fail_launch: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeDispatcher {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
            delay: None,
            fail_launch: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            ..Self::succeeding("")
        }
    }

    /// A dispatcher whose process cannot be started.
    pub fn unlaunchable() -> Self {
        Self {
            fail_launch: true,
            ..Self::succeeding("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for FakeDispatcher {
    async fn execute(&self, invocation: &DispatchInvocation) -> Result<DispatchOutput> {
        let mut files: Vec<String> = fs::read_dir(&invocation.cases_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        let context = fs::read_to_string(invocation.cases_dir.join("context.yaml")).ok();

        self.calls.lock().unwrap().push(RecordedCall {
            invocation: invocation.clone(),
            files,
            context,
        });

        if self.fail_launch {
            bail!("program not found");
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(DispatchOutput {
            exit_code: self.exit_code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            elapsed: Duration::from_millis(5),
        })
    }
}

/// A temporary directory holding `cases/` and `reports/`.
pub fn setup_test_environment() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    fs::create_dir_all(temp_dir.path().join("cases")).expect("Failed to create cases directory");
    fs::create_dir_all(temp_dir.path().join("reports")).expect("Failed to create reports directory");
    temp_dir
}

/// A quiet configuration rooted in `root`.
pub fn test_config(root: &Path) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.quiet = true;
    config.paths.cases_root = root.join("cases");
    config.paths.reports_dir = root.join("reports");
    config.paths.workspace_root = root.to_path_buf();
    config.dispatcher.working_dir = root.to_path_buf();
    config
}

/// Writes a configuration file pointing into `temp_dir` and returns its path.
pub fn write_config_file(temp_dir: &TempDir) -> PathBuf {
    let config = test_config(temp_dir.path());
    let path = temp_dir.path().join("TestEngine.toml");
    fs::write(&path, config.to_toml_string().unwrap()).unwrap();
    path
}

/// Writes a report file and returns its path.
pub fn write_report(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Serves every connection with the same HTTP response.
/// Returns the base URL, e.g. `http://127.0.0.1:41234`.
pub async fn spawn_http_server(status: u16, content_type: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {} Status\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let response = response.clone();
            tokio::spawn(async move {
                let mut buffer = vec![0u8; 8192];
                let mut request = Vec::new();
                // Read until the end of the headers; test requests carry small bodies.
                while let Ok(read) = socket.read(&mut buffer).await {
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&buffer[..read]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", address)
}
