//! Run workspace / 运行工作区
//!
//! A temporary case directory owned by exactly one run. It holds one context
//! file and one or more case files, and is removed when the run ends, even if
//! the run failed or panicked.
//!
//! 由单次运行独占的临时用例目录，包含一个上下文文件和一个或多个用例文件。
//! 运行结束时目录会被删除，即使运行失败或发生 panic。

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::core::models::EngineType;
use crate::infra::fs::{copy_file_into, create_run_dir, write_atomic};
use crate::runner::context::{ExecutionContext, CONTEXT_FILE};

/// File name of a single in-memory case.
pub const SINGLE_CASE_FILE: &str = "test_case.yaml";

/// File name of the `position`-th (zero-based) case of a batch: `001_test_case.yaml`, ...
pub fn batch_case_file(position: usize) -> String {
    format!("{:03}_test_case.yaml", position + 1)
}

/// Holds the temporary directory of one run.
/// Dropping it removes the directory.
#[derive(Debug)]
pub struct RunWorkspace {
    path: PathBuf,
    temp_dir: TempDir,
}

impl RunWorkspace {
    /// Creates an empty workspace, e.g. `testengine_web_batch_XXXX`.
    pub fn create(engine: EngineType, kind: &str) -> Result<Self> {
        let (path, temp_dir) = create_run_dir(&format!("{}_{}", engine, kind))?;
        Ok(Self { path, temp_dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `context.yaml` for `engine`.
    pub fn write_context(&self, engine: EngineType, context: &ExecutionContext) -> Result<PathBuf> {
        let target = self.path.join(CONTEXT_FILE);
        let document = context.to_document(engine)?;
        write_atomic(&target, &document)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(target)
    }

    /// Writes an in-memory case as YAML under `file_name`.
    pub fn write_case(&self, file_name: &str, case: &Value) -> Result<PathBuf> {
        let target = self.path.join(file_name);
        let document = serde_yaml::to_string(case).context("Failed to render test case")?;
        write_atomic(&target, &document)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(target)
    }

    /// Copies a case file from disk into the workspace.
    pub fn copy_case(&self, source: &Path) -> Result<PathBuf> {
        copy_file_into(source, &self.path)
    }

    /// Removes the directory now, reporting any error.
    pub fn close(self) -> std::io::Result<()> {
        self.temp_dir.close()
    }
}
