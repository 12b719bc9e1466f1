//! # Base Generator Module / 基础生成器模块
//!
//! Shared plumbing of all eight generators: where an asset goes, how it is
//! written, and how the result envelope is built.
//!
//! 八个生成器共享的基础部分：资产存放位置、写入方式以及结果封装的构建。

use colored::*;
use std::path::{Path, PathBuf};

use crate::core::error::{GenerationError, GenerationResult};
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset, UnrecognizedOperation};
use crate::generator::naming::{sanitize, snake_identifier, timestamp};
use crate::infra::fs::write_atomic;
use crate::infra::t;

/// Path derivation, persistence and result wrapping for one (engine, format) pair.
/// 针对一个（引擎，格式）组合的路径派生、持久化和结果封装。
#[derive(Debug, Clone)]
pub struct BaseGenerator {
    cases_root: PathBuf,
    engine: EngineType,
    format: CaseFormat,
    quiet: bool,
}

impl BaseGenerator {
    pub fn new(cases_root: impl Into<PathBuf>, engine: EngineType, format: CaseFormat) -> Self {
        Self {
            cases_root: cases_root.into(),
            engine,
            format,
            quiet: false,
        }
    }

    /// Turns console progress lines off.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn engine(&self) -> EngineType {
        self.engine
    }

    pub fn format(&self) -> CaseFormat {
        self.format
    }

    /// The per-engine, per-format case directory, e.g. `cases/web-cases_pytest`.
    pub fn subdir(&self) -> PathBuf {
        self.cases_root.join(self.engine.cases_dir_name(self.format))
    }

    /// Chooses where an asset is written.
    ///
    /// An explicit `hint` is used verbatim. Otherwise the file lands in
    /// [`subdir`](Self::subdir) under a name made of a microsecond timestamp and
    /// the sanitized case name; if that file already exists a counter suffix is
    /// added, so repeated generation never overwrites an earlier asset.
    ///
    /// 选择资产的写入位置。显式的 `hint` 原样使用；否则文件位于子目录下，
    /// 文件名由微秒级时间戳和清理后的用例名组成；若文件已存在则追加计数后缀，
    /// 因此重复生成不会覆盖先前的资产。
    pub fn derive_path(&self, hint: Option<&Path>, name: &str) -> PathBuf {
        if let Some(hint) = hint {
            return hint.to_path_buf();
        }

        let dir = self.subdir();
        let stamp = timestamp();
        let file_name = |suffix: &str| match (self.format, self.engine) {
            (CaseFormat::Declarative, _) => {
                format!("{}_{}{}.yaml", stamp, sanitize(name), suffix)
            }
            (CaseFormat::Script, EngineType::Perf) => {
                format!("locustfile_{}_{}{}.py", stamp, snake_identifier(name), suffix)
            }
            (CaseFormat::Script, _) => {
                format!("test_{}_{}{}.py", stamp, snake_identifier(name), suffix)
            }
        };

        let mut path = dir.join(file_name(""));
        let mut counter = 1;
        while path.exists() {
            path = dir.join(file_name(&format!("_{}", counter)));
            counter += 1;
        }
        path
    }

    /// Writes the asset, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns [`GenerationError::Persist`] when the file cannot be written.
    pub fn persist(&self, path: &Path, content: &str) -> GenerationResult<()> {
        write_atomic(path, content).map_err(|source| GenerationError::Persist {
            path: path.to_path_buf(),
            source,
        })?;

        if !self.quiet {
            println!(
                "{} {}",
                "✔".green(),
                t!(
                    "asset_saved",
                    engine = self.engine.as_str(),
                    format = self.format.as_str(),
                    path = path.display()
                )
            );
        }
        Ok(())
    }

    /// Prints one warning line per skipped operation.
    pub fn warn_skipped(&self, skipped: &[UnrecognizedOperation]) {
        if self.quiet {
            return;
        }
        for operation in skipped {
            println!(
                "{} {}",
                "⚠".yellow(),
                t!(
                    "operation_skipped",
                    kind = operation.kind,
                    index = operation.index,
                    type_name = operation.type_name
                )
                .yellow()
            );
        }
    }

    /// Builds the success envelope.
    pub fn wrap_result(
        &self,
        content: String,
        save_path: PathBuf,
        skipped: Vec<UnrecognizedOperation>,
    ) -> GeneratedAsset {
        let message = if skipped.is_empty() {
            format!("{} {} case generated", self.engine, self.format)
        } else {
            format!(
                "{} {} case generated, {} unrecognized operation(s) skipped",
                self.engine,
                self.format,
                skipped.len()
            )
        };

        GeneratedAsset {
            success: true,
            message,
            content,
            save_path,
            engine_type: self.engine,
            format: self.format,
            run_command: None,
            skipped,
        }
    }

    /// Derives the path, writes the content and wraps the result in one go.
    pub fn emit(
        &self,
        hint: Option<&Path>,
        name: &str,
        content: String,
        skipped: Vec<UnrecognizedOperation>,
    ) -> GenerationResult<GeneratedAsset> {
        let path = self.derive_path(hint, name);
        self.persist(&path, &content)?;
        self.warn_skipped(&skipped);
        Ok(self.wrap_result(content, path, skipped))
    }
}
