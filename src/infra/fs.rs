//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as creating temporary run directories, writing generated assets
//! in one step and copying case files.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如创建临时运行目录、一次性写入生成的资产以及复制用例文件。

use anyhow::{Context, Result};
use fs_extra::file::{copy, CopyOptions};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// Creates a unique, temporary directory for one execution.
///
/// # Arguments
/// * `label` - Used as the directory prefix, e.g. `api_test`
///
/// # Returns
/// The directory path and the `TempDir` guard that removes it on drop.
///
/// 为一次执行创建唯一的临时目录。
pub fn create_run_dir(label: &str) -> Result<(PathBuf, TempDir)> {
    let sanitized_label = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();

    let temp_dir = tempfile::Builder::new()
        .prefix(&format!("testengine_{}_", sanitized_label))
        .tempdir()
        .with_context(|| "Failed to create temporary run directory".to_string())?;

    let path = temp_dir.path().to_path_buf();
    Ok((path, temp_dir))
}

/// Writes `content` to `path` in a single step.
///
/// The content goes to a temporary sibling first and is then renamed over the
/// target, so readers never observe a half-written asset. Parent directories
/// are created as needed.
///
/// 将 `content` 一次性写入 `path`。内容先写入同目录下的临时文件，再重命名为目标文件。
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut staged = NamedTempFile::new_in(&parent)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copies a single file into `dir`, keeping its file name.
///
/// # Returns
/// The path of the copy.
pub fn copy_file_into(from: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = from
        .file_name()
        .with_context(|| format!("Not a file path: {}", from.display()))?;
    let target = dir.join(file_name);

    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy(from, &target, &options)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), target.display()))?;
    Ok(target)
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Resolves `path` against `base` unless it is already absolute.
/// 若 `path` 不是绝对路径，则基于 `base` 解析。
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
