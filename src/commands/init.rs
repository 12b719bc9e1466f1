//! # Configuration Initialization Module / 配置初始化模块
//!
//! This module provides an interactive command-line wizard that writes a
//! `TestEngine.toml` file: where generated cases go, where reports are read
//! from and how the external test dispatcher is launched.
//!
//! 此模块提供交互式命令行向导，用于写入 `TestEngine.toml` 文件：
//! 生成的用例存放位置、报告读取位置以及外部测试调度器的启动方式。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Step-by-step prompts with sensible defaults
//! - **Overwrite Protection**: Confirmation prompt before replacing an existing file
//! - **Non-interactive Mode**: Writes the defaults directly, for scripts and CI
//!
//! - **交互式向导**: 带合理默认值的逐步提示
//! - **覆盖保护**: 替换现有文件前进行确认
//! - **非交互模式**: 直接写入默认配置，适用于脚本和 CI

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::{Path, PathBuf};

use crate::core::config::EngineConfig;
use crate::infra::fs::write_atomic;
use crate::t;

/// Languages offered by the wizard, in display order.
const LANGUAGES: [&str; 2] = ["en", "zh-CN"];

/// Comment block placed above the generated TOML.
const CONFIG_HEADER: &str = "\
# TestEngine configuration.
# Every key is optional; removing one falls back to its default.
#
# [paths]       cases_root / reports_dir / workspace_root
# [dispatcher]  command line, working directory, timeout_secs and env of the external test runner
# [output]      how many characters of stdout / stderr are kept in results
# [reports]     report discovery: preferred file name, extensions, preview size, search depth
# [quick_test]  HTTP timeout and body preview size of `testengine quick`

";

/// Runs the interactive wizard to generate a `TestEngine.toml` file.
///
/// 运行交互式向导以生成 `TestEngine.toml` 文件。
pub fn run_init_wizard(config_path: &Path, language: &str, non_interactive: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if non_interactive {
        let config = EngineConfig {
            language: language.to_string(),
            ..EngineConfig::default()
        };
        return write_config(config_path, &config, language);
    }

    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
    println!("{}", t!("init_wizard_description", locale = language));

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!(
                "init_overwrite_prompt",
                locale = language,
                path = config_path.display()
            ))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let mut config = EngineConfig::default();

    let default_language = LANGUAGES.iter().position(|l| *l == language).unwrap_or(0);
    let selected = Select::with_theme(&theme)
        .with_prompt(t!("init_language_prompt", locale = language))
        .items(&LANGUAGES)
        .default(default_language)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    config.language = LANGUAGES[selected].to_string();

    config.paths.cases_root = prompt_path(
        &theme,
        t!("init_cases_root_prompt", locale = language).to_string(),
        &config.paths.cases_root,
    )?;
    config.paths.reports_dir = prompt_path(
        &theme,
        t!("init_reports_dir_prompt", locale = language).to_string(),
        &config.paths.reports_dir,
    )?;

    config.dispatcher.command = Input::with_theme(&theme)
        .with_prompt(t!("init_dispatcher_prompt", locale = language))
        .default(config.dispatcher.command.clone())
        .interact_text()?;
    if shlex::split(&config.dispatcher.command).is_none_or(|parts| parts.is_empty()) {
        println!("{}", t!("init_dispatcher_invalid", locale = language).yellow());
        config.dispatcher.command = EngineConfig::default().dispatcher.command;
    }

    config.dispatcher.timeout_secs = Input::with_theme(&theme)
        .with_prompt(t!("init_timeout_prompt", locale = language))
        .default(config.dispatcher.timeout_secs)
        .interact_text()?;

    write_config(config_path, &config, language)
}

fn prompt_path(theme: &ColorfulTheme, prompt: String, default: &Path) -> Result<PathBuf> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(value))
}

fn write_config(path: &Path, config: &EngineConfig, language: &str) -> Result<()> {
    let toml_string = config
        .to_toml_string()
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    write_atomic(path, &format!("{}{}", CONFIG_HEADER, toml_string))
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}
