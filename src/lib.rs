//! # TestEngine Library / TestEngine 库
//!
//! This library turns structured test descriptions into runnable test assets
//! for four engines (API, web, mobile and load testing), hands those assets to
//! an external test framework, and reads back results and reports.
//!
//! 此库将结构化的测试描述转换为四种引擎（API、Web、移动端和性能测试）可运行的测试资产，
//! 将这些资产交给外部测试框架执行，并读取结果和报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, request vocabularies, configuration and errors
//! - `generator` - Declarative and script generators plus the generation façade
//! - `runner` - Execution orchestration, result parsing and quick API tests
//! - `reporting` - Report discovery, summaries, console and HTML output
//! - `infra` - Child-process capture and file system helpers
//! - `cli` / `commands` - Command-line interface
//!
//! - `core` - 数据模型、请求词汇表、配置和错误
//! - `generator` - 声明式与脚本生成器以及生成门面
//! - `runner` - 执行编排、结果解析和快速 API 测试
//! - `reporting` - 报告发现、摘要、控制台和 HTML 输出
//! - `infra` - 子进程输出捕获和文件系统工具
//! - `cli` / `commands` - 命令行接口

pub mod cli;
pub mod commands;
pub mod core;
pub mod generator;
pub mod infra;
pub mod reporting;
pub mod runner;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use generator::CaseGeneratorService;
pub use runner::TestRunnerService;
pub use infra::t;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the language
/// code (e.g., "en"), and finally falls back to the default language ("en").
///
/// 根据系统区域设置初始化应用程序的国际化（i18n）。
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    set_language(&locale);
}

/// Switches the output language, falling back to "en" for unknown locales.
/// 切换输出语言，未知区域设置回退到 "en"。
pub fn set_language(locale: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
