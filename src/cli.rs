// src/cli.rs
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use crate::commands::{
    self,
    generate::{GenerateArgs, ImportArgs},
    quick::QuickArgs,
    report::ReportAction,
    run::{RunArgs, RunTarget},
};
use crate::core::config::{DEFAULT_CONFIG_FILE, EngineConfig};
use crate::core::models::{CaseFormat, EngineType};
use crate::runner::context::{ExecutionContext, is_reserved_key};
use crate::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(lang) = args.iter().find_map(|arg| arg.strip_prefix("--lang=")) {
        return Some(lang.to_string());
    }
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn engine_arg(locale: &str) -> Arg {
    Arg::new("engine")
        .short('e')
        .long("engine")
        .help(t!("arg_engine", locale = locale).to_string())
        .value_name("ENGINE")
        .value_parser(clap::value_parser!(EngineType))
        .action(ArgAction::Set)
}

fn format_arg(locale: &str, default: &'static str) -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .help(t!("arg_format", locale = locale).to_string())
        .value_name("FORMAT")
        .default_value(default)
        .value_parser(clap::value_parser!(CaseFormat))
        .action(ArgAction::Set)
}

fn save_path_arg(locale: &str) -> Arg {
    Arg::new("save-path")
        .long("save-path")
        .help(t!("arg_save_path", locale = locale).to_string())
        .value_name("PATH")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

/// Context flags and `--html`, shared by every `run` target.
fn context_args(command: Command, locale: &str) -> Command {
    command
        .arg(
            Arg::new("browser")
                .long("browser")
                .help(t!("arg_browser", locale = locale).to_string())
                .value_name("BROWSER")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help(t!("arg_headless", locale = locale).to_string())
                .value_name("BOOL")
                .value_parser(clap::value_parser!(bool))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("platform")
                .long("platform")
                .help(t!("arg_platform", locale = locale).to_string())
                .value_name("PLATFORM")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .help(t!("arg_server", locale = locale).to_string())
                .value_name("URL")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("users")
                .long("users")
                .help(t!("arg_users", locale = locale).to_string())
                .value_name("USERS")
                .value_parser(clap::value_parser!(u32))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("spawn-rate")
                .long("spawn-rate")
                .help(t!("arg_spawn_rate", locale = locale).to_string())
                .value_name("RATE")
                .value_parser(clap::value_parser!(f64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("run-time")
                .long("run-time")
                .help(t!("arg_run_time", locale = locale).to_string())
                .value_name("DURATION")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("var")
                .long("var")
                .help(t!("arg_var", locale = locale).to_string())
                .value_name("KEY=VALUE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("arg_html", locale = locale).to_string())
                .value_name("HTML")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

fn build_cli(locale: &str) -> Command {
    Command::new("testengine")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG_FILE)
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("generate")
                .about(t!("cmd_generate_about", locale = locale).to_string())
                .arg(engine_arg(locale).required(true))
                .arg(format_arg(locale, "script"))
                .arg(
                    Arg::new("params")
                        .short('p')
                        .long("params")
                        .help(t!("arg_params", locale = locale).to_string())
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(save_path_arg(locale)),
        )
        .subcommand(
            Command::new("import")
                .about(t!("cmd_import_about", locale = locale).to_string())
                .arg(engine_arg(locale).required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help(t!("arg_import_file", locale = locale).to_string())
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(save_path_arg(locale)),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(context_args(
                    Command::new("file")
                        .about(t!("cmd_run_file_about", locale = locale).to_string())
                        .arg(
                            Arg::new("path")
                                .value_name("PATH")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf)),
                        ),
                    locale,
                ))
                .subcommand(context_args(
                    Command::new("dir")
                        .about(t!("cmd_run_dir_about", locale = locale).to_string())
                        .arg(
                            Arg::new("path")
                                .value_name("DIR")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf)),
                        )
                        .arg(engine_arg(locale))
                        .arg(format_arg(locale, "declarative")),
                    locale,
                ))
                .subcommand(context_args(
                    Command::new("case")
                        .about(t!("cmd_run_case_about", locale = locale).to_string())
                        .arg(engine_arg(locale).required(true))
                        .arg(
                            Arg::new("path")
                                .value_name("CASE")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf)),
                        ),
                    locale,
                ))
                .subcommand(context_args(
                    Command::new("batch")
                        .about(t!("cmd_run_batch_about", locale = locale).to_string())
                        .arg(engine_arg(locale).required(true))
                        .arg(
                            Arg::new("paths")
                                .value_name("CASES")
                                .required(true)
                                .num_args(1..)
                                .value_parser(clap::value_parser!(PathBuf))
                                .action(ArgAction::Append),
                        ),
                    locale,
                )),
        )
        .subcommand(
            Command::new("quick")
                .about(t!("cmd_quick_about", locale = locale).to_string())
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help(t!("arg_url", locale = locale).to_string())
                        .value_name("URL")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("method")
                        .short('X')
                        .long("method")
                        .help(t!("arg_method", locale = locale).to_string())
                        .value_name("METHOD")
                        .default_value("GET")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("header")
                        .short('H')
                        .long("header")
                        .help(t!("arg_header", locale = locale).to_string())
                        .value_name("NAME:VALUE")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("param")
                        .long("param")
                        .help(t!("arg_param", locale = locale).to_string())
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("expect-status")
                        .long("expect-status")
                        .help(t!("arg_expect_status", locale = locale).to_string())
                        .value_name("STATUS")
                        .default_value("200")
                        .value_parser(clap::value_parser!(u16))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("expect-contains")
                        .long("expect-contains")
                        .help(t!("arg_expect_contains", locale = locale).to_string())
                        .value_name("TEXT")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("expect-json")
                        .long("expect-json")
                        .help(t!("arg_expect_json", locale = locale).to_string())
                        .value_name("PATH=JSON")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("max-ms")
                        .long("max-ms")
                        .help(t!("arg_max_ms", locale = locale).to_string())
                        .value_name("MILLISECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("report")
                .about(t!("cmd_report_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(
                    Command::new("show")
                        .about(t!("cmd_report_show_about", locale = locale).to_string())
                        .arg(Arg::new("name").value_name("NAME")),
                )
                .subcommand(
                    Command::new("list")
                        .about(t!("cmd_report_list_about", locale = locale).to_string())
                        .arg(
                            Arg::new("limit")
                                .short('n')
                                .long("limit")
                                .help(t!("arg_limit", locale = locale).to_string())
                                .value_name("LIMIT")
                                .default_value("20")
                                .value_parser(clap::value_parser!(usize))
                                .action(ArgAction::Set),
                        ),
                )
                .subcommand(
                    Command::new("summary").about(t!("cmd_report_summary_about", locale = locale).to_string()),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parses `KEY=VALUE`; the value is read as JSON when it parses, else kept as a string.
fn parse_assignment(raw: &str, separator: char) -> Result<(String, serde_json::Value)> {
    let (key, value) = raw
        .split_once(separator)
        .with_context(|| format!("Expected KEY{}VALUE, got `{}`", separator, raw))?;
    let value = serde_json::from_str(value.trim())
        .unwrap_or_else(|_| serde_json::Value::String(value.trim().to_string()));
    Ok((key.trim().to_string(), value))
}

fn context_from(matches: &ArgMatches) -> Result<ExecutionContext> {
    let mut context = ExecutionContext {
        browser: matches.get_one::<String>("browser").cloned(),
        headless: matches.get_one::<bool>("headless").copied(),
        platform: matches.get_one::<String>("platform").cloned(),
        server: matches.get_one::<String>("server").cloned(),
        users: matches.get_one::<u32>("users").copied(),
        spawn_rate: matches.get_one::<f64>("spawn-rate").copied(),
        run_time: matches.get_one::<String>("run-time").cloned(),
        ..ExecutionContext::default()
    };
    for raw in matches.get_many::<String>("var").into_iter().flatten() {
        let (key, value) = parse_assignment(raw, '=')?;
        if is_reserved_key(&key) {
            anyhow::bail!("`{}` is a reserved context key; use its dedicated option instead", key);
        }
        context.variables.insert(key, value);
    }
    Ok(context)
}

fn run_args_from(target: RunTarget, matches: &ArgMatches) -> Result<RunArgs> {
    Ok(RunArgs {
        target,
        context: context_from(matches)?,
        html: matches.get_one::<PathBuf>("html").cloned(),
    })
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .with_context(|| format!("missing argument `{}`", id))
}

fn required_engine(matches: &ArgMatches) -> Result<EngineType> {
    matches
        .get_one::<EngineType>("engine")
        .copied()
        .context("missing argument `engine`")
}

fn quick_args_from(matches: &ArgMatches) -> Result<QuickArgs> {
    let mut headers = Vec::new();
    for raw in matches.get_many::<String>("header").into_iter().flatten() {
        let (name, value) = raw
            .split_once(':')
            .with_context(|| format!("Expected NAME:VALUE, got `{}`", raw))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }
    let mut params = Vec::new();
    for raw in matches.get_many::<String>("param").into_iter().flatten() {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got `{}`", raw))?;
        params.push((key.trim().to_string(), value.trim().to_string()));
    }
    let mut expected_json = Vec::new();
    for raw in matches.get_many::<String>("expect-json").into_iter().flatten() {
        expected_json.push(parse_assignment(raw, '=')?);
    }
    let json = match matches.get_one::<String>("json") {
        Some(raw) => Some(serde_json::from_str(raw).with_context(|| format!("Invalid JSON body: {}", raw))?),
        None => None,
    };

    Ok(QuickArgs {
        url: matches.get_one::<String>("url").cloned().context("missing argument `url`")?,
        method: matches
            .get_one::<String>("method")
            .cloned()
            .unwrap_or_else(|| "GET".to_string()),
        headers,
        params,
        json,
        expected_status: matches.get_one::<u16>("expect-status").copied().unwrap_or(200),
        expected_contains: matches.get_one::<String>("expect-contains").cloned(),
        expected_json,
        max_response_time_ms: matches.get_one::<u64>("max-ms").copied(),
    })
}

fn load_config(path: &Path, cli_lang: Option<&str>) -> Result<EngineConfig> {
    let config_exists = path.exists();
    let config = EngineConfig::load_or_default(path)?;
    // --lang wins, then the config file, then the system locale already applied.
    match cli_lang {
        Some(lang) => crate::set_language(lang),
        None if config_exists => crate::set_language(&config.language),
        None => {}
    }
    Ok(config)
}

pub async fn run() -> Result<ExitCode> {
    // Pre-parse language and initialize i18n first.
    let cli_lang = pre_parse_language();
    let language = cli_lang
        .clone()
        .unwrap_or_else(|| sys_locale::get_locale().unwrap_or_else(|| "en".to_string()));
    crate::set_language(&language);
    let locale: String = (*rust_i18n::locale()).to_owned();

    let matches = build_cli(&locale).get_matches();
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if let Some(("init", init_matches)) = matches.subcommand() {
        let non_interactive = init_matches.get_flag("non-interactive");
        if cli_lang.is_none() && !non_interactive {
            println!("🌐 {}", t!("system_language_detected", locale = &locale, lang = &locale));
        }
        commands::init::run_init_wizard(&config_path, &locale, non_interactive)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&config_path, cli_lang.as_deref())?;

    let success = match matches.subcommand() {
        Some(("generate", m)) => {
            let args = GenerateArgs {
                engine: required_engine(m)?,
                format: m.get_one::<CaseFormat>("format").copied().unwrap_or_default(),
                params: required_path(m, "params")?,
                save_path: m.get_one::<PathBuf>("save-path").cloned(),
            };
            commands::generate::execute(&config, args)?
        }
        Some(("import", m)) => {
            let args = ImportArgs {
                engine: required_engine(m)?,
                file: required_path(m, "file")?,
                save_path: m.get_one::<PathBuf>("save-path").cloned(),
            };
            commands::generate::import(&config, args)?
        }
        Some(("run", run_matches)) => {
            let args = match run_matches.subcommand() {
                Some(("file", m)) => run_args_from(RunTarget::File(required_path(m, "path")?), m)?,
                Some(("dir", m)) => run_args_from(
                    RunTarget::Directory {
                        path: required_path(m, "path")?,
                        engine: m.get_one::<EngineType>("engine").copied(),
                        format: m
                            .get_one::<CaseFormat>("format")
                            .copied()
                            .unwrap_or(CaseFormat::Declarative),
                    },
                    m,
                )?,
                Some(("case", m)) => run_args_from(
                    RunTarget::Case {
                        engine: required_engine(m)?,
                        path: required_path(m, "path")?,
                    },
                    m,
                )?,
                Some(("batch", m)) => run_args_from(
                    RunTarget::Batch {
                        engine: required_engine(m)?,
                        paths: m.get_many::<PathBuf>("paths").into_iter().flatten().cloned().collect(),
                    },
                    m,
                )?,
                _ => return Ok(ExitCode::FAILURE),
            };
            commands::run::execute(&config, args).await?
        }
        Some(("quick", m)) => commands::quick::execute(&config, quick_args_from(m)?).await?,
        Some(("report", report_matches)) => {
            let action = match report_matches.subcommand() {
                Some(("show", m)) => ReportAction::Show(m.get_one::<String>("name").cloned()),
                Some(("list", m)) => ReportAction::List(m.get_one::<usize>("limit").copied().unwrap_or(20)),
                Some(("summary", _)) => ReportAction::Summary,
                _ => return Ok(ExitCode::FAILURE),
            };
            commands::report::execute(&config, action)?
        }
        // Clap has already printed help for anything else.
        _ => return Ok(ExitCode::FAILURE),
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
