// src/commands/generate.rs

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::{
    commands::print_json,
    core::{
        config::EngineConfig,
        models::{CaseFormat, EngineType},
        spec::GenerationRequest,
    },
    generator::CaseGeneratorService,
    reporting::print_generated_asset,
};

pub struct GenerateArgs {
    pub engine: EngineType,
    pub format: CaseFormat,
    /// JSON or YAML file holding the engine's request fields.
    pub params: PathBuf,
    pub save_path: Option<PathBuf>,
}

pub struct ImportArgs {
    pub engine: EngineType,
    pub file: PathBuf,
    pub save_path: Option<PathBuf>,
}

/// Parses the request for `engine` from JSON or YAML text.
/// An explicit `save_path` replaces the one in the text.
///
/// 从 JSON 或 YAML 文本解析 `engine` 对应的请求，显式的 `save_path` 会覆盖文本中的值。
pub fn parse_request(engine: EngineType, text: &str, save_path: Option<PathBuf>) -> Result<GenerationRequest> {
    let mut request = match engine {
        EngineType::Api => GenerationRequest::Api(serde_yaml::from_str(text)?),
        EngineType::Web => GenerationRequest::Web(serde_yaml::from_str(text)?),
        EngineType::Mobile => GenerationRequest::Mobile(serde_yaml::from_str(text)?),
        EngineType::Perf => GenerationRequest::Perf(serde_yaml::from_str(text)?),
    };
    if let Some(path) = save_path {
        match &mut request {
            GenerationRequest::Api(r) => r.save_path = Some(path),
            GenerationRequest::Web(r) => r.save_path = Some(path),
            GenerationRequest::Mobile(r) => r.save_path = Some(path),
            GenerationRequest::Perf(r) => r.save_path = Some(path),
        }
    }
    Ok(request)
}

pub fn execute(config: &EngineConfig, args: GenerateArgs) -> Result<bool> {
    let text = fs::read_to_string(&args.params)
        .with_context(|| format!("Failed to read parameters file: {}", args.params.display()))?;
    let request = parse_request(args.engine, &text, args.save_path)
        .with_context(|| format!("Invalid {} parameters in {}", args.engine, args.params.display()))?;

    let service = CaseGeneratorService::from_config(config);
    let asset = service
        .generate(&request, args.format)
        .with_context(|| format!("Failed to generate {} {} case", args.engine, args.format))?;

    print_generated_asset(&asset);
    print_json(&asset)?;
    Ok(asset.success)
}

pub fn import(config: &EngineConfig, args: ImportArgs) -> Result<bool> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read case file: {}", args.file.display()))?;

    let service = CaseGeneratorService::from_config(config);
    let asset = service
        .generate_case_from_yaml(&text, args.engine, args.save_path.as_deref())
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    print_generated_asset(&asset);
    print_json(&asset)?;
    Ok(asset.success)
}
