//! # Case Generator Service / 用例生成服务
//!
//! The single entry point for asset creation. One method per engine, each
//! taking a [`CaseFormat`] that selects the declarative or the script
//! generator, plus an import path for caller-written declarative documents.
//!
//! 资产创建的唯一入口。每个引擎一个方法，均接收 [`CaseFormat`] 以选择声明式或脚本生成器；
//! 另外提供导入调用方编写的声明式文档的入口。

use std::path::{Path, PathBuf};

use crate::core::config::EngineConfig;
use crate::core::error::{GenerationError, GenerationResult};
use crate::core::models::{CaseFormat, EngineType, GeneratedAsset};
use crate::core::spec::{ApiCaseRequest, GenerationRequest, MobileCaseRequest, PerfCaseRequest, WebCaseRequest};
use crate::generator::base::BaseGenerator;
use crate::generator::declarative::{
    ApiDeclarativeGenerator, MobileDeclarativeGenerator, PerfDeclarativeGenerator, WebDeclarativeGenerator,
};
use crate::generator::script::{ApiScriptGenerator, MobileScriptGenerator, PerfScriptGenerator, WebScriptGenerator};
use crate::generator::Generator;

/// Façade over the eight concrete generators.
/// 八个具体生成器之上的门面。
pub struct CaseGeneratorService {
    cases_root: PathBuf,
    quiet: bool,
    api_declarative: ApiDeclarativeGenerator,
    web_declarative: WebDeclarativeGenerator,
    mobile_declarative: MobileDeclarativeGenerator,
    perf_declarative: PerfDeclarativeGenerator,
    api_script: ApiScriptGenerator,
    web_script: WebScriptGenerator,
    mobile_script: MobileScriptGenerator,
    perf_script: PerfScriptGenerator,
}

impl CaseGeneratorService {
    pub fn new(cases_root: impl Into<PathBuf>) -> Self {
        Self::with_quiet(cases_root, false)
    }

    pub fn with_quiet(cases_root: impl Into<PathBuf>, quiet: bool) -> Self {
        let cases_root = cases_root.into();
        let root = cases_root.as_path();
        Self {
            api_declarative: ApiDeclarativeGenerator::new(root, quiet),
            web_declarative: WebDeclarativeGenerator::new(root, quiet),
            mobile_declarative: MobileDeclarativeGenerator::new(root, quiet),
            perf_declarative: PerfDeclarativeGenerator::new(root, quiet),
            api_script: ApiScriptGenerator::new(root, quiet),
            web_script: WebScriptGenerator::new(root, quiet),
            mobile_script: MobileScriptGenerator::new(root, quiet),
            perf_script: PerfScriptGenerator::new(root, quiet),
            cases_root,
            quiet,
        }
    }

    /// Builds the service from `[paths] cases_root` and `quiet`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_quiet(config.paths.cases_root.clone(), config.quiet)
    }

    pub fn cases_root(&self) -> &Path {
        &self.cases_root
    }

    pub fn generate_api_case(&self, request: &ApiCaseRequest, format: CaseFormat) -> GenerationResult<GeneratedAsset> {
        match format {
            CaseFormat::Declarative => self.api_declarative.generate(request),
            CaseFormat::Script => self.api_script.generate(request),
        }
    }

    pub fn generate_web_case(&self, request: &WebCaseRequest, format: CaseFormat) -> GenerationResult<GeneratedAsset> {
        match format {
            CaseFormat::Declarative => self.web_declarative.generate(request),
            CaseFormat::Script => self.web_script.generate(request),
        }
    }

    pub fn generate_mobile_case(
        &self,
        request: &MobileCaseRequest,
        format: CaseFormat,
    ) -> GenerationResult<GeneratedAsset> {
        match format {
            CaseFormat::Declarative => self.mobile_declarative.generate(request),
            CaseFormat::Script => self.mobile_script.generate(request),
        }
    }

    pub fn generate_perf_case(&self, request: &PerfCaseRequest, format: CaseFormat) -> GenerationResult<GeneratedAsset> {
        match format {
            CaseFormat::Declarative => self.perf_declarative.generate(request),
            CaseFormat::Script => self.perf_script.generate(request),
        }
    }

    /// Dispatches an engine-tagged request.
    pub fn generate(&self, request: &GenerationRequest, format: CaseFormat) -> GenerationResult<GeneratedAsset> {
        match request {
            GenerationRequest::Api(request) => self.generate_api_case(request, format),
            GenerationRequest::Web(request) => self.generate_web_case(request, format),
            GenerationRequest::Mobile(request) => self.generate_mobile_case(request, format),
            GenerationRequest::Perf(request) => self.generate_perf_case(request, format),
        }
    }

    /// Persists caller-written declarative text for `engine`.
    ///
    /// The text is only checked to be a mapping with a `steps` key; it is
    /// written verbatim under `<engine>-cases_yaml` (or at `save_path`).
    ///
    /// # Errors
    /// [`GenerationError::InvalidDeclarative`] when the text is not YAML, not a
    /// mapping, or has no `steps` key.
    ///
    /// 持久化调用方编写的声明式文本。仅检查其是否为带 `steps` 键的映射，然后原样写入。
    pub fn generate_case_from_yaml(
        &self,
        text: &str,
        engine: EngineType,
        save_path: Option<&Path>,
    ) -> GenerationResult<GeneratedAsset> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| GenerationError::InvalidDeclarative(e.to_string()))?;
        let serde_yaml::Value::Mapping(mapping) = &document else {
            return Err(GenerationError::InvalidDeclarative(
                "top level must be a mapping".to_string(),
            ));
        };
        if !mapping.contains_key("steps") {
            return Err(GenerationError::InvalidDeclarative(
                "missing `steps` key".to_string(),
            ));
        }

        let name = ["name", "desc"]
            .iter()
            .find_map(|key| mapping.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("imported_case")
            .to_string();

        let base = BaseGenerator::new(&self.cases_root, engine, CaseFormat::Declarative).quiet(self.quiet);
        let mut asset = base.emit(save_path, &name, text.to_string(), Vec::new())?;
        asset.message = format!("{} declarative case imported", engine);
        Ok(asset)
    }
}
