//! # Generator Service Unit Tests / 生成服务单元测试
//!
//! Tests asset placement, persistence and import through `CaseGeneratorService`.
//!
//! 通过 `CaseGeneratorService` 测试资产的存放位置、持久化和导入。

use serde_json::json;
use std::fs;
use tempfile::tempdir;
use testengine::core::error::GenerationError;
use testengine::core::spec::{ApiCaseRequest, GenerationRequest, MobileCaseRequest, PerfCaseRequest, WebCaseRequest};
use testengine::generator::declarative::DeclarativeCase;
use testengine::models::{CaseFormat, EngineType};
use testengine::CaseGeneratorService;

fn request_for(engine: EngineType, name: &str) -> GenerationRequest {
    match engine {
        EngineType::Api => GenerationRequest::Api(ApiCaseRequest::new(name, "https://api.example.com/ping")),
        EngineType::Web => GenerationRequest::Web(WebCaseRequest::new(name, "https://example.com")),
        EngineType::Mobile => GenerationRequest::Mobile(MobileCaseRequest {
            name: name.to_string(),
            app_package: "com.example.app".to_string(),
            ..MobileCaseRequest::default()
        }),
        EngineType::Perf => {
            let mut request = PerfCaseRequest::new(name, "https://example.com");
            request.scenarios = vec![json!({"url": "/"})];
            GenerationRequest::Perf(request)
        }
    }
}

#[cfg(test)]
mod placement_tests {
    use super::*;

    #[test]
    fn test_every_engine_and_format_lands_in_its_subdirectory() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);

        for engine in EngineType::ALL {
            for format in [CaseFormat::Declarative, CaseFormat::Script] {
                let asset = service.generate(&request_for(engine, "../Login Flow!"), format).unwrap();

                assert!(asset.success);
                assert_eq!(asset.engine_type, engine);
                assert_eq!(asset.format, format);
                let expected_dir = temp.path().join(engine.cases_dir_name(format));
                assert_eq!(asset.save_path.parent().unwrap(), expected_dir);

                let file_name = asset.save_path.file_name().unwrap().to_str().unwrap();
                assert!(file_name.contains("login_flow"), "{}", file_name);
                assert!(!file_name.contains(".."));
                assert!(file_name.ends_with(&format!(".{}", format.extension())));
                match (engine, format) {
                    (EngineType::Perf, CaseFormat::Script) => assert!(file_name.starts_with("locustfile_")),
                    (_, CaseFormat::Script) => assert!(file_name.starts_with("test_")),
                    _ => {}
                }

                assert_eq!(fs::read_to_string(&asset.save_path).unwrap(), asset.content);
            }
        }
    }

    #[test]
    fn test_repeated_generation_never_overwrites() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);
        let request = ApiCaseRequest::new("ping", "https://api.example.com/ping");

        let first = service.generate_api_case(&request, CaseFormat::Declarative).unwrap();
        let second = service.generate_api_case(&request, CaseFormat::Declarative).unwrap();

        assert_ne!(first.save_path, second.save_path);
        assert!(first.save_path.exists());
        assert!(second.save_path.exists());
    }

    #[test]
    fn test_explicit_save_path_is_used_verbatim() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path().join("cases"), true);
        let target = temp.path().join("custom").join("nested").join("ping.yaml");
        let mut request = ApiCaseRequest::new("ping", "https://api.example.com/ping");
        request.save_path = Some(target.clone());

        let first = service.generate_api_case(&request, CaseFormat::Declarative).unwrap();
        let second = service.generate_api_case(&request, CaseFormat::Declarative).unwrap();

        assert_eq!(first.save_path, target);
        assert_eq!(second.save_path, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), second.content);
    }

    #[test]
    fn test_perf_script_reports_run_command() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);
        let asset = service
            .generate(&request_for(EngineType::Perf, "soak"), CaseFormat::Script)
            .unwrap();

        let command = asset.run_command.unwrap();
        assert!(command.starts_with("locust -f "));
        assert!(command.contains("--host=https://example.com"));
    }

    #[test]
    fn test_skipped_operations_are_reported_in_envelope() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);
        let mut request = WebCaseRequest::new("search", "https://example.com");
        request.actions = vec![json!({"type": "shake"})];

        let asset = service.generate_web_case(&request, CaseFormat::Script).unwrap();
        assert!(asset.success);
        assert_eq!(asset.skipped.len(), 1);
        assert!(asset.message.contains("1 unrecognized operation(s) skipped"));
    }

    #[test]
    fn test_invalid_request_writes_nothing() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);
        let request = ApiCaseRequest::new("", "https://api.example.com/ping");

        let error = service.generate_api_case(&request, CaseFormat::Script).unwrap_err();
        assert!(matches!(error, GenerationError::MissingField("name")));
        assert!(!temp.path().join("api-cases_pytest").exists());
    }
}

#[cfg(test)]
mod import_tests {
    use super::*;

    const DOCUMENT: &str = "desc: imported login\nsteps:\n- send request:\n    关键字: send_request\n    url: https://api.example.com/login\n";

    #[test]
    fn test_import_writes_text_verbatim() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);

        let asset = service
            .generate_case_from_yaml(DOCUMENT, EngineType::Api, None)
            .unwrap();

        assert_eq!(asset.format, CaseFormat::Declarative);
        assert_eq!(asset.save_path.parent().unwrap(), temp.path().join("api-cases_yaml"));
        assert_eq!(fs::read_to_string(&asset.save_path).unwrap(), DOCUMENT);
        let parsed = DeclarativeCase::from_yaml(&asset.content).unwrap();
        assert_eq!(parsed.keywords(), vec!["send_request"]);
    }

    #[test]
    fn test_import_rejects_documents_without_steps() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);

        for text in ["desc: nothing here\n", "- just\n- a list\n", "key: [unclosed"] {
            let error = service
                .generate_case_from_yaml(text, EngineType::Web, None)
                .unwrap_err();
            assert!(matches!(error, GenerationError::InvalidDeclarative(_)), "{}", text);
        }
        assert!(!temp.path().join("web-cases_yaml").exists());
    }

    #[test]
    fn test_import_honors_save_path() {
        let temp = tempdir().unwrap();
        let service = CaseGeneratorService::with_quiet(temp.path(), true);
        let target = temp.path().join("mine.yaml");

        let asset = service
            .generate_case_from_yaml(DOCUMENT, EngineType::Mobile, Some(&target))
            .unwrap();
        assert_eq!(asset.save_path, target);
        assert_eq!(asset.engine_type, EngineType::Mobile);
    }
}
