use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use tempfile::tempdir;
use testengine::CaseGeneratorService;
use testengine::core::spec::{ApiCaseRequest, PerfCaseRequest};
use testengine::models::CaseFormat;

fn api_request() -> ApiCaseRequest {
    serde_json::from_value(json!({
        "name": "Login Flow",
        "url": "https://api.example.com/login",
        "method": "POST",
        "json": {"user": "ada", "password": "secret"},
        "extracts": [{"name": "token", "jsonpath": "$.data.token"}],
        "asserts": [
            {"type": "status_code", "expected": 200},
            {"type": "jsonpath", "jsonpath": "$.code", "expected": 0}
        ]
    }))
    .unwrap()
}

fn perf_request() -> PerfCaseRequest {
    serde_json::from_value(json!({
        "name": "Browse",
        "host": "https://shop.example.com",
        "users": 10,
        "scenarios": [
            {"name": "home", "path": "/", "weight": 3},
            {"name": "search", "path": "/search", "params": {"q": "rust"}}
        ]
    }))
    .unwrap()
}

fn bench_generation(c: &mut Criterion) {
    let temp = tempdir().unwrap();
    let service = CaseGeneratorService::with_quiet(temp.path(), true);
    let api = api_request();
    let perf = perf_request();

    c.bench_function("generate_api_script", |b| {
        b.iter(|| service.generate_api_case(&api, CaseFormat::Script).unwrap());
    });
    c.bench_function("generate_api_declarative", |b| {
        b.iter(|| service.generate_api_case(&api, CaseFormat::Declarative).unwrap());
    });
    c.bench_function("generate_perf_script", |b| {
        b.iter(|| service.generate_perf_case(&perf, CaseFormat::Script).unwrap());
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
