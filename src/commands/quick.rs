// src/commands/quick.rs

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::{
    commands::print_json,
    core::{config::EngineConfig, spec::HttpMethod},
    reporting::print_quick_result,
    runner::{QuickApiRequest, TestRunnerService},
};

pub struct QuickArgs {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub json: Option<Value>,
    pub expected_status: u16,
    pub expected_contains: Option<String>,
    pub expected_json: Vec<(String, Value)>,
    pub max_response_time_ms: Option<u64>,
}

impl QuickArgs {
    pub fn into_request(self) -> Result<QuickApiRequest> {
        let method: HttpMethod = self.method.parse().map_err(|e: String| anyhow!(e))?;
        let mut request = QuickApiRequest::new(self.url);
        request.method = method;
        request.headers = self.headers.into_iter().collect();
        request.params = self.params.into_iter().collect();
        request.json = self.json;
        request.expected_status = self.expected_status;
        request.expected_contains = self.expected_contains;
        request.max_response_time_ms = self.max_response_time_ms;
        for (path, expected) in self.expected_json {
            request = request.expect_json(path, expected);
        }
        Ok(request)
    }
}

pub async fn execute(config: &EngineConfig, args: QuickArgs) -> Result<bool> {
    let request = args.into_request()?;
    let runner = TestRunnerService::from_config(config)?;
    let result = runner.run_api_test(request).await;

    print_quick_result(&result);
    print_json(&result)?;
    Ok(result.success)
}
