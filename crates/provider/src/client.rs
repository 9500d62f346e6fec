//! TrustIn investigate API client.
//!
//! Provides [`TrustInClient`], which runs the provider's asynchronous task
//! lifecycle:
//! 1. `submit_task` with the investigation parameters
//! 2. `get_status` polled at a fixed interval until the task is `finished`
//! 3. `get_result` for the graph, whose `data` may arrive as a JSON string

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::graph::FetchedGraph;
use crate::request::FetchRequest;
use crate::GraphProvider;

const FINISHED: &str = "finished";

/// HTTP client for the TrustIn investigate API.
pub struct TrustInClient {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl TrustInClient {
    /// Returns [`ProviderError::MissingApiKey`] when the config carries no key.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.clone().ok_or(ProviderError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("aml-screen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(
            base_url = %config.base_url,
            max_retries = config.max_retries,
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            "TrustInClient initialised"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    // ── Task lifecycle ──────────────────────────────────────────────

    /// Submit an investigation and return the provider's task id verbatim.
    pub async fn submit_task(&self, request: &FetchRequest) -> Result<Value, ProviderError> {
        let res = self.call("submit_task", &request.submit_payload()).await?;
        let task_id = res.get("data").cloned().unwrap_or(Value::Null);

        if response_code(&res) != Some(0) || !is_present(&task_id) {
            return Err(ProviderError::SubmitRejected(message(&res)));
        }
        info!(
            chain = %request.chain,
            address = %request.address,
            task_id = %task_id,
            "investigation task submitted"
        );
        Ok(task_id)
    }

    /// Poll `get_status` until the task reports `finished`.
    pub async fn wait_for_task(&self, task_id: &Value) -> Result<(), ProviderError> {
        let body = json!({ "task_id": task_id });
        for attempt in 1..=self.config.max_retries {
            let res = self.call("get_status", &body).await?;
            let state = res.get("data").and_then(Value::as_str).unwrap_or_default();
            debug!(task_id = %task_id, attempt, state, "polling task status");

            if response_code(&res) == Some(0) && state == FINISHED {
                return Ok(());
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        warn!(task_id = %task_id, attempts = self.config.max_retries, "task did not finish in time");
        Err(ProviderError::TaskTimedOut {
            task_id: task_id.to_string(),
            attempts: self.config.max_retries,
        })
    }

    /// Fetch the finished graph. The response is returned whole with `data`
    /// decoded to an object.
    pub async fn get_result(&self, task_id: &Value) -> Result<Value, ProviderError> {
        let body = json!({ "task_id": task_id, "token": self.config.token });
        let res = self.call("get_result", &body).await?;
        if response_code(&res) != Some(0) {
            return Err(ProviderError::ResultRejected(message(&res)));
        }
        decode_result(res)
    }

    // ── Transport ───────────────────────────────────────────────────

    /// POST a JSON body as `text/plain` to `<base>/<endpoint>?apikey=...`.
    async fn call(&self, endpoint: &str, body: &Value) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            warn!(endpoint, %status, "provider returned non-2xx status");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::Parse(format!("{endpoint}: {e}")))
    }
}

#[async_trait]
impl GraphProvider for TrustInClient {
    async fn fetch_graph(&self, request: &FetchRequest) -> Result<FetchedGraph, ProviderError> {
        let started = Local::now();
        let task_id = self.submit_task(request).await?;
        self.wait_for_task(&task_id).await?;
        let graph_data = self.get_result(&task_id).await?;
        let fetched = FetchedGraph::new(request, graph_data, started, Local::now());

        info!(
            address = %request.address,
            execution_time = %fetched.execution_time,
            "graph fetched"
        );
        Ok(fetched)
    }

    fn name(&self) -> &str {
        "trustin"
    }
}

// ── Response helpers ────────────────────────────────────────────────

fn response_code(res: &Value) -> Option<i64> {
    res.get("code").and_then(Value::as_i64)
}

fn message(res: &Value) -> String {
    res.get("msg")
        .and_then(Value::as_str)
        .unwrap_or("unknown API error")
        .to_string()
}

/// A task id must be a non-empty, non-zero scalar.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Replace a stringified `data` payload with the object it encodes.
fn decode_result(mut res: Value) -> Result<Value, ProviderError> {
    if let Some(Value::String(raw)) = res.get("data") {
        let decoded: Value =
            serde_json::from_str(raw).map_err(|e| ProviderError::Parse(format!("get_result data: {e}")))?;
        res["data"] = decoded;
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected() {
        let err = TrustInClient::new(ProviderConfig::default()).err();
        assert!(matches!(err, Some(ProviderError::MissingApiKey)));
    }

    #[test]
    fn stringified_result_data_is_decoded() {
        let res = json!({ "code": 0, "data": "{\"paths\":[],\"tags\":[{\"priority\":1}]}" });
        let decoded = decode_result(res).unwrap();
        assert_eq!(decoded["data"]["tags"][0]["priority"], 1);

        let res = json!({ "code": 0, "data": { "paths": [] } });
        assert_eq!(decode_result(res.clone()).unwrap(), res);

        let res = json!({ "code": 0, "data": "not json" });
        assert!(matches!(decode_result(res), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn task_id_presence() {
        assert!(is_present(&json!(12345)));
        assert!(is_present(&json!("abc")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&Value::Null));
    }

    #[test]
    fn error_messages() {
        assert_eq!(message(&json!({ "code": 1, "msg": "quota exceeded" })), "quota exceeded");
        assert_eq!(message(&json!({ "code": 1 })), "unknown API error");
    }
}
