//! Sequential fallback across an ordered list of JSON-RPC endpoints.

use std::io::Write;

use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::error::{ApplicationError, ApplicationResult};
use crate::rpc::{ErrorObject, RpcRequest, RpcResponse};

#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(StatusCode),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("response is not a JSON-RPC object: {0}")]
    UnexpectedPayload(serde_json::Error),

    #[error("response has no result{}", node_error_suffix(.error))]
    MissingResult { error: Option<ErrorObject> },
}

fn node_error_suffix(error: &Option<ErrorObject>) -> String {
    match error {
        Some(e) => format!(" (error {}: {})", e.code, e.message),
        None => String::new(),
    }
}

impl From<reqwest::Error> for EndpointError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EndpointError::Timeout
        } else {
            EndpointError::Transport(err)
        }
    }
}

impl EndpointError {
    /// Network, timeout, status and body-decoding failures. Everything else means the
    /// endpoint answered but not with a usable result.
    pub fn is_transport(&self) -> bool {
        !matches!(
            self,
            EndpointError::UnexpectedPayload(_) | EndpointError::MissingResult { .. }
        )
    }
}

#[derive(Debug)]
pub struct EndpointProber {
    http_client: Client,
    endpoints: Vec<String>,
}

impl EndpointProber {
    pub fn new(config: &Config) -> ApplicationResult<Self> {
        let http_client = Client::builder()
            .timeout(config.endpoint_timeout)
            .build()?;
        Ok(Self {
            http_client,
            endpoints: config.endpoints.clone(),
        })
    }

    /// One `eth_getBlockByNumber("latest", true)` call against `endpoint`, returning the
    /// raw `result` payload.
    pub async fn attempt(&self, endpoint: &str) -> Result<Value, EndpointError> {
        let request = RpcRequest::latest_block();
        let response = self
            .http_client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        let body: Value = serde_json::from_slice(&body).map_err(EndpointError::InvalidJson)?;
        let response: RpcResponse =
            serde_json::from_value(body).map_err(EndpointError::UnexpectedPayload)?;

        match response.result {
            Some(result) => Ok(result),
            None => Err(EndpointError::MissingResult {
                error: response.error,
            }),
        }
    }

    /// Tries every endpoint once, in order, and returns the first `result`. Progress
    /// lines go to `progress`; no endpoint after the first success is contacted.
    pub async fn fetch_latest_block<W: Write>(&self, progress: &mut W) -> ApplicationResult<Value> {
        for endpoint in &self.endpoints {
            writeln!(progress, "Trying endpoint: {endpoint}")?;
            match self.attempt(endpoint).await {
                Ok(result) => {
                    debug!("{endpoint} returned the latest block");
                    return Ok(result);
                }
                Err(err) => {
                    let kind = if err.is_transport() { "transport" } else { "protocol" };
                    warn!("{kind} failure from {endpoint}: {err}");
                    writeln!(progress, "Error fetching from {endpoint}: {err}")?;
                }
            }
        }

        Err(ApplicationError::AllEndpointsFailed {
            attempted: self.endpoints.len(),
        })
    }
}
