//! HTTP transport to the Marina solving endpoint

use crate::config::Settings;
use crate::grammar::Formula;
use crate::protocol::{SolveRequest, SolveResponse, SOLVE_PATH};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid solver base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Why a solve attempt produced no decodable answer.
///
/// The `Display` text is what ends up in [`SolveResponse::error`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error! status: {}", .0.as_u16())]
    Http(StatusCode),
    #[error("Network error occurred: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Malformed response from solver: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Upstream status and body, untouched
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Client for `POST {base_url}/marina`.
///
/// One attempt per call: no retries and no timeout beyond the transport
/// defaults. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MarinaClient {
    http: Client,
    endpoint: Url,
}

impl MarinaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = solve_endpoint(base_url)?;
        let http = Client::builder().build()?;
        Ok(Self { http, endpoint })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::new(&settings.solver.base_url)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Solve `formula`, folding every transport failure into the response
    pub async fn solve(&self, formula: &Formula) -> SolveResponse {
        match self.try_solve(formula.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, "error solving SAT: {}", e);
                SolveResponse::failure(e.to_string())
            }
        }
    }

    /// Solve `prop`, reporting transport failures as errors
    pub async fn try_solve(&self, prop: &str) -> Result<SolveResponse, TransportError> {
        let response = self.send(prop).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Post `prop` and hand back whatever the solver answered
    pub async fn forward(&self, prop: &Value) -> Result<Forwarded, reqwest::Error> {
        let response = self.send(prop).await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Forwarded { status, body })
    }

    async fn send<P: Serialize + ?Sized>(&self, prop: &P) -> Result<Response, reqwest::Error> {
        tracing::debug!(endpoint = %self.endpoint, "posting formula to solver");
        self.http
            .post(self.endpoint.clone())
            .json(&SolveRequest { prop })
            .send()
            .await
    }
}

/// Join the configured base URL with the solving path
pub fn solve_endpoint(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let joined = format!("{}{}", base_url.trim().trim_end_matches('/'), SOLVE_PATH);
    let url = Url::parse(&joined).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
