//! Prediction service client
//!
//! Thin transport wrapper over the external prediction service. Translates
//! submissions into HTTP calls and normalizes every outcome into either a
//! [`Prediction`] or an [`ApiError`].
//!
//! # Error normalization
//! - Non-2xx with a string `detail` → [`ApiError::Service`], message is the
//!   detail verbatim
//! - Non-2xx without one → [`ApiError::Status`], generic message
//! - Unreachable service, timeout, malformed body → [`ApiError::Transport`],
//!   generic message
//!
//! reqwest errors are flattened to strings here and never reach callers.
//!
//! # API Reference
//! - `POST /predict` body `{ "data": { ...28 keys... } }`
//! - `POST /predict-from-link` body `{ "url": "..." }`
//! - `GET /` health check

use repp_common::config::ClientConfig;
use repp_common::prediction::{
    ErrorBody, HealthResponse, LinkPredictRequest, PredictRequest, PredictResponse, HEALTH_PATH,
    PREDICT_FROM_LINK_PATH, PREDICT_PATH,
};
use repp_common::{AttributeRecord, Prediction};
use reqwest::{Client, Response};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown when the service gives no usable explanation
pub const GENERIC_ERROR_MESSAGE: &str = "Error predicting price";

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("repp-ui/", env!("CARGO_PKG_VERSION"));

/// Human-readable failure text attached to a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage(String);

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The fixed fallback message
    pub fn generic() -> Self {
        Self::new(GENERIC_ERROR_MESSAGE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure of one service call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Service unreachable, timed out, or sent an unreadable body
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response without a usable `detail`
    #[error("Service returned status {status}")]
    Status { status: u16 },

    /// Non-2xx response carrying a `detail` string
    #[error("Service error (status {status}): {detail}")]
    Service { status: u16, detail: String },
}

impl ApiError {
    /// Text to surface to the user
    pub fn message(&self) -> ErrorMessage {
        match self {
            ApiError::Service { detail, .. } => ErrorMessage::new(detail.clone()),
            ApiError::Transport(_) | ApiError::Status { .. } => ErrorMessage::generic(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_decode() {
            "malformed response"
        } else {
            "request failed"
        };
        ApiError::Transport(format!("{}: {}", kind, err))
    }
}

/// Operations of the external prediction service
///
/// The submission controller is generic over this trait so tests and
/// alternative transports can stand in for [`ApiClient`].
pub trait PredictionApi {
    /// Predict from a manually entered record (all 28 keys are sent)
    fn predict_from_attributes(
        &self,
        record: &AttributeRecord,
    ) -> impl Future<Output = Result<Prediction, ApiError>> + Send;

    /// Predict from a listing URL
    fn predict_from_link(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Prediction, ApiError>> + Send;
}

/// HTTP client for the prediction service
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Service base address without trailing slash
    base_url: String,
}

impl ApiClient {
    /// Create a client from resolved configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query the service health check
    ///
    /// Returns the `status` text reported by the service.
    pub async fn health(&self) -> Result<String, ApiError> {
        let url = self.endpoint(HEALTH_PATH);
        debug!(%url, "Checking prediction service health");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: HealthResponse = response.json().await?;
        Ok(body.status)
    }

    async fn post_prediction<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Prediction, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "Sending prediction request");

        let result = self.send_prediction(&url, body).await;

        match &result {
            Ok(prediction) => debug!(
                price_per_area = prediction.price_per_area(),
                total_price = prediction.total_price(),
                "Prediction received"
            ),
            Err(e) => warn!(%url, error = %e, "Prediction request failed"),
        }
        result
    }

    async fn send_prediction<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Prediction, ApiError> {
        let response = self.http_client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let body: PredictResponse = response.json().await?;
        Ok(Prediction::from(body))
    }
}

impl PredictionApi for ApiClient {
    async fn predict_from_attributes(
        &self,
        record: &AttributeRecord,
    ) -> Result<Prediction, ApiError> {
        debug!(filled = record.filled_count(), "Predicting from attributes");
        self.post_prediction(PREDICT_PATH, &PredictRequest { data: record }).await
    }

    async fn predict_from_link(&self, url: &str) -> Result<Prediction, ApiError> {
        debug!(listing = url, "Predicting from link");
        self.post_prediction(PREDICT_FROM_LINK_PATH, &LinkPredictRequest { url }).await
    }
}

/// Build the error for a non-2xx response
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

fn error_from_body(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail_message().map(str::to_string))
        .filter(|d| !d.trim().is_empty());

    match detail {
        Some(detail) => ApiError::Service { status, detail },
        None => ApiError::Status { status },
    }
}
