//! Client for the external prediction service.
//!
//! The service contract is a single endpoint: `POST /predict` with body
//! `{"query": string}`, answering `{"response": string}` on success and
//! optionally `{"error": string}` with a non-success status on failure.

use crate::conversation::Reply;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fallback shown when the service reports a failure without an error body.
pub const UNKNOWN_ERROR_FALLBACK: &str = "An unknown error occurred.";

/// Fallback shown when no interpretable response could be obtained.
pub const CONNECT_FALLBACK: &str = "Failed to connect to the backend server.";

#[derive(Serialize)]
struct PredictRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    response: String,
}

#[derive(Deserialize, Default)]
struct PredictErrorBody {
    error: Option<String>,
}

/// Errors that can occur when calling the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The service answered with a non-success status.
    #[error("prediction service returned status {status}")]
    Application {
        /// HTTP status code.
        status: u16,
        /// Structured error text from the body, if any.
        message: Option<String>,
    },

    /// The request could not be completed (connection refused, DNS, etc.).
    #[error("failed to reach prediction service: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("could not decode prediction response: {0}")]
    Decode(String),
}

/// Client for making prediction requests.
///
/// The trait is the seam between the conversation controller and the
/// network; tests substitute a scripted implementation.
#[async_trait]
pub trait PredictService: Send + Sync {
    /// Submit a query and return the response text.
    async fn predict(&self, query: &str) -> Result<String, PredictError>;
}

/// HTTP implementation of [`PredictService`].
///
/// No request timeout is configured: the call either resolves or rejects,
/// and both paths are terminal for that request.
pub struct PredictClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PredictClient {
    /// Create a client for a service at `endpoint` (e.g.
    /// `http://localhost:5000`).
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// The configured service endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PredictService for PredictClient {
    async fn predict(&self, query: &str) -> Result<String, PredictError> {
        let url = format!("{}/predict", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { query })
            .send()
            .await
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The error body is optional; a missing or malformed one still
            // settles as an application error with the fallback text.
            let body: PredictErrorBody = response.json().await.unwrap_or_default();
            return Err(PredictError::Application {
                status: status.as_u16(),
                message: body.error,
            });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictError::Decode(e.to_string()))?;
        Ok(body.response)
    }
}

impl Reply {
    /// Map a prediction outcome to its settlement value.
    ///
    /// Every outcome maps to exactly one reply; failures become error
    /// replies with the service's text or a generic fallback.
    pub fn from_outcome(outcome: Result<String, PredictError>) -> Self {
        match outcome {
            Ok(text) => Self::Agent(text),
            Err(PredictError::Application { message, status }) => {
                tracing::debug!(status, "prediction service reported an error");
                Self::Error(message.unwrap_or_else(|| UNKNOWN_ERROR_FALLBACK.to_string()))
            }
            Err(err @ (PredictError::Transport(_) | PredictError::Decode(_))) => {
                tracing::debug!(error = %err, "prediction request failed");
                Self::Error(CONNECT_FALLBACK.to_string())
            }
        }
    }
}

/// Invoke the service and settle the outcome into a reply.
///
/// This function never fails: all failure paths become error replies.
pub async fn fetch_reply(service: &dyn PredictService, query: &str) -> Reply {
    Reply::from_outcome(service.predict(query).await)
}
