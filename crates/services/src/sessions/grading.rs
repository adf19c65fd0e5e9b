use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use assess_core::model::{Answer, AttemptId, ServerGrade, TaskProgress};

use crate::error::GradingError;

/// Payload posted to the remote grading endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRequest {
    pub attempt_id: AttemptId,
    pub answers: Vec<Answer>,
    pub task_progress: Vec<TaskProgress>,
    pub total_score_local: u32,
    pub time_spent_seconds: u32,
}

/// Envelope returned by the grading endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<ServerGrade>,
}

/// Seam to the remote grading service.
///
/// The submission workflow makes exactly one call per session and treats any
/// error as "grade locally"; implementations should not retry internally.
#[async_trait]
pub trait GradingClient: Send + Sync {
    /// Submit a session for remote grading.
    ///
    /// # Errors
    ///
    /// Returns `GradingError` for transport failures, non-2xx statuses, or
    /// an unconfigured endpoint.
    async fn grade(&self, request: &GradeRequest) -> Result<GradeResponse, GradingError>;
}

#[derive(Clone, Debug)]
pub struct GradingConfig {
    pub endpoint_url: String,
    pub api_key: Option<String>,
}

impl GradingConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint_url = env::var("ASSESS_GRADING_URL").ok()?;
        if endpoint_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("ASSESS_GRADING_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Some(Self {
            endpoint_url,
            api_key,
        })
    }
}

/// HTTP grading client.
///
/// An unconfigured client (no endpoint in the environment) fails every call
/// with `GradingError::Disabled`, which the submission workflow treats the
/// same as an unreachable endpoint: the local result stands.
#[derive(Clone)]
pub struct HttpGradingClient {
    client: Client,
    config: Option<GradingConfig>,
}

impl HttpGradingClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GradingConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GradingConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl GradingClient for HttpGradingClient {
    async fn grade(&self, request: &GradeRequest) -> Result<GradeResponse, GradingError> {
        let config = self.config.as_ref().ok_or(GradingError::Disabled)?;

        let mut call = self.client.post(&config.endpoint_url).json(request);
        if let Some(key) = &config.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await?;
        if !response.status().is_success() {
            return Err(GradingError::HttpStatus(response.status()));
        }

        let body: GradeResponse = response.json().await?;
        if !body.success {
            return Err(GradingError::Rejected);
        }
        Ok(body)
    }
}
