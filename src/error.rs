//! Error types for the analysis pipeline and their response bodies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the schema extraction step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The model API rejected the credentials or no key was configured.
    #[error("Gemini API key is not configured. Please set GEMINI_API_KEY in your .env file")]
    NotConfigured,
    /// The model API refused the call for quota reasons.
    #[error("Gemini API quota exceeded or rate limited. Please try again later.")]
    RateLimited,
    /// The model output was not JSON.
    #[error("Failed to extract schema with Gemini: Gemini returned invalid JSON: {0}")]
    InvalidJson(String),
    /// The model output was JSON but not an object.
    #[error("Failed to extract schema with Gemini: Invalid schema format returned by Gemini")]
    NotAnObject,
    /// The model output was an object that does not fit the schema shape.
    #[error("Failed to extract schema with Gemini: malformed schema: {0}")]
    Malformed(String),
    /// Any other failure of the call.
    #[error("Failed to extract schema with Gemini: {0}")]
    Failed(String),
}

impl ExtractionError {
    /// Classifies a raw client failure message into a humanized error.
    #[must_use]
    pub fn from_client_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if message.contains("API key") {
            Self::NotConfigured
        } else if lower.contains("quota") || lower.contains("rate limit") {
            Self::RateLimited
        } else {
            Self::Failed(message.to_string())
        }
    }
}

/// Failure of a whole analysis request, tagged by stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// The repository URL is missing or not a GitHub URL.
    #[error("{0}")]
    Validation(String),
    /// Discovery found no candidate files.
    #[error("No database schema files found")]
    NotFound,
    /// The extraction collaborator failed.
    #[error(transparent)]
    Upstream(#[from] ExtractionError),
    /// The repository could not be fetched.
    #[error("{0}")]
    Transport(String),
}

impl AnalyzeError {
    /// HTTP-equivalent status for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound => 404,
            Self::Upstream(_) | Self::Transport(_) => 500,
        }
    }
}

/// Error body reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error headline.
    pub error: String,
    /// Human-readable detail, when there is more to say.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&AnalyzeError> for ErrorResponse {
    fn from(err: &AnalyzeError) -> Self {
        match err {
            AnalyzeError::Validation(msg) => Self { error: msg.clone(), message: None },
            AnalyzeError::NotFound => Self {
                error: err.to_string(),
                message: Some(
                    "Could not find any SQL files, ORM models, or schema definitions in this repository"
                        .to_string(),
                ),
            },
            AnalyzeError::Upstream(_) | AnalyzeError::Transport(_) => Self {
                error: "Failed to analyze repository".to_string(),
                message: Some(err.to_string()),
            },
        }
    }
}
