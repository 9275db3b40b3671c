use thiserror::Error;

/// Failures talking to the remote text service.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI features are disabled")]
    Disabled,
    #[error("no API key found in ${0}")]
    MissingApiKey(String),
    #[error("failed to set up AI provider: {0}")]
    Setup(String),
    #[error("AI request failed: {0}")]
    Request(String),
    #[error("AI service returned an empty response")]
    EmptyResponse,
    #[error("malformed explanation: {0}")]
    Malformed(#[from] serde_json::Error),
}
