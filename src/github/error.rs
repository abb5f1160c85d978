use http::StatusCode;
use std::fmt;

/// Failure talking to the hosting API, classified so the binary can pick an
/// exit code.
#[derive(Debug)]
pub enum ApiError {
    /// Bad credentials or missing permission (401/403)
    Authentication(String),
    /// Repository, user or organization does not exist (404)
    NotFound(String),
    /// Anything else: transport failures, 5xx, malformed responses
    Api(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Api(msg) => write!(f, "GitHub API error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}

/// Classify an HTTP status returned by GitHub
pub fn classify_status(operation: &str, status: StatusCode, message: &str) -> ApiError {
    let detail = format!("{} returned {}: {}", operation, status, message);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication(detail),
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        _ => ApiError::Api(detail),
    }
}

/// Map an octocrab failure for the named operation
pub fn map_octocrab_error(operation: &str, error: octocrab::Error) -> ApiError {
    match &error {
        octocrab::Error::GitHub { source, .. } => {
            classify_status(operation, source.status_code, &source.message)
        }
        _ => ApiError::Api(format!("{} failed: {}", operation, error)),
    }
}
