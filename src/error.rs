use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    #[error("{url} responded with status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("Content length {actual} exceeds the limit of {limit} bytes")]
    ContentLengthExceeded { limit: u64, actual: u64 },

    #[error("Response from {0} has no content-length header")]
    ContentLengthRequired(String),

    #[error("Rejected by content type: {0}")]
    InvalidContentType(String),

    #[error("External service error: {service} - {message}")]
    ExternalServiceError { service: String, message: String },

    #[error("Invalid agent configuration: {0}")]
    InvalidAgent(String),

    #[error("failed summarize {0}")]
    SummarizationFailed(String),
}

impl SummaryError {
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SummaryError::Timeout {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            SummaryError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Stable short name of the failure kind, reported as `name` by the HTTP front-end.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::UrlParseError(_) => "UrlParseError",
            SummaryError::Transport { .. } => "TransportError",
            SummaryError::Timeout { .. } => "TimeoutError",
            SummaryError::BadStatus { .. } => "StatusError",
            SummaryError::ContentLengthExceeded { .. } => "ContentLengthExceeded",
            SummaryError::ContentLengthRequired(_) => "ContentLengthRequired",
            SummaryError::InvalidContentType(_) => "InvalidContentType",
            SummaryError::ExternalServiceError { .. } => "ExternalServiceError",
            SummaryError::InvalidAgent(_) => "InvalidAgent",
            SummaryError::SummarizationFailed(_) => "SummarizationFailed",
        }
    }

    /// Only bad-status failures are worth retrying against a mirror origin.
    pub fn is_bad_status(&self) -> bool {
        matches!(self, SummaryError::BadStatus { .. })
    }

    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            SummaryError::ContentLengthExceeded { .. } | SummaryError::ContentLengthRequired(_)
        )
    }

    pub fn log(&self) {
        match self {
            SummaryError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            SummaryError::Transport { url, message } => {
                error!(url = %url, error = %message, "Content fetch failed");
            }
            SummaryError::Timeout { url, message } => {
                warn!(url = %url, error = %message, "Request timed out");
            }
            SummaryError::BadStatus { url, status } => {
                warn!(url = %url, status = status, "Unexpected response status");
            }
            SummaryError::ContentLengthExceeded { limit, actual } => {
                warn!(limit = limit, actual = actual, "Content length limit exceeded");
            }
            SummaryError::ContentLengthRequired(url) => {
                warn!(url = %url, "Content length header missing");
            }
            SummaryError::InvalidContentType(e) => {
                warn!(error = %e, "Invalid content type received");
            }
            SummaryError::ExternalServiceError { service, message } => {
                error!(
                    service = %service,
                    error = %message,
                    "External service error occurred"
                );
            }
            SummaryError::InvalidAgent(e) => {
                error!(error = %e, "HTTP client could not be built");
            }
            SummaryError::SummarizationFailed(url) => {
                error!(url = %url, "Failed to summarize URL - summary is null");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_is_distinct_from_transport() {
        let bad = SummaryError::BadStatus {
            url: "https://example.com".into(),
            status: 503,
        };
        let transport = SummaryError::Transport {
            url: "https://example.com".into(),
            message: "connection refused".into(),
        };

        assert!(bad.is_bad_status());
        assert!(!transport.is_bad_status());
        assert_eq!(bad.kind(), "StatusError");
        assert_eq!(transport.kind(), "TransportError");
    }

    #[test]
    fn test_resource_limit_kinds() {
        assert!(SummaryError::ContentLengthExceeded { limit: 1, actual: 2 }.is_resource_limit());
        assert!(SummaryError::ContentLengthRequired("https://example.com".into()).is_resource_limit());
        assert!(!SummaryError::SummarizationFailed("https://example.com".into()).is_resource_limit());
    }
}
