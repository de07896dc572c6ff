//! Apifox client error types.

use apidoc_core::StructuralError;

/// Errors from documentation-service calls.
#[derive(Debug, thiserror::Error)]
pub enum ApifoxApiError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("Apifox {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not the expected JSON shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Response decoded as JSON but is not a well-formed resource.
    #[error("malformed resource from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        source: StructuralError,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ApifoxApiError {
    /// HTTP status reported by the service, if the failure was a status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same read could succeed: transport failures and
    /// 429/502/503/504. Everything else is deterministic.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::ApiError { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub(crate) fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let err = |status| ApifoxApiError::ApiError {
            endpoint: "GET /api-endpoints".into(),
            status,
            body: String::new(),
        };
        assert!(err(429).is_transient());
        assert!(err(503).is_transient());
        assert!(!err(400).is_transient());
        assert!(!err(500).is_transient());
        assert!(err(404).is_not_found());
    }
}
