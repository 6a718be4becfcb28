use thiserror::Error;

use super::ErrorClass;

/// Errors raised by the transport itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with an error status.
    #[error("Request failed with {status_code} {status_message}")]
    Status {
        status_code: u16,
        status_message: String,
        message: Option<String>,
    },
    /// No usable response was received (connection, timeout, decoding).
    #[error("Network error: {0}")]
    Network(String),
}

impl TransportError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status_code, .. } => Some(*status_code),
            TransportError::Network(_) => None,
        }
    }

    /// Returns the detailed message when present, otherwise the status message.
    pub fn message(&self) -> &str {
        match self {
            TransportError::Status {
                message: Some(message),
                ..
            } => message,
            TransportError::Status { status_message, .. } => status_message,
            TransportError::Network(message) => message,
        }
    }
}

/// Errors that can occur during resource operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },
    #[error("Failed to list {resource} ({status}): {message}")]
    ListFailed {
        resource: String,
        status: u16,
        message: String,
    },
    #[error("Failed to fetch {resource} ({status}): {message}")]
    FetchFailed {
        resource: String,
        status: u16,
        message: String,
    },
    #[error("Failed to create {resource} ({status}): {message}")]
    CreateFailed {
        resource: String,
        status: u16,
        message: String,
    },
    #[error("Failed to update {resource} ({status}): {message}")]
    UpdateFailed {
        resource: String,
        status: u16,
        message: String,
    },
    #[error("Failed to delete {resource} ({status}): {message}")]
    DeleteFailed {
        resource: String,
        status: u16,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
    #[error("{source} (after {attempts} attempt(s))")]
    Rejected {
        attempts: u32,
        source: Box<ResourceError>,
    },
    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: Box<ResourceError>,
    },
}

impl ResourceError {
    /// Wraps an error that carries no status code.
    pub fn unexpected(error: &ResourceError) -> Self {
        ResourceError::Unexpected {
            message: error.to_string(),
        }
    }

    /// Returns the HTTP status this error stands for.
    ///
    /// `Unexpected` reports 500. Serialization and network failures have no
    /// status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResourceError::NotFound { .. } => Some(404),
            ResourceError::ListFailed { status, .. }
            | ResourceError::FetchFailed { status, .. }
            | ResourceError::CreateFailed { status, .. }
            | ResourceError::UpdateFailed { status, .. }
            | ResourceError::DeleteFailed { status, .. } => Some(*status),
            ResourceError::Transport(error) => error.status_code(),
            ResourceError::Serialization(_) => None,
            ResourceError::Unexpected { .. } => Some(500),
            ResourceError::Rejected { source, .. }
            | ResourceError::RetriesExhausted { source, .. } => source.status_code(),
        }
    }

    /// Classifies the error for retry purposes. `None` when there is no status.
    pub fn classify(&self) -> Option<ErrorClass> {
        self.status_code().map(ErrorClass::from_status)
    }

    /// Strips attempt annotations added by the resilience layer.
    pub fn root_cause(&self) -> &ResourceError {
        match self {
            ResourceError::Rejected { source, .. }
            | ResourceError::RetriesExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Number of attempts made, when the error went through the resilience layer.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ResourceError::Rejected { attempts, .. }
            | ResourceError::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), ResourceError::NotFound { .. })
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(error: serde_json::Error) -> Self {
        ResourceError::Serialization(error.to_string())
    }
}

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn service_unavailable() -> ResourceError {
        ResourceError::FetchFailed {
            resource: "patients".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }

    #[test]
    fn test_not_found_display() {
        let error = ResourceError::NotFound {
            resource: "patients".to_string(),
            id: "p-1".to_string(),
        };
        assert_eq!(error.to_string(), "patients not found: p-1");
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_failed_variants_carry_status() {
        let error = ResourceError::UpdateFailed {
            resource: "trials".to_string(),
            status: 409,
            message: "Version conflict".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to update trials (409): Version conflict"
        );
        assert_eq!(error.classify(), Some(ErrorClass::Terminal));
    }

    #[test]
    fn test_transport_error_passes_through() {
        let error: ResourceError = TransportError::Status {
            status_code: 502,
            status_message: "Bad Gateway".to_string(),
            message: None,
        }
        .into();
        assert_eq!(error.to_string(), "Request failed with 502 Bad Gateway");
        assert_eq!(error.classify(), Some(ErrorClass::Retryable));
    }

    #[test]
    fn test_network_error_has_no_status() {
        let error = ResourceError::Transport(TransportError::Network("refused".to_string()));
        assert_eq!(error.status_code(), None);
        assert_eq!(error.classify(), None);
    }

    #[test]
    fn test_unexpected_reports_500() {
        let error = ResourceError::unexpected(&ResourceError::Serialization("bad".to_string()));
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(error.to_string(), "Unexpected error: Serialization error: bad");
    }

    #[test]
    fn test_annotations_keep_root_cause() {
        let error = ResourceError::RetriesExhausted {
            attempts: 3,
            source: Box::new(service_unavailable()),
        };
        assert_eq!(error.attempts(), Some(3));
        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.root_cause(), &service_unavailable());
        assert_eq!(
            error.to_string(),
            "Retries exhausted after 3 attempts: Failed to fetch patients (503): Service Unavailable"
        );
    }

    #[test]
    fn test_is_not_found_looks_through_rejection() {
        let error = ResourceError::Rejected {
            attempts: 1,
            source: Box::new(ResourceError::NotFound {
                resource: "sites".to_string(),
                id: "s-9".to_string(),
            }),
        };
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "sites not found: s-9 (after 1 attempt(s))");
    }

    #[test]
    fn test_transport_error_message_prefers_detail() {
        let error = TransportError::Status {
            status_code: 422,
            status_message: "Unprocessable Entity".to_string(),
            message: Some("name is required".to_string()),
        };
        assert_eq!(error.message(), "name is required");
    }
}
