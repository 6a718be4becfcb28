//! Pure functions for classifying HTTP statuses.
//!
//! Following the Functional Core pattern, nothing here performs I/O; the
//! resilience layer calls these to decide whether a failure is worth
//! another attempt.

/// Retry classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Server-side failure (5xx) or rate limiting (429).
    Retryable,
    /// Any other status, including every 4xx except 429.
    Terminal,
}

impl ErrorClass {
    /// Maps a status code to its class:
    ///
    /// - `429` -> `Retryable`
    /// - `500..=599` -> `Retryable`
    /// - anything else -> `Terminal`
    ///
    /// # Examples
    ///
    /// ```
    /// use trialsync_core::resource::ErrorClass;
    ///
    /// assert_eq!(ErrorClass::from_status(503), ErrorClass::Retryable);
    /// assert_eq!(ErrorClass::from_status(429), ErrorClass::Retryable);
    /// assert_eq!(ErrorClass::from_status(400), ErrorClass::Terminal);
    /// ```
    pub fn from_status(status: u16) -> Self {
        match status {
            429 | 500..=599 => ErrorClass::Retryable,
            _ => ErrorClass::Terminal,
        }
    }

    pub fn is_retryable(self) -> bool {
        self == ErrorClass::Retryable
    }
}

/// Returns the canonical reason phrase for the statuses the API uses.
pub fn canonical_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
