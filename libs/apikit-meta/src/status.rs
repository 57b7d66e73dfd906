use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOutcome {
    Success,
    Failure,
}

/// Machine-readable classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusReason {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    AlreadyExists,
    Conflict,
    Gone,
    Invalid,
    MethodNotAllowed,
    TooManyRequests,
    Expired,
    /// The caller went away before the request completed.
    Cancelled,
    ServerTimeout,
    Timeout,
    InternalError,
    ServiceUnavailable,
    Unknown,
}

impl StatusReason {
    /// HTTP status code conventionally paired with this reason.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::AlreadyExists | Self::Conflict => 409,
            Self::Gone | Self::Expired => 410,
            Self::Invalid => 422,
            Self::TooManyRequests => 429,
            Self::Cancelled => 499,
            Self::InternalError | Self::Unknown => 500,
            Self::ServiceUnavailable => 503,
            Self::ServerTimeout | Self::Timeout => 504,
        }
    }

    /// Whether a client may reasonably retry the same request.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::TooManyRequests | Self::ServerTimeout | Self::Timeout | Self::ServiceUnavailable
        )
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Extra information about the object a status refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u32>,
}

/// API status object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub status: StatusOutcome,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StatusDetails>,
}

impl Status {
    /// Generic success marker.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: StatusOutcome::Success,
            code: 200,
            reason: None,
            message: String::new(),
            details: None,
        }
    }

    /// Failure with the conventional code for `reason`.
    #[must_use]
    pub fn failure(reason: StatusReason, message: impl Into<String>) -> Self {
        Self {
            status: StatusOutcome::Failure,
            code: reason.code(),
            reason: Some(reason),
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: StatusDetails) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StatusOutcome::Success
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn success_marker_has_no_reason() {
        let status = Status::success();
        assert!(status.is_success());
        assert_eq!(status.code, 200);
        assert_eq!(status.reason, None);
    }

    #[test]
    fn failure_uses_conventional_code() {
        let status = Status::failure(StatusReason::NotFound, "gone");
        assert!(!status.is_success());
        assert_eq!(status.code, 404);

        assert_eq!(Status::failure(StatusReason::Conflict, "").code, 409);
        assert_eq!(Status::failure(StatusReason::Timeout, "").code, 504);
    }

    #[test]
    fn only_transient_reasons_are_retryable() {
        assert!(StatusReason::ServiceUnavailable.is_retryable());
        assert!(StatusReason::TooManyRequests.is_retryable());
        assert!(!StatusReason::NotFound.is_retryable());
        assert!(!StatusReason::Conflict.is_retryable());
        assert!(!StatusReason::Forbidden.is_retryable());
    }
}
