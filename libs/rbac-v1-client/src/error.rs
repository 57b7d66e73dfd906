//! Errors returned by the native API.

use apikit_meta::{Status, StatusDetails, StatusReason};
use thiserror::Error;

use crate::models::{GROUP_NAME, RESOURCE};

/// A failed native call, classified the way the native API classified it.
///
/// The classification is kept intact so callers further up can tell
/// retryable conditions from terminal ones.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub reason: StatusReason,
    pub code: u16,
    pub message: String,
    pub details: Option<StatusDetails>,
}

impl ApiError {
    #[must_use]
    pub fn new(reason: StatusReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            code: reason.code(),
            message: message.into(),
            details: None,
        }
    }

    fn for_binding(reason: StatusReason, name: &str, message: String) -> Self {
        Self {
            details: Some(StatusDetails {
                name: Some(name.to_owned()),
                group: Some(GROUP_NAME.to_owned()),
                kind: Some(RESOURCE.to_owned()),
                retry_after_seconds: None,
            }),
            ..Self::new(reason, message)
        }
    }

    #[must_use]
    pub fn not_found(name: &str) -> Self {
        Self::for_binding(
            StatusReason::NotFound,
            name,
            format!("{RESOURCE}.{GROUP_NAME} \"{name}\" not found"),
        )
    }

    #[must_use]
    pub fn already_exists(name: &str) -> Self {
        Self::for_binding(
            StatusReason::AlreadyExists,
            name,
            format!("{RESOURCE}.{GROUP_NAME} \"{name}\" already exists"),
        )
    }

    #[must_use]
    pub fn conflict(name: &str, reason: &str) -> Self {
        Self::for_binding(
            StatusReason::Conflict,
            name,
            format!(
                "Operation cannot be fulfilled on {RESOURCE}.{GROUP_NAME} \"{name}\": {reason}"
            ),
        )
    }

    #[must_use]
    pub fn forbidden(user: &str, verb: &str, name: Option<&str>) -> Self {
        let target = name.map_or_else(String::new, |n| format!(" \"{n}\""));
        let message = format!(
            "{RESOURCE}.{GROUP_NAME}{target} is forbidden: User \"{user}\" cannot {verb} resource \"{RESOURCE}\" in API group \"{GROUP_NAME}\" at the cluster scope"
        );
        match name {
            Some(n) => Self::for_binding(StatusReason::Forbidden, n, message),
            None => Self::new(StatusReason::Forbidden, message),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.reason == StatusReason::NotFound
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.reason == StatusReason::Conflict
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.reason.is_retryable()
    }

    /// The status object the native API sent for this error.
    #[must_use]
    pub fn to_status(&self) -> Status {
        Status {
            code: self.code,
            details: self.details.clone(),
            ..Status::failure(self.reason, self.message.clone())
        }
    }
}

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        let reason = status.reason.unwrap_or(StatusReason::Unknown);
        Self {
            reason,
            code: status.code,
            message: status.message,
            details: status.details,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_details() {
        let err = ApiError::not_found("admins");

        assert!(err.is_not_found());
        assert_eq!(err.code, 404);
        assert_eq!(
            err.to_string(),
            "clusterrolebindings.rbac.authorization.k8s.io \"admins\" not found"
        );
        let details = err.details.unwrap();
        assert_eq!(details.name.as_deref(), Some("admins"));
        assert_eq!(details.kind.as_deref(), Some("clusterrolebindings"));
    }

    #[test]
    fn status_round_trip_keeps_code() {
        let status = Status {
            code: 503,
            ..Status::failure(StatusReason::ServiceUnavailable, "etcd leader changed")
        };

        let err = ApiError::from(status.clone());

        assert!(err.is_retryable());
        assert_eq!(err.to_status(), status);
    }

    #[test]
    fn missing_reason_becomes_unknown() {
        let status = Status {
            reason: None,
            ..Status::failure(StatusReason::InternalError, "boom")
        };
        assert_eq!(ApiError::from(status).reason, StatusReason::Unknown);
    }
}
