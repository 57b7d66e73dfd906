//! Error types for cluster role binding storage.

use std::fmt;

use apikit_meta::{Status, StatusReason};
use apikit_security::Interrupted;
use rbac_v1_client::ApiError;
use thiserror::Error;

/// Which way a failed translation was going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Caller input on its way to the native API.
    ToNative,
    /// A native response on its way back to the caller.
    ToExternal,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToNative => f.write_str("to native"),
            Self::ToExternal => f.write_str("to external"),
        }
    }
}

/// An object shape one schema cannot represent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("subject {name:?} has unsupported kind {kind:?}")]
    UnsupportedSubjectKind { kind: String, name: String },

    #[error("service account subject {name:?} has no namespace")]
    MissingNamespace { name: String },

    #[error("subject {name:?} of kind {kind:?} has unexpected api group {api_group:?}")]
    UnexpectedApiGroup {
        kind: String,
        name: String,
        api_group: String,
    },

    #[error(
        "reference {name:?} of kind {kind:?} has unsupported api version {api_version:?}, expected {expected:?}"
    )]
    UnsupportedApiVersion {
        kind: String,
        name: String,
        api_version: String,
        expected: String,
    },

    /// `SystemUser` and `SystemGroup` names carry the `system:` prefix; plain
    /// users and groups must not.
    #[error("subject {name:?} of kind {kind:?} does not match its system: prefix")]
    SystemPrefixMismatch { kind: String, name: String },

    /// Cluster role bindings may only reference cluster roles.
    #[error("role reference {name:?} must not have a namespace, got {namespace:?}")]
    NamespacedRoleRef { name: String, namespace: String },

    #[error("role reference {name:?} has unsupported kind {kind:?}")]
    UnsupportedRoleRefKind { kind: String, name: String },
}

/// Errors returned by cluster role binding storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterRoleBindingError {
    /// No usable caller identity in the request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Request options the native API has no equivalent for.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot convert cluster role binding {direction}: {source}")]
    Translation {
        direction: Direction,
        #[source]
        source: TranslationError,
    },

    /// Error returned by the native API, passed through as is.
    #[error(transparent)]
    Native(#[from] ApiError),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ClusterRoleBindingError {
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    #[must_use]
    pub fn to_native(source: TranslationError) -> Self {
        Self::Translation {
            direction: Direction::ToNative,
            source,
        }
    }

    #[must_use]
    pub fn to_external(source: TranslationError) -> Self {
        Self::Translation {
            direction: Direction::ToExternal,
            source,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Native(e) if e.is_not_found())
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Native(e) if e.is_conflict())
    }

    /// Whether the same request may succeed if sent again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Native(e) => e.is_retryable(),
            Self::DeadlineExceeded => true,
            _ => false,
        }
    }

    /// Status object to send to the caller.
    ///
    /// Native errors keep the native code, reason and details.
    #[must_use]
    pub fn to_status(&self) -> Status {
        let reason = match self {
            Self::Native(e) => return e.to_status(),
            Self::Unauthorized(_) => StatusReason::Unauthorized,
            Self::InvalidArgument(_)
            | Self::Translation {
                direction: Direction::ToNative,
                ..
            } => StatusReason::BadRequest,
            Self::Translation {
                direction: Direction::ToExternal,
                ..
            }
            | Self::Internal(_) => StatusReason::InternalError,
            Self::Cancelled => StatusReason::Cancelled,
            Self::DeadlineExceeded => StatusReason::Timeout,
        };
        Status::failure(reason, self.to_string())
    }
}

impl From<Interrupted> for ClusterRoleBindingError {
    fn from(value: Interrupted) -> Self {
        match value {
            Interrupted::Cancelled => Self::Cancelled,
            Interrupted::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}
