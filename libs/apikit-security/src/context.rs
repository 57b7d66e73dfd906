use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::user::UserInfo;

/// Why a guarded future did not run to completion.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// `RequestContext` carries everything that is scoped to one inbound request:
/// the authenticated caller, the cancellation signal and the deadline.
///
/// It is passed explicitly to every storage operation and must not outlive
/// the request it was built for.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user: Option<UserInfo>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// A context without a caller. Operations that need an identity reject it.
    #[must_use]
    pub fn anonymous() -> Self {
        RequestContextBuilder::default().build()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Copy of this context whose deadline is at most `timeout` from now.
    ///
    /// An earlier deadline already present is kept. Cancellation is shared
    /// with the original context. A timeout too large to represent adds no
    /// bound.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(bound) => Some(self.deadline.map_or(bound, |d| d.min(bound))),
            None => self.deadline,
        };
        Self {
            user: self.user.clone(),
            cancellation: self.cancellation.clone(),
            deadline,
        }
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes. On interruption `fut` is dropped before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted::Cancelled`] or [`Interrupted::DeadlineExceeded`]
    /// when the future was abandoned.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        if self.cancellation.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancellation.cancelled() => Err(Interrupted::Cancelled),
                out = fut => Ok(out),
            }
        };

        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(Interrupted::DeadlineExceeded),
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(Interrupted::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}

#[derive(Default)]
pub struct RequestContextBuilder {
    user: Option<UserInfo>,
    cancellation: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RequestContextBuilder {
    #[must_use]
    pub fn user(mut self, user: UserInfo) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now; a timeout too large to represent sets
    /// no deadline.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            user: self.user,
            cancellation: self.cancellation.unwrap_or_default(),
            deadline: self.deadline,
        }
    }
}
