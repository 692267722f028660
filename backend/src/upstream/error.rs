//! Error types for upstream feed fetches.
//!
//! Every failure carries an [`ErrorContext`] naming the feed and URL involved
//! and whether a retry may succeed. The retry loop in
//! [`crate::upstream::webhook`] only consults [`UpstreamError::is_retryable`].

use std::fmt;

use crate::ingest::Feed;

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Where and why a fetch failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    pub feed: Option<Feed>,
    pub url: Option<String>,
    pub details: Option<String>,
    pub retryable: bool,
    /// Attempts made before giving up; 0 when not tracked.
    pub attempts: u32,
}

impl ErrorContext {
    pub fn for_feed(feed: Feed) -> Self {
        Self {
            feed: Some(feed),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(feed) = self.feed {
            parts.push(format!("feed={}", feed));
        }
        if let Some(ref url) = self.url {
            parts.push(format!("url={}", url));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        if self.attempts > 0 {
            parts.push(format!("attempts={}", self.attempts));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection refused, reset, DNS failure.
    #[error("Transport error: {message} {context}")]
    Transport {
        message: String,
        context: ErrorContext,
    },

    /// The endpoint answered with a non-success status.
    #[error("Upstream returned HTTP {status} {context}")]
    Status { status: u16, context: ErrorContext },

    /// The body was not JSON.
    #[error("Decode error: {message} {context}")]
    Decode {
        message: String,
        context: ErrorContext,
    },

    #[error("Timed out: {message} {context}")]
    Timeout {
        message: String,
        context: ErrorContext,
    },

    /// Bad URL, unreadable fixture, client construction failure.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

impl UpstreamError {
    pub fn transport(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Transport {
            message: message.into(),
            context: context.retryable(),
        }
    }

    /// 5xx and 429 are retryable; other statuses are not.
    pub fn status(status: u16, context: ErrorContext) -> Self {
        let context = if status >= 500 || status == 429 {
            context.retryable()
        } else {
            context
        };
        Self::Status { status, context }
    }

    pub fn decode(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Decode {
            message: message.into(),
            context,
        }
    }

    pub fn timeout(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Timeout {
            message: message.into(),
            context: context.retryable(),
        }
    }

    pub fn configuration(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    /// Classify a reqwest failure.
    pub fn from_reqwest(err: reqwest::Error, context: ErrorContext) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string(), context)
        } else if err.is_decode() {
            Self::decode(err.to_string(), context)
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16(), context)
        } else if err.is_builder() {
            Self::configuration(err.to_string(), context)
        } else {
            Self::transport(err.to_string(), context)
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Transport { context, .. }
            | Self::Status { context, .. }
            | Self::Decode { context, .. }
            | Self::Timeout { context, .. }
            | Self::Configuration { context, .. } => context,
        }
    }

    /// Record how many attempts were made.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        match &mut self {
            Self::Transport { context, .. }
            | Self::Status { context, .. }
            | Self::Decode { context, .. }
            | Self::Timeout { context, .. }
            | Self::Configuration { context, .. } => context.attempts = attempts,
        }
        self
    }
}
