use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network error or timeout before a response arrived.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{endpoint} request rejected with status {status}: {body}")]
    Rejected {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Response body could not be mapped onto the expected shape.
    #[error("{endpoint} returned malformed data: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub(crate) fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { endpoint, timed_out: source.is_timeout(), source }
    }

    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed { endpoint, reason: reason.into() }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
