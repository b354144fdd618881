//! Typed errors for the capture pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure taxonomy. Every variant is terminal for the current run; none
//! is fatal to the process.

use thiserror::Error;

/// Extraction-stage failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The address does not denote a job-posting page. User-correctable.
    #[error("not a job posting page: {url}")]
    NotEligible { url: String },

    /// The document context could not be reached (DNS, refused connection,
    /// timeout, or a non-success status while fetching the page itself).
    #[error("document context unavailable: {0}")]
    ContextUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The context was reachable but produced no document to extract from.
    /// Distinct from an empty-but-well-formed record.
    #[error("extraction produced no result")]
    NoResult,
}

/// Transport-stage failures. The send either fully succeeds or fully fails;
/// there is no partial-success state and no retry.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote side answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Server { status: u16 },

    /// Transport-level fault before a status was obtained, or the success
    /// body was not valid JSON.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A failed pipeline run, as surfaced by the controller.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RunError {
    /// Operator-facing message for the Error status.
    ///
    /// Eligibility failures carry guidance; extraction-stage faults are
    /// reported generically; transport faults carry the remote status or the
    /// network detail.
    pub fn user_message(&self) -> String {
        match self {
            RunError::Extract(ExtractError::NotEligible { .. }) => {
                "Please navigate to a LinkedIn job posting first".to_string()
            }
            RunError::Extract(_) => {
                "Failed to extract job data. Make sure you're on a job posting page."
                    .to_string()
            }
            RunError::Transport(TransportError::Server { status }) => {
                format!("Server error: {status}")
            }
            RunError::Transport(TransportError::Network(detail)) => {
                format!("Network error: {detail}. Make sure the server is running.")
            }
        }
    }
}
