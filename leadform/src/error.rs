//! Error types for lead submission.

use thiserror::Error;

/// Failure modes of the webhook submission client.
///
/// Submission failures never reach the form UI: the reducer logs them and
/// returns the form to the editing phase with the entered values intact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The request could not be completed at the transport level
    /// (DNS resolution, connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The webhook answered with a non-success status.
    #[error("webhook rejected submission with status {status}")]
    Status {
        /// HTTP status code returned by the webhook
        status: u16,
    },
}
