//! Lead-form environment.
//!
//! All external dependencies of the reducer are injected through this type,
//! keeping the reducer pure and the submission path swappable in tests.

use crate::error::SubmitError;
use crate::webhook::LeadSubmission;
use cultiva_core::environment::Clock;

/// Webhook submission client.
///
/// Abstracts the outbound POST so reducers stay pure and tests can record
/// submissions without a network.
pub trait WebhookClient: Send + Sync {
    /// Deliver one lead to the webhook.
    ///
    /// Implementations issue exactly one request per call: no retry, no
    /// cancellation, and no inspection of the response body.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Transport`] when the request cannot be
    /// completed and [`SubmitError::Status`] when the webhook answers with a
    /// non-success status.
    fn submit(
        &self,
        lead: &LeadSubmission,
    ) -> impl std::future::Future<Output = Result<(), SubmitError>> + Send;
}

/// Lead-form environment.
///
/// # Type Parameters
///
/// - `C`: Clock implementation
/// - `W`: Webhook submission client
#[derive(Debug, Clone)]
pub struct LeadFormEnvironment<C, W>
where
    C: Clock,
    W: WebhookClient + Clone,
{
    /// Clock used to timestamp operational log entries.
    pub clock: C,

    /// Webhook client delivering validated submissions.
    pub webhook: W,
}

impl<C, W> LeadFormEnvironment<C, W>
where
    C: Clock,
    W: WebhookClient + Clone,
{
    /// Create a new environment with the given clock and webhook client.
    #[must_use]
    pub const fn new(clock: C, webhook: W) -> Self {
        Self { clock, webhook }
    }
}
