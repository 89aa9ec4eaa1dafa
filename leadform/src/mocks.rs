//! Test doubles for the lead-form environment.

use crate::environment::WebhookClient;
use crate::error::SubmitError;
use crate::webhook::LeadSubmission;
use std::sync::{Arc, Mutex};

/// Recording webhook client with a programmable outcome.
///
/// Every submission is recorded before the configured outcome is returned,
/// so tests can assert both on the exact payloads delivered and on the
/// reducer's handling of success and failure.
#[derive(Debug, Clone, Default)]
pub struct MockWebhookClient {
    submissions: Arc<Mutex<Vec<LeadSubmission>>>,
    failure: Arc<Mutex<Option<SubmitError>>>,
}

impl MockWebhookClient {
    /// Create a mock that accepts every submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every submission with the given error.
    #[must_use]
    pub fn failing(error: SubmitError) -> Self {
        let mock = Self::default();
        mock.set_failure(Some(error));
        mock
    }

    /// Program the outcome for subsequent submissions.
    ///
    /// `None` makes the mock accept; `Some(error)` makes it fail.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    pub fn set_failure(&self, error: Option<SubmitError>) {
        *self.failure.lock().unwrap() = error;
    }

    /// All submissions recorded so far, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    #[must_use]
    pub fn submissions(&self) -> Vec<LeadSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Number of submissions recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

impl WebhookClient for MockWebhookClient {
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), SubmitError> {
        self.submissions.lock().unwrap().push(lead.clone());

        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_submissions_in_order() {
        let mock = MockWebhookClient::new();
        let lead = LeadSubmission {
            name: "Juan".to_string(),
            region: "Beni".to_string(),
            crops: "Arroz".to_string(),
            phone: "70123456".to_string(),
        };

        assert!(mock.submit(&lead).await.is_ok());
        assert_eq!(mock.submissions(), vec![lead]);
    }

    #[tokio::test]
    async fn programmed_failure_is_returned_after_recording() {
        let mock = MockWebhookClient::failing(SubmitError::Status { status: 500 });
        let lead = LeadSubmission {
            name: "Juan".to_string(),
            region: "Beni".to_string(),
            crops: "Arroz".to_string(),
            phone: "70123456".to_string(),
        };

        let result = mock.submit(&lead).await;
        assert_eq!(result, Err(SubmitError::Status { status: 500 }));
        assert_eq!(mock.submission_count(), 1);
    }
}
