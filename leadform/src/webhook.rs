//! Webhook submission client.
//!
//! One HTTP POST per accepted submission. Any 2xx answer is a success and
//! the response body is never read; everything else is a failure reported
//! back to the reducer.

use crate::config::WebhookConfig;
use crate::environment::WebhookClient;
use crate::error::SubmitError;
use crate::state::LeadFormFields;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// The payload delivered to the automation webhook.
///
/// A flat JSON object with the four field names unchanged; values go over
/// the wire exactly as entered, untrimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    /// Full name as entered
    pub name: String,
    /// Region or department as entered
    pub region: String,
    /// Freeform list of crops as entered
    pub crops: String,
    /// Phone or WhatsApp number as entered
    pub phone: String,
}

impl From<&LeadFormFields> for LeadSubmission {
    fn from(fields: &LeadFormFields) -> Self {
        Self {
            name: fields.name.clone(),
            region: fields.region.clone(),
            crops: fields.crops.clone(),
            phone: fields.phone.clone(),
        }
    }
}

/// Webhook client backed by `reqwest`.
///
/// No retry, no request timeout beyond the transport default, and no
/// authentication: the webhook is an open automation endpoint.
#[derive(Debug, Clone)]
pub struct HttpWebhookClient {
    client: Client,
    config: WebhookConfig,
}

impl HttpWebhookClient {
    /// Create a new client for the given endpoint configuration.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The endpoint this client delivers to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.config.url()
    }
}

impl WebhookClient for HttpWebhookClient {
    fn submit(
        &self,
        lead: &LeadSubmission,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send {
        async move {
            let response = self
                .client
                .post(self.config.url())
                .header("Content-Type", "application/json")
                .json(lead)
                .send()
                .await
                .map_err(|error| SubmitError::Transport(error.to_string()))?;

            let status = response.status();
            if status.is_success() {
                // The webhook may answer with a body; it is never inspected.
                tracing::debug!(%status, "webhook accepted lead");
                Ok(())
            } else {
                Err(SubmitError::Status {
                    status: status.as_u16(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_copies_raw_field_values() {
        let fields = LeadFormFields {
            name: " Juan Pérez ".to_string(),
            region: "Santa Cruz".to_string(),
            crops: "Papa, Maíz".to_string(),
            phone: "70 12 34 56".to_string(),
        };
        let lead = LeadSubmission::from(&fields);

        // Untrimmed, exactly as typed
        assert_eq!(lead.name, " Juan Pérez ");
        assert_eq!(lead.phone, "70 12 34 56");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn submission_serializes_as_flat_object() {
        let lead = LeadSubmission {
            name: "Juan Pérez".to_string(),
            region: "Santa Cruz".to_string(),
            crops: "Papa, Maíz".to_string(),
            phone: "70123456".to_string(),
        };

        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Juan Pérez",
                "region": "Santa Cruz",
                "crops": "Papa, Maíz",
                "phone": "70123456",
            })
        );
    }

    #[test]
    fn client_exposes_configured_endpoint() {
        let client = HttpWebhookClient::new(WebhookConfig::staging());
        assert!(client.endpoint().contains("webhook-test"));
    }
}
