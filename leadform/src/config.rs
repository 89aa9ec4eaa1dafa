//! Webhook endpoint configuration.
//!
//! The landing page delivers leads to one n8n automation webhook. The
//! staging endpoint (n8n's `webhook-test` path) exists alongside production,
//! and deployments pick one explicitly or override the URL through
//! [`WEBHOOK_URL_VAR`].

/// Production automation webhook.
const PRODUCTION_URL: &str = "https://n8n.cultiva.app/webhook/beta-leads";

/// Staging automation webhook (n8n test endpoint).
const STAGING_URL: &str = "https://n8n.cultiva.app/webhook-test/beta-leads";

/// Environment variable overriding the webhook URL.
pub const WEBHOOK_URL_VAR: &str = "CULTIVA_WEBHOOK_URL";

/// Endpoint configuration for the submission client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    url: String,
}

impl WebhookConfig {
    /// Configuration pointing at an explicit endpoint.
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self { url }
    }

    /// Configuration for the production webhook.
    #[must_use]
    pub fn production() -> Self {
        Self::new(PRODUCTION_URL.to_string())
    }

    /// Configuration for the staging webhook.
    #[must_use]
    pub fn staging() -> Self {
        Self::new(STAGING_URL.to_string())
    }

    /// Configuration from the environment.
    ///
    /// Reads [`WEBHOOK_URL_VAR`]; falls back to the production endpoint when
    /// the variable is unset or blank.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(WEBHOOK_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::production(),
        }
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self::production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_and_staging_are_distinct() {
        assert_ne!(WebhookConfig::production(), WebhookConfig::staging());
        assert!(WebhookConfig::staging().url().contains("webhook-test"));
    }

    #[test]
    fn default_is_production() {
        assert_eq!(WebhookConfig::default(), WebhookConfig::production());
    }

    #[test]
    fn explicit_url_is_kept_verbatim() {
        let config = WebhookConfig::new("http://127.0.0.1:9999/hook".to_string());
        assert_eq!(config.url(), "http://127.0.0.1:9999/hook");
    }
}
