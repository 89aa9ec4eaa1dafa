//! # Cultiva Lead Form
//!
//! The lead-capture feature for the Cultiva beta landing page (the mobile
//! app that diagnoses crop diseases from photos and connects farmers with
//! agricultural suppliers).
//!
//! The landing page itself is presentational; this crate owns the one piece
//! with a behavioral contract: the signup form that collects a prospective
//! beta tester's contact details and delivers them to the automation
//! webhook.
//!
//! ## Architecture
//!
//! The form is a small state machine driven through a reducer:
//!
//! - [`LeadFormState`] holds the field values, the per-field error map, and
//!   the form phase (`Editing`, `Submitting`, `Submitted`).
//! - [`LeadFormAction`] carries user intents (`FieldChanged`, `SubmitTapped`)
//!   and effect results (`SubmissionFinished`).
//! - [`LeadFormReducer`] validates snapshots, transitions phases, and
//!   describes the webhook POST as an effect.
//! - [`HttpWebhookClient`] performs the single outbound request.
//!
//! The presentation shell owns a `Store` over this reducer, renders
//! read-only state snapshots, and observes `SubmissionFinished` through the
//! store's action broadcast to switch to the confirmation view.
//!
//! ## Example
//!
//! ```no_run
//! use cultiva_leadform::{
//!     Field, HttpWebhookClient, LeadFormAction, LeadFormEnvironment, LeadFormReducer,
//!     LeadFormState, WebhookConfig,
//! };
//! use cultiva_runtime::Store;
//! use cultiva_testing::test_clock;
//!
//! # async fn example() -> Result<(), cultiva_runtime::StoreError> {
//! let env = LeadFormEnvironment::new(
//!     test_clock(),
//!     HttpWebhookClient::new(WebhookConfig::from_env()),
//! );
//! let store = Store::new(LeadFormState::default(), LeadFormReducer::new(), env);
//!
//! store
//!     .send(LeadFormAction::FieldChanged {
//!         field: Field::Name,
//!         value: "Juan Pérez".to_string(),
//!     })
//!     .await?;
//! store.send(LeadFormAction::SubmitTapped).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod reducer;
pub mod state;
pub mod validate;
pub mod webhook;

pub use actions::LeadFormAction;
pub use config::WebhookConfig;
pub use environment::{LeadFormEnvironment, WebhookClient};
pub use error::SubmitError;
pub use reducer::LeadFormReducer;
pub use state::{Field, FieldErrors, FormPhase, LeadFormFields, LeadFormState, SubmissionOutcome};
pub use webhook::{HttpWebhookClient, LeadSubmission};
