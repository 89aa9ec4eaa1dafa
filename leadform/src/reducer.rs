//! The lead-form reducer.
//!
//! State machine:
//!
//! ```text
//! Editing ──FieldChanged──────────────▶ Editing
//! Editing ──SubmitTapped (invalid)────▶ Editing    (errors displayed)
//! Editing ──SubmitTapped (valid)──────▶ Submitting (one POST dispatched)
//! Submitting ──Finished(Success)──────▶ Submitted  (fields reset)
//! Submitting ──Finished(Failure)──────▶ Editing    (values kept, failure logged)
//! ```
//!
//! A second `SubmitTapped` while a request is in flight dispatches a second
//! request; nothing serializes submissions against each other.

use crate::actions::LeadFormAction;
use crate::environment::{LeadFormEnvironment, WebhookClient};
use crate::state::{FieldErrors, FormPhase, LeadFormState, SubmissionOutcome};
use crate::validate;
use crate::webhook::LeadSubmission;
use cultiva_core::effect::Effect;
use cultiva_core::environment::Clock;
use cultiva_core::reducer::Reducer;
use cultiva_core::{SmallVec, smallvec};

/// Reducer for the lead-capture form.
///
/// Generic over the clock and webhook client so tests can inject doubles.
#[derive(Debug, Clone, Copy)]
pub struct LeadFormReducer<C, W> {
    _phantom: std::marker::PhantomData<(C, W)>,
}

impl<C, W> LeadFormReducer<C, W> {
    /// Create a new lead-form reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C, W> Default for LeadFormReducer<C, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, W> Reducer for LeadFormReducer<C, W>
where
    C: Clock,
    W: WebhookClient + Clone + 'static,
{
    type State = LeadFormState;
    type Action = LeadFormAction;
    type Environment = LeadFormEnvironment<C, W>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (state.phase, action) {
            // Typing stores the value verbatim and optimistically clears the
            // stale error marker on that field alone.
            (_, LeadFormAction::FieldChanged { field, value }) => {
                state.fields.set(field, value);
                state.errors.clear(field);
                smallvec![Effect::None]
            },

            // The confirmation view has no form; a stray submit is ignored.
            (FormPhase::Submitted, LeadFormAction::SubmitTapped) => smallvec![Effect::None],

            (_, LeadFormAction::SubmitTapped) => {
                let errors = validate::validate(&state.fields);
                if !errors.is_empty() {
                    tracing::debug!(invalid_fields = errors.len(), "submission blocked by validation");
                    state.errors = errors;
                    state.phase = FormPhase::Editing;
                    return smallvec![Effect::None];
                }

                state.phase = FormPhase::Submitting;

                let webhook = env.webhook.clone();
                let lead = LeadSubmission::from(&state.fields);

                smallvec![Effect::Future(Box::pin(async move {
                    let outcome = match webhook.submit(&lead).await {
                        Ok(()) => SubmissionOutcome::Success,
                        Err(error) => SubmissionOutcome::Failure(error),
                    };
                    Some(LeadFormAction::SubmissionFinished { outcome })
                }))]
            },

            (
                _,
                LeadFormAction::SubmissionFinished {
                    outcome: SubmissionOutcome::Success,
                },
            ) => {
                state.fields.reset();
                state.errors = FieldErrors::new();
                state.phase = FormPhase::Submitted;
                smallvec![Effect::None]
            },

            (
                _,
                LeadFormAction::SubmissionFinished {
                    outcome: SubmissionOutcome::Failure(error),
                },
            ) => {
                // Operational log only: the form shows nothing and keeps the
                // entered values for a manual resubmit.
                tracing::error!(error = %error, at = %env.clock.now(), "lead submission failed");
                state.phase = FormPhase::Editing;
                smallvec![Effect::None]
            },
        }
    }
}
