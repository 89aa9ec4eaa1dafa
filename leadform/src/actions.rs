//! Actions processed by the lead-form reducer.

use crate::state::{Field, SubmissionOutcome};

/// All inputs to the lead-form reducer: user intents and effect results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadFormAction {
    /// The user edited one input.
    ///
    /// The value is stored verbatim; a stale error on the edited field is
    /// cleared without re-validating anything.
    FieldChanged {
        /// The edited field
        field: Field,
        /// The new raw value
        value: String,
    },

    /// The user asked to submit the form.
    ///
    /// Runs a full validation pass; only an error-free snapshot dispatches
    /// the webhook request.
    SubmitTapped,

    /// The webhook submission finished (fed back by the submission effect).
    SubmissionFinished {
        /// Result of the attempt
        outcome: SubmissionOutcome,
    },
}
