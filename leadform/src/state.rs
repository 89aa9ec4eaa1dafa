//! Lead-form state types.
//!
//! All types are `Clone` to support the functional architecture pattern:
//! the presentation shell only ever sees snapshots.

use crate::error::SubmitError;
use std::collections::BTreeMap;

/// One named, independently validated input of the lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Full name of the prospective tester
    Name,
    /// Region or department where they farm
    Region,
    /// Freeform list of crops they manage
    Crops,
    /// Phone or WhatsApp number
    Phone,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Region, Self::Crops, Self::Phone];

    /// The field's wire name, as used in the webhook payload.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Region => "region",
            Self::Crops => "crops",
            Self::Phone => "phone",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four text inputs of the lead-capture form.
///
/// Values are stored verbatim as entered; trimming happens only inside the
/// validator, and the webhook receives the values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFormFields {
    /// Full name
    pub name: String,
    /// Region or department
    pub region: String,
    /// Crops managed, as one freeform string
    pub crops: String,
    /// Phone or WhatsApp number
    pub phone: String,
}

impl LeadFormFields {
    /// Current value of one field.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Region => &self.region,
            Field::Crops => &self.crops,
            Field::Phone => &self.phone,
        }
    }

    /// Overwrite one field with a raw input value.
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Region => self.region = value,
            Field::Crops => self.crops = value,
            Field::Phone => self.phone = value,
        }
    }

    /// Reset all four fields to empty, after an accepted submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-field validation errors.
///
/// A key is present only while its field is invalid: the validator inserts
/// entries for failing fields, and any edit to a field removes that field's
/// entry without re-validating. Iteration order is form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Create an empty error map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record an error message for a field.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Remove a field's error, if present. Other fields are untouched.
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    /// The message recorded for a field, if it is currently invalid.
    #[must_use]
    pub fn message(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether a field currently has an error.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether every field is currently free of errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields currently invalid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Phase of the form's lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// The user is filling in fields; errors may be displayed inline.
    #[default]
    Editing,
    /// A submission request is in flight.
    Submitting,
    /// The webhook accepted a submission; the confirmation view is shown.
    Submitted,
}

/// Root state of one lead-capture form instance.
///
/// Owned by the presentation shell's store and mutated only through the
/// reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFormState {
    /// Current raw field values
    pub fields: LeadFormFields,
    /// Currently displayed per-field errors
    pub errors: FieldErrors,
    /// Lifecycle phase
    pub phase: FormPhase,
}

/// Result of one webhook submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The webhook accepted the payload (any 2xx status; the body is ignored).
    Success,
    /// The request failed in transport or the webhook answered non-2xx.
    Failure(SubmitError),
}

impl SubmissionOutcome {
    /// Whether this outcome is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_set_and_value_round_trip() {
        let mut fields = LeadFormFields::default();
        for field in Field::ALL {
            fields.set(field, format!("value for {field}"));
        }
        assert_eq!(fields.value(Field::Crops), "value for crops");
        assert_eq!(fields.phone, "value for phone");
    }

    #[test]
    fn reset_clears_every_field() {
        let mut fields = LeadFormFields {
            name: "Juan".to_string(),
            region: "Santa Cruz".to_string(),
            crops: "Papa".to_string(),
            phone: "70123456".to_string(),
        };
        fields.reset();
        assert_eq!(fields, LeadFormFields::default());
    }

    #[test]
    fn field_errors_clear_is_per_field() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Name, "missing");
        errors.insert(Field::Phone, "invalid");

        errors.clear(Field::Name);

        assert!(!errors.contains(Field::Name));
        assert_eq!(errors.message(Field::Phone), Some("invalid"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn field_errors_iterate_in_form_order() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Phone, "p");
        errors.insert(Field::Name, "n");

        let fields: Vec<Field> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Phone]);
    }

    #[test]
    fn default_phase_is_editing() {
        assert_eq!(LeadFormState::default().phase, FormPhase::Editing);
    }
}
