//! Field validation for the lead-capture form.
//!
//! Pure and deterministic: the same snapshot always maps to the same error
//! map. Rules are evaluated independently against the full snapshot; one
//! invalid field never masks another.

use crate::state::{Field, FieldErrors, LeadFormFields};

/// Message shown when the name is blank.
pub const MSG_NAME_REQUIRED: &str = "El nombre es obligatorio";
/// Message shown when the region is blank.
pub const MSG_REGION_REQUIRED: &str = "La región es obligatoria";
/// Message shown when no crop is given.
pub const MSG_CROPS_REQUIRED: &str = "Indica al menos un cultivo";
/// Message shown when the phone is blank.
pub const MSG_PHONE_REQUIRED: &str = "El teléfono es obligatorio";
/// Message shown when the phone is not a plausible number.
pub const MSG_PHONE_INVALID: &str = "Ingresa un número válido";

/// Minimum digits accepted in a phone number.
const PHONE_MIN_DIGITS: usize = 7;
/// Maximum digits accepted in a phone number.
const PHONE_MAX_DIGITS: usize = 15;

/// Validate a full snapshot of the form fields.
///
/// Returns a map containing only the fields that failed; an empty map means
/// the snapshot may be submitted. No side effects.
#[must_use]
pub fn validate(fields: &LeadFormFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if fields.name.trim().is_empty() {
        errors.insert(Field::Name, MSG_NAME_REQUIRED);
    }

    if fields.region.trim().is_empty() {
        errors.insert(Field::Region, MSG_REGION_REQUIRED);
    }

    if fields.crops.trim().is_empty() {
        errors.insert(Field::Crops, MSG_CROPS_REQUIRED);
    }

    if fields.phone.trim().is_empty() {
        errors.insert(Field::Phone, MSG_PHONE_REQUIRED);
    } else if !is_plausible_phone(&fields.phone) {
        errors.insert(Field::Phone, MSG_PHONE_INVALID);
    }

    errors
}

/// A phone number is plausible when, with all whitespace removed, it is
/// 7 to 15 ASCII digits. Farmers commonly type numbers with grouping
/// spaces, so whitespace is stripped rather than rejected.
fn is_plausible_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
}
