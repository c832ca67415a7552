use log::trace;
use pfg_common::Amount;

use super::{
    schema::{FieldKind, FieldSpec, NOTIFICATION_SCHEMA},
    AmountMatchPolicy,
    TrustError,
};
use crate::{db_types::NotificationFields, signature::FieldSet};

/// Converts the notification data into typed order fields, checking each one against its schema entry.
///
/// Values are trimmed, and empty values are treated as absent. Every failing field is reported, and a failing field
/// is left empty in the result.
pub fn clean_fields(data: &FieldSet) -> (NotificationFields, Vec<TrustError>) {
    let mut fields = NotificationFields::default();
    let mut errors = Vec::new();
    for spec in &NOTIFICATION_SCHEMA {
        let value = data.get(spec.name).map(str::trim).filter(|v| !v.is_empty());
        if let Err(e) = clean_field(spec, value, &mut fields) {
            trace!("🔍️ Field {} did not validate: {e}", spec.name);
            errors.push(e);
        }
    }
    (fields, errors)
}

fn clean_field(spec: &FieldSpec, value: Option<&str>, fields: &mut NotificationFields) -> Result<(), TrustError> {
    let Some(value) = value else {
        return if spec.required { Err(TrustError::RequiredField(spec.name.to_string())) } else { Ok(()) };
    };
    match spec.kind {
        FieldKind::Text => {
            let length = value.chars().count();
            if let Some(max) = spec.max_length.filter(|max| length > *max) {
                return Err(invalid(
                    spec,
                    "max_length",
                    format!("Ensure this value has at most {max} characters (it has {length})."),
                ));
            }
            fields.set_text(spec.name, Some(value.to_string()));
        },
        FieldKind::Integer => {
            let v = value.parse::<i64>().map_err(|_| invalid(spec, "invalid", "Enter a whole number.".into()))?;
            fields.set_integer(spec.name, Some(v));
        },
        FieldKind::Decimal => {
            let v = value.parse::<Amount>().map_err(|_| invalid(spec, "invalid", "Enter a number.".into()))?;
            fields.set_amount(spec.name, Some(v));
        },
    }
    Ok(())
}

fn invalid(spec: &FieldSpec, code: &'static str, message: String) -> TrustError {
    TrustError::InvalidValue { field: spec.name.to_string(), code, message }
}

/// The declared merchant id must be ours. A missing merchant id is reported by [`clean_fields`] instead.
pub fn check_merchant(fields: &NotificationFields, merchant_id: &str) -> Result<(), TrustError> {
    match fields.merchant_id.as_deref() {
        Some(declared) if declared != merchant_id => Err(TrustError::MerchantMismatch(declared.to_string())),
        _ => Ok(()),
    }
}

/// The gross amount must match the amount stored on the order at checkout.
pub fn check_amount(
    policy: &AmountMatchPolicy,
    expected: Option<Amount>,
    received: Option<Amount>,
) -> Result<(), TrustError> {
    if policy.matches(expected, received) {
        Ok(())
    } else {
        Err(TrustError::AmountMismatch { expected, received })
    }
}
