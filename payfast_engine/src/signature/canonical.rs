use std::collections::BTreeSet;

use log::trace;
use thiserror::Error;

use super::{FieldSet, SIGNATURE_FIELD};

/// Leading and trailing characters ignored in checkout signature values.
///
/// This approximates PHP's `trim()`, which the gateway uses on its side. `trim()` also strips `'\0'`, but that is left
/// out until it is clear the gateway accepts NUL values at all. Pass a different set to [`canonicalize_with`] to
/// override it.
pub const CHECKOUT_SIGNATURE_IGNORED_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b'];

/// The field set contained names outside of the signing vocabulary. This is always a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Data contains unexpected fields: {}", .fields.iter().cloned().collect::<Vec<_>>().join(", "))]
pub struct UnknownFieldError {
    pub fields: BTreeSet<String>,
}

/// Prepares `fields` for signing using the given canonical field `order`.
///
/// * The `signature` field is ignored.
/// * Every other field name must appear in `order`, otherwise [`UnknownFieldError`] is returned.
/// * Empty values are dropped unless `include_empty` is set.
/// * The result follows `order`. Names in `order` that are absent from `fields` are skipped.
pub fn canonicalize(
    fields: &FieldSet,
    order: &[&str],
    include_empty: bool,
) -> Result<Vec<(String, String)>, UnknownFieldError> {
    canonicalize_with(fields, order, include_empty, None)
}

/// As [`canonicalize`], but additionally strips the characters in `strip` from both ends of each value before the
/// empty check.
pub fn canonicalize_with(
    fields: &FieldSet,
    order: &[&str],
    include_empty: bool,
    strip: Option<&[char]>,
) -> Result<Vec<(String, String)>, UnknownFieldError> {
    let unknown = fields
        .names()
        .filter(|name| *name != SIGNATURE_FIELD && !order.contains(name))
        .map(String::from)
        .collect::<BTreeSet<String>>();
    if !unknown.is_empty() {
        return Err(UnknownFieldError { fields: unknown });
    }
    let result = order
        .iter()
        .filter_map(|&name| {
            let value = fields.get(name)?;
            let value = match strip {
                Some(chars) => value.trim_matches(chars),
                None => value,
            };
            (include_empty || !value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect::<Vec<_>>();
    trace!("✍️ Canonicalized {} of {} fields for signing", result.len(), fields.len());
    Ok(result)
}
