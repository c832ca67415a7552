use log::trace;

use super::{
    canonicalize,
    canonicalize_with,
    FieldSet,
    UnknownFieldError,
    CHECKOUT_FIELD_ORDER,
    CHECKOUT_SIGNATURE_IGNORED_WHITESPACE,
    NOTIFICATION_FIELD_ORDER,
};

/// Serializes the pairs as an `application/x-www-form-urlencoded` string, in the given order.
///
/// Values are UTF-8 percent-encoded. Only `A-Z a-z 0-9 - _ . ~` are left as is and spaces become `+`.
pub fn form_encode<'a, I>(pairs: I) -> String
where I: IntoIterator<Item = (&'a str, &'a str)> {
    pairs.into_iter().map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v))).collect::<Vec<_>>().join("&")
}

fn encode_component(s: &str) -> String {
    // '%' is always escaped itself, so the only "%20" sequences in the output are encoded spaces
    urlencoding::encode(s).replace("%20", "+")
}

/// Calculates the signature of the canonical, ordered pairs: the lowercase hex MD5 digest of their form encoding.
pub fn sign(pairs: &[(String, String)]) -> String {
    let text = form_encode(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    trace!("✍️ Signing {text}");
    format!("{:x}", md5::compute(text.as_bytes()))
}

/// Calculates the signature of a checkout submission.
///
/// Values are stripped of [`CHECKOUT_SIGNATURE_IGNORED_WHITESPACE`] and empty values are left out.
pub fn checkout_signature(fields: &FieldSet) -> Result<String, UnknownFieldError> {
    let pairs = canonicalize_with(fields, &CHECKOUT_FIELD_ORDER, false, Some(CHECKOUT_SIGNATURE_IGNORED_WHITESPACE))?;
    Ok(sign(&pairs))
}

/// Calculates the signature of an ITN submission. Empty values are part of the signature.
pub fn notification_signature(fields: &FieldSet) -> Result<String, UnknownFieldError> {
    let pairs = canonicalize(fields, &NOTIFICATION_FIELD_ORDER, true)?;
    Ok(sign(&pairs))
}
