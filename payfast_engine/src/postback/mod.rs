//! # Out-of-band notification confirmation
//!
//! A notification that passed every local check can additionally be confirmed with the gateway itself. The
//! notification data (minus its signature) is posted back to the gateway's validation endpoint, which answers with
//! `VALID` or `INVALID`.
//!
//! [`PostbackClient`] is the seam the trust evaluator uses. [`HttpPostbackClient`] is the production implementation.
mod http_client;

pub use http_client::HttpPostbackClient;
use thiserror::Error;

use crate::signature::{form_encode, FieldSet, SIGNATURE_FIELD};

pub const POSTBACK_PATH: &str = "/eng/query/validate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostbackOutcome {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostbackError {
    #[error("Could not reach the gateway: {0}")]
    Transport(String),
    #[error("Unexpected postback response: {0:?}")]
    UnexpectedResponse(String),
}

#[allow(async_fn_in_trait)]
pub trait PostbackClient {
    /// Asks the gateway whether it really sent the notification carrying `fields`.
    async fn confirm(&self, fields: &FieldSet) -> Result<PostbackOutcome, PostbackError>;
}

/// The validation endpoint for the given gateway server, e.g. `https://sandbox.payfast.co.za`.
pub fn postback_url(server_base_url: &str) -> String {
    format!("{}{POSTBACK_PATH}", server_base_url.trim_end_matches('/'))
}

/// The form body posted to the gateway. Values are trimmed and the signature is left out.
pub fn postback_body(fields: &FieldSet) -> String {
    form_encode(fields.iter().filter(|(k, _)| *k != SIGNATURE_FIELD).map(|(k, v)| (k, v.trim())))
}

pub fn interpret_response(body: &str) -> Result<PostbackOutcome, PostbackError> {
    match body {
        "VALID" => Ok(PostbackOutcome::Valid),
        "INVALID" => Ok(PostbackOutcome::Invalid),
        other => Err(PostbackError::UnexpectedResponse(other.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn url() {
        assert_eq!(postback_url("https://sandbox.payfast.co.za"), "https://sandbox.payfast.co.za/eng/query/validate");
        assert_eq!(postback_url("https://www.payfast.co.za/"), "https://www.payfast.co.za/eng/query/validate");
    }

    #[test]
    fn body_excludes_signature() {
        let fields = FieldSet::new()
            .with("m_payment_id", "1 ")
            .with("signature", "abc")
            .with("item_name", " Flux capacitor")
            .with("custom_str1", "");
        assert_eq!(postback_body(&fields), "m_payment_id=1&item_name=Flux+capacitor&custom_str1=");
    }

    #[test]
    fn responses() {
        assert_eq!(interpret_response("VALID"), Ok(PostbackOutcome::Valid));
        assert_eq!(interpret_response("INVALID"), Ok(PostbackOutcome::Invalid));
        assert_eq!(interpret_response("valid"), Err(PostbackError::UnexpectedResponse("valid".into())));
        assert!(interpret_response("").is_err());
    }
}
