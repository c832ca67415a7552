use std::collections::BTreeMap;

use pfg_common::Amount;
use serde::Serialize;
use thiserror::Error;

use crate::{
    helpers::{truncate_chars, DEBUG_INFO_MAX_LENGTH},
    signature::UnknownFieldError,
};

/// Errors that are not tied to a single field are reported under this key.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The reasons a notification can fail to be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustError {
    #[error("untrusted ip: {}", .0.as_deref().unwrap_or("None"))]
    UntrustedOrigin(Option<String>),
    #[error("Signature is invalid: {expected} != {actual}")]
    InvalidSignature { expected: String, actual: String },
    #[error("{0}")]
    UnknownFields(#[from] UnknownFieldError),
    #[error("Invalid merchant id ({0}).")]
    MerchantMismatch(String),
    #[error("Amount is not the same: {} != {}", display_amount(.expected), display_amount(.received))]
    AmountMismatch { expected: Option<Amount>, received: Option<Amount> },
    #[error("This field is required.")]
    RequiredField(String),
    #[error("{message}")]
    InvalidValue { field: String, code: &'static str, message: String },
    #[error("Postback validation fails")]
    PostbackRejected,
    #[error("Postback fails: {0}")]
    PostbackFailed(String),
    #[error("Unexpected result from PayFast validation: {0:?}")]
    UnexpectedResponse(String),
}

fn display_amount(amount: &Option<Amount>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_else(|| "None".to_string())
}

impl TrustError {
    /// The field this error is reported against. Hard stops and postback failures belong to no single field.
    pub fn field(&self) -> &str {
        match self {
            Self::MerchantMismatch(_) => "merchant_id",
            Self::AmountMismatch { .. } => "amount_gross",
            Self::RequiredField(field) => field.as_str(),
            Self::InvalidValue { field, .. } => field.as_str(),
            _ => NON_FIELD_ERRORS,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::RequiredField(_) => "required",
            Self::InvalidValue { code, .. } => *code,
            _ => "",
        }
    }

    /// The gateway's transaction id of a notification is already recorded against another order.
    pub fn duplicate_pf_payment_id() -> Self {
        Self::InvalidValue {
            field: "pf_payment_id".to_string(),
            code: "unique",
            message: "PayFast order with this Pf payment id already exists.".to_string(),
        }
    }

    /// Hard stops end the evaluation immediately; no further checks are run after them.
    pub fn is_hard_stop(&self) -> bool {
        matches!(self, Self::UntrustedOrigin(_) | Self::InvalidSignature { .. } | Self::UnknownFields(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// The full list of reasons a notification was not trusted, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    errors: Vec<TrustError>,
}

impl Rejection {
    pub fn new(errors: Vec<TrustError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[TrustError] {
        &self.errors
    }

    pub fn has_hard_stop(&self) -> bool {
        self.errors.iter().any(TrustError::is_hard_stop)
    }

    pub fn push(&mut self, error: TrustError) {
        self.errors.push(error);
    }

    /// A single-line summary of the rejection: `"field: message"` for the first error of each field, joined by `|`
    /// and truncated to fit the order's debug payload.
    pub fn summary(&self) -> String {
        let mut seen = Vec::<&str>::new();
        let entries = self
            .errors
            .iter()
            .filter(|e| {
                let field = e.field();
                if seen.contains(&field) {
                    false
                } else {
                    seen.push(field);
                    true
                }
            })
            .map(|e| format!("{}: {e}", e.field()))
            .collect::<Vec<_>>();
        truncate_chars(&entries.join("|"), DEBUG_INFO_MAX_LENGTH)
    }

    /// Every error, grouped by field. This is the body returned to the caller.
    pub fn to_error_map(&self) -> BTreeMap<String, Vec<ErrorDetail>> {
        let mut result = BTreeMap::<String, Vec<ErrorDetail>>::new();
        for e in &self.errors {
            result
                .entry(e.field().to_string())
                .or_default()
                .push(ErrorDetail { code: e.code().to_string(), message: e.to_string() });
        }
        result
    }
}

impl From<TrustError> for Rejection {
    fn from(e: TrustError) -> Self {
        Self::new(vec![e])
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}
