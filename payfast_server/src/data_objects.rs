use std::collections::BTreeMap;

use payfast_engine::checkout_objects::{CheckoutRequest, Payer};
use serde::{Deserialize, Serialize};

/// The JSON body of a checkout request.
///
/// Values are always strings, as they end up verbatim in the signed form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutParams {
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub payer: Option<Payer>,
}

impl From<CheckoutParams> for CheckoutRequest {
    fn from(params: CheckoutParams) -> Self {
        let request = CheckoutRequest::new(params.fields.into_iter().collect());
        match params.payer {
            Some(payer) => request.with_payer(payer),
            None => request,
        }
    }
}
