use pfg_common::Secret;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    db_types::PaymentId,
    signature::{FieldSet, SIGNATURE_FIELD},
};

pub const LIVE_SERVER: &str = "https://www.payfast.co.za";
pub const SANDBOX_SERVER: &str = "https://sandbox.payfast.co.za";
pub const PROCESS_PATH: &str = "/eng/process";
/// Where the gateway sends notifications, relative to the merchant site's public base URL
pub const NOTIFY_PATH: &str = "/payfast/notify/";

/// The gateway's public test merchant. Real credentials do not work in the sandbox.
pub const SANDBOX_MERCHANT_ID: &str = "10000100";
pub const SANDBOX_MERCHANT_KEY: &str = "46f0cd694581a";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMode {
    #[default]
    Live,
    Sandbox,
}

impl GatewayMode {
    pub fn server_url(&self) -> &'static str {
        match self {
            Self::Live => LIVE_SERVER,
            Self::Sandbox => SANDBOX_SERVER,
        }
    }
}

/// The merchant's account with the gateway.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    pub merchant_id: String,
    pub merchant_key: Secret<String>,
    pub mode: GatewayMode,
}

impl MerchantConfig {
    pub fn live<S: Into<String>>(merchant_id: S, merchant_key: Secret<String>) -> Self {
        Self { merchant_id: merchant_id.into(), merchant_key, mode: GatewayMode::Live }
    }

    /// The sandbox always uses the public test credentials.
    pub fn sandbox() -> Self {
        Self {
            merchant_id: SANDBOX_MERCHANT_ID.to_string(),
            merchant_key: Secret::new(SANDBOX_MERCHANT_KEY.to_string()),
            mode: GatewayMode::Sandbox,
        }
    }

    pub fn server_url(&self) -> &'static str {
        self.mode.server_url()
    }

    /// The URL that checkout forms are submitted to
    pub fn process_url(&self) -> String {
        format!("{}{PROCESS_PATH}", self.server_url())
    }
}

/// Builds the absolute notify URL from the site's public base URL.
pub fn notify_url(url_base: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(url_base)?;
    Ok(base.join(NOTIFY_PATH)?.to_string())
}

/// Details of the paying customer, used to pre-fill the payer fields of a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub fields: FieldSet,
    pub payer: Option<Payer>,
}

impl CheckoutRequest {
    pub fn new(fields: FieldSet) -> Self {
        Self { fields, payer: None }
    }

    pub fn with_payer(mut self, payer: Payer) -> Self {
        self.payer = Some(payer);
        self
    }
}

/// A signed checkout, ready to be rendered as a form that posts to `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutForm {
    pub action: String,
    pub m_payment_id: PaymentId,
    pub fields: Vec<(String, String)>,
}

impl CheckoutForm {
    pub fn signature(&self) -> Option<&str> {
        self.field(SIGNATURE_FIELD)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}
