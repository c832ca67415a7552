use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pfg_common::Amount;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

//--------------------------------------       PaymentId       ---------------------------------------------------------
/// The merchant-side payment identifier (`m_payment_id`). It correlates a checkout with its notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct PaymentId(pub String);

impl FromStr for PaymentId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PaymentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PaymentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       TrustFlag       ---------------------------------------------------------
/// Whether the last notification for an order was accepted as authentic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustFlag {
    /// No notification has been evaluated yet.
    #[default]
    Unknown,
    Trusted,
    Untrusted,
}

impl From<Option<bool>> for TrustFlag {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unknown,
            Some(true) => Self::Trusted,
            Some(false) => Self::Untrusted,
        }
    }
}

impl TrustFlag {
    /// The nullable boolean representation used for storage
    pub fn as_option(&self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Trusted => Some(true),
            Self::Untrusted => Some(false),
        }
    }
}

impl Display for TrustFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Trusted => write!(f, "Trusted"),
            Self::Untrusted => write!(f, "Untrusted"),
        }
    }
}

//--------------------------------------  NotificationFields   ---------------------------------------------------------
/// The order fields that a trusted notification overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct NotificationFields {
    pub pf_payment_id: Option<String>,
    pub payment_status: Option<String>,
    pub item_name: Option<String>,
    pub item_description: Option<String>,
    pub amount_gross: Option<Amount>,
    pub amount_fee: Option<Amount>,
    pub amount_net: Option<Amount>,
    pub custom_str1: Option<String>,
    pub custom_str2: Option<String>,
    pub custom_str3: Option<String>,
    pub custom_str4: Option<String>,
    pub custom_str5: Option<String>,
    pub custom_int1: Option<i64>,
    pub custom_int2: Option<i64>,
    pub custom_int3: Option<i64>,
    pub custom_int4: Option<i64>,
    pub custom_int5: Option<i64>,
    pub name_first: Option<String>,
    pub name_last: Option<String>,
    pub email_address: Option<String>,
    pub merchant_id: Option<String>,
    pub signature: Option<String>,
}

impl NotificationFields {
    /// Stores a text value by field name. Unknown names are ignored and reported as `false`.
    pub fn set_text(&mut self, name: &str, value: Option<String>) -> bool {
        let slot = match name {
            "pf_payment_id" => &mut self.pf_payment_id,
            "payment_status" => &mut self.payment_status,
            "item_name" => &mut self.item_name,
            "item_description" => &mut self.item_description,
            "custom_str1" => &mut self.custom_str1,
            "custom_str2" => &mut self.custom_str2,
            "custom_str3" => &mut self.custom_str3,
            "custom_str4" => &mut self.custom_str4,
            "custom_str5" => &mut self.custom_str5,
            "name_first" => &mut self.name_first,
            "name_last" => &mut self.name_last,
            "email_address" => &mut self.email_address,
            "merchant_id" => &mut self.merchant_id,
            "signature" => &mut self.signature,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Stores an integer value by field name. Unknown names are ignored and reported as `false`.
    pub fn set_integer(&mut self, name: &str, value: Option<i64>) -> bool {
        let slot = match name {
            "custom_int1" => &mut self.custom_int1,
            "custom_int2" => &mut self.custom_int2,
            "custom_int3" => &mut self.custom_int3,
            "custom_int4" => &mut self.custom_int4,
            "custom_int5" => &mut self.custom_int5,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Stores a decimal value by field name. Unknown names are ignored and reported as `false`.
    pub fn set_amount(&mut self, name: &str, value: Option<Amount>) -> bool {
        let slot = match name {
            "amount_gross" => &mut self.amount_gross,
            "amount_fee" => &mut self.amount_fee,
            "amount_net" => &mut self.amount_net,
            _ => return false,
        };
        *slot = value;
        true
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
/// One payment lifecycle, from checkout to the last notification received for it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub m_payment_id: PaymentId,
    #[sqlx(flatten)]
    pub details: NotificationFields,
    pub request_ip: Option<String>,
    pub debug_info: Option<String>,
    #[sqlx(try_from = "Option<bool>")]
    pub trusted: TrustFlag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Order {} ({})", self.m_payment_id, self.created_at)
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
/// A new order, created when a checkout is initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// If `None`, the order's surrogate id is used as its payment id.
    pub m_payment_id: Option<PaymentId>,
    /// The amount requested at checkout. Notifications are checked against it.
    pub amount_gross: Option<Amount>,
}

impl NewOrder {
    pub fn new(amount_gross: Option<Amount>) -> Self {
        Self { m_payment_id: None, amount_gross }
    }

    pub fn with_payment_id(mut self, id: PaymentId) -> Self {
        self.m_payment_id = Some(id);
        self
    }
}

//--------------------------------------   NotificationUpdate  ---------------------------------------------------------
/// The result of evaluating one notification, written to the order in a single atomic update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationUpdate {
    pub request_ip: Option<String>,
    pub debug_info: String,
    pub trusted: TrustFlag,
    /// Only a trusted notification may overwrite the order details.
    pub fields: Option<NotificationFields>,
}

impl NotificationUpdate {
    pub fn trusted(request_ip: Option<String>, debug_info: String, fields: NotificationFields) -> Self {
        Self { request_ip, debug_info, trusted: TrustFlag::Trusted, fields: Some(fields) }
    }

    pub fn untrusted(request_ip: Option<String>, debug_info: String) -> Self {
        Self { request_ip, debug_info, trusted: TrustFlag::Untrusted, fields: None }
    }
}
