use std::str::FromStr;

use pfg_common::Amount;
use serde::{Deserialize, Serialize};

use super::TrustedOrigins;

/// How the gross amount of a notification is compared to the amount requested at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountMatchPolicy {
    /// Amounts are not compared
    Disabled,
    /// Amounts must be exactly equal. A missing amount only matches a missing amount.
    #[default]
    Exact,
    /// Amounts may differ by at most the given (non-negative) amount. Both must be present.
    Tolerance(Amount),
}

impl AmountMatchPolicy {
    pub fn matches(&self, expected: Option<Amount>, received: Option<Amount>) -> bool {
        match self {
            Self::Disabled => true,
            Self::Exact => expected == received,
            Self::Tolerance(tolerance) => match (expected, received) {
                (Some(e), Some(r)) => e.abs_diff(&r) <= tolerance.abs_diff(&Amount::default()),
                (None, None) => true,
                _ => false,
            },
        }
    }
}

/// What to do when the gateway could not be reached to confirm a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostbackFailurePolicy {
    /// The notification is rejected outright.
    #[default]
    Reject,
    /// The notification is recorded as untrusted, but reported as temporarily unprocessable so that the gateway
    /// retries it.
    Inconclusive,
}

impl FromStr for PostbackFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "inconclusive" => Ok(Self::Inconclusive),
            other => Err(format!("Invalid postback failure policy: {other}. Use 'reject' or 'inconclusive'")),
        }
    }
}

/// Everything the trust evaluator needs to know about the merchant and the acceptance rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustConfig {
    pub merchant_id: String,
    pub trusted_origins: TrustedOrigins,
    pub amount_policy: AmountMatchPolicy,
    pub use_postback: bool,
    pub postback_failure: PostbackFailurePolicy,
}

impl TrustConfig {
    pub fn new<S: Into<String>>(merchant_id: S) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            trusted_origins: TrustedOrigins::default(),
            amount_policy: AmountMatchPolicy::default(),
            use_postback: true,
            postback_failure: PostbackFailurePolicy::default(),
        }
    }

    pub fn with_trusted_origins(mut self, origins: TrustedOrigins) -> Self {
        self.trusted_origins = origins;
        self
    }

    pub fn with_amount_policy(mut self, policy: AmountMatchPolicy) -> Self {
        self.amount_policy = policy;
        self
    }

    pub fn with_postback(mut self, use_postback: bool) -> Self {
        self.use_postback = use_postback;
        self
    }

    pub fn with_postback_failure(mut self, policy: PostbackFailurePolicy) -> Self {
        self.postback_failure = policy;
        self
    }
}
