use log::*;

use super::{
    validators::{check_amount, check_merchant, clean_fields},
    PostbackFailurePolicy,
    Rejection,
    TrustConfig,
    TrustError,
};
use crate::{
    db_types::{NotificationFields, Order},
    postback::{PostbackClient, PostbackError, PostbackOutcome},
    signature::{notification_signature, FieldSet, SIGNATURE_FIELD},
};

/// The result of evaluating one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed. Carries the validated fields to store on the order.
    Accepted(NotificationFields),
    Rejected(Rejection),
    /// The gateway could not be asked to confirm the notification, and the policy is to let it retry.
    Inconclusive(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(r) | Self::Inconclusive(r) => Some(r),
        }
    }
}

/// Recomputes the notification signature and compares it to the declared one, byte for byte.
pub fn verify_notification_signature(fields: &FieldSet) -> Result<(), TrustError> {
    let expected = notification_signature(fields)?;
    let actual = fields.get(SIGNATURE_FIELD).map(str::trim).unwrap_or_default();
    if expected.as_bytes() == actual.as_bytes() {
        Ok(())
    } else {
        Err(TrustError::InvalidSignature { expected, actual: actual.to_string() })
    }
}

/// Decides whether an inbound notification can be trusted.
///
/// The checks run in a fixed order:
/// 1. The source IP must be in the allow-list.
/// 2. The signature must match.
/// 3. The fields must validate, the merchant id must be ours, and the gross amount must match the order.
/// 4. If enabled, the gateway must confirm the notification.
///
/// The first two are hard stops. The field checks are all run and reported together. The postback is only attempted
/// once everything else has passed.
pub struct TrustEvaluator<P> {
    config: TrustConfig,
    postback: P,
}

impl<P> TrustEvaluator<P> {
    pub fn new(config: TrustConfig, postback: P) -> Self {
        Self { config, postback }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    pub fn check_origin(&self, source_ip: Option<&str>) -> Result<(), TrustError> {
        match source_ip {
            Some(ip) if self.config.trusted_origins.is_trusted(ip) => Ok(()),
            _ => Err(TrustError::UntrustedOrigin(source_ip.map(String::from))),
        }
    }
}

impl<P> TrustEvaluator<P>
where P: PostbackClient
{
    pub async fn evaluate(&self, data: &FieldSet, order: &Order, source_ip: Option<&str>) -> Verdict {
        if let Err(e) = self.check_origin(source_ip) {
            warn!("🔐️ Notification for {} came from an untrusted source. {e}", order.m_payment_id);
            return Verdict::Rejected(e.into());
        }
        if let Err(e) = verify_notification_signature(data) {
            warn!("🔐️ Notification for {} failed the signature check. {e}", order.m_payment_id);
            return Verdict::Rejected(e.into());
        }
        let (fields, mut errors) = clean_fields(data);
        if let Err(e) = check_merchant(&fields, &self.config.merchant_id) {
            errors.push(e);
        }
        // An unparseable amount has already been reported
        if !errors.iter().any(|e| e.field() == "amount_gross") {
            if let Err(e) = check_amount(&self.config.amount_policy, order.details.amount_gross, fields.amount_gross) {
                errors.push(e);
            }
        }
        if !errors.is_empty() {
            let rejection = Rejection::new(errors);
            info!("🔐️ Notification for {} has invalid fields. {rejection}", order.m_payment_id);
            return Verdict::Rejected(rejection);
        }
        if self.config.use_postback {
            if let Some(verdict) = self.confirm_with_gateway(data, order).await {
                return verdict;
            }
        }
        debug!("🔐️ Notification for {} is trusted", order.m_payment_id);
        Verdict::Accepted(fields)
    }

    async fn confirm_with_gateway(&self, data: &FieldSet, order: &Order) -> Option<Verdict> {
        match self.postback.confirm(data).await {
            Ok(PostbackOutcome::Valid) => None,
            Ok(PostbackOutcome::Invalid) => {
                warn!("🔐️ The gateway did not confirm the notification for {}", order.m_payment_id);
                Some(Verdict::Rejected(TrustError::PostbackRejected.into()))
            },
            Err(PostbackError::Transport(e)) => {
                error!("🔐️ Could not confirm the notification for {} with the gateway. {e}", order.m_payment_id);
                let rejection = Rejection::from(TrustError::PostbackFailed(e));
                match self.config.postback_failure {
                    PostbackFailurePolicy::Reject => Some(Verdict::Rejected(rejection)),
                    PostbackFailurePolicy::Inconclusive => Some(Verdict::Inconclusive(rejection)),
                }
            },
            Err(PostbackError::UnexpectedResponse(body)) => {
                error!("🔐️ The gateway sent an unexpected postback response for {}: {body:?}", order.m_payment_id);
                Some(Verdict::Rejected(TrustError::UnexpectedResponse(body).into()))
            },
        }
    }
}
