use std::fmt::Debug;

use log::*;

use super::{
    errors::NotificationApiError,
    notification_objects::{NotificationOutcome, NotificationRequest},
};
use crate::{
    db_types::{NotificationUpdate, Order, PaymentId},
    events::{EventProducers, NotificationAcceptedEvent},
    helpers::{truncate_chars, DEBUG_INFO_MAX_LENGTH},
    postback::PostbackClient,
    signature::FieldSet,
    traits::OrderManagement,
    trust::{Rejection, TrustError, TrustEvaluator, Verdict},
};

/// `NotificationApi` is the entry point for inbound payment notifications (ITNs).
///
/// Each notification is matched to its order, evaluated by the [`TrustEvaluator`], and the outcome is written back
/// to the order in one atomic update. Subscribers are told about trusted notifications only after they are saved.
pub struct NotificationApi<B, P> {
    db: B,
    evaluator: TrustEvaluator<P>,
    producers: EventProducers,
}

impl<B, P> Debug for NotificationApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B, P> NotificationApi<B, P> {
    pub fn new(db: B, evaluator: TrustEvaluator<P>, producers: EventProducers) -> Self {
        Self { db, evaluator, producers }
    }

    pub fn evaluator(&self) -> &TrustEvaluator<P> {
        &self.evaluator
    }
}

impl<B, P> NotificationApi<B, P>
where
    B: OrderManagement,
    P: PostbackClient,
{
    pub async fn process_notification(
        &self,
        request: NotificationRequest,
    ) -> Result<NotificationOutcome, NotificationApiError> {
        let data = FieldSet::from_form_body(&request.raw_body);
        let payment_id = data
            .get("m_payment_id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PaymentId::from)
            .ok_or(NotificationApiError::MissingPaymentId)?;
        let order = self
            .db
            .fetch_order(&payment_id)
            .await?
            .ok_or_else(|| NotificationApiError::OrderNotFound(payment_id.clone()))?;
        trace!("🔔️ Notification received for {order}");

        let request_ip = request.canonical_ip();
        let verdict = self.evaluator.evaluate(&data, &order, request.source_ip.as_deref()).await;
        let verdict = self.check_unique_transaction(verdict, &data, &order).await?;
        let outcome = match verdict {
            Verdict::Accepted(fields) => {
                let debug_info = truncate_chars(&request.raw_body, DEBUG_INFO_MAX_LENGTH);
                let update = NotificationUpdate::trusted(request_ip, debug_info, fields);
                let order = self.db.save_notification(&payment_id, update).await?;
                let status = order.details.payment_status.as_deref().unwrap_or("unknown");
                info!("🔔️ Notification for {} accepted. Payment status: {status}", order.m_payment_id);
                self.call_notification_accepted_hook(&order).await;
                NotificationOutcome::Accepted(order)
            },
            Verdict::Rejected(rejection) => {
                let update = NotificationUpdate::untrusted(request_ip, rejection.summary());
                let order = self.db.save_notification(&payment_id, update).await?;
                info!("🔔️ Notification for {} rejected. {rejection}", order.m_payment_id);
                NotificationOutcome::Rejected { order, rejection }
            },
            Verdict::Inconclusive(rejection) => {
                let update = NotificationUpdate::untrusted(request_ip, rejection.summary());
                let order = self.db.save_notification(&payment_id, update).await?;
                warn!("🔔️ Notification for {} could not be confirmed. {rejection}", order.m_payment_id);
                NotificationOutcome::Inconclusive { order, rejection }
            },
        };
        Ok(outcome)
    }

    /// A gateway transaction id may only be recorded against one order. A notification that carries an id held by
    /// another order is rejected with a `pf_payment_id` field error, alongside any other field errors. Rejections that
    /// ended in a hard stop are left as they are.
    async fn check_unique_transaction(
        &self,
        verdict: Verdict,
        data: &FieldSet,
        order: &Order,
    ) -> Result<Verdict, NotificationApiError> {
        if matches!(&verdict, Verdict::Rejected(r) | Verdict::Inconclusive(r) if r.has_hard_stop()) {
            return Ok(verdict);
        }
        let Some(pf_payment_id) = data.get("pf_payment_id").map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(verdict);
        };
        match self.db.fetch_order_by_pf_payment_id(pf_payment_id).await? {
            Some(holder) if holder.id != order.id => {
                warn!(
                    "🔔️ Notification for {} carries transaction {pf_payment_id}, which belongs to order {}",
                    order.m_payment_id, holder.m_payment_id
                );
                let duplicate = TrustError::duplicate_pf_payment_id();
                let verdict = match verdict {
                    Verdict::Accepted(_) => Verdict::Rejected(Rejection::from(duplicate)),
                    Verdict::Rejected(mut rejection) | Verdict::Inconclusive(mut rejection) => {
                        rejection.push(duplicate);
                        Verdict::Rejected(rejection)
                    },
                };
                Ok(verdict)
            },
            _ => Ok(verdict),
        }
    }

    async fn call_notification_accepted_hook(&self, order: &Order) {
        for emitter in &self.producers.notification_accepted_producer {
            debug!("🔔️ Notifying notification accepted hook subscribers");
            emitter.publish_event(NotificationAcceptedEvent::new(order.clone())).await;
        }
    }
}
