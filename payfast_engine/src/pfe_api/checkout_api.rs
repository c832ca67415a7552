use std::fmt::Debug;

use log::*;
use pfg_common::Amount;

use super::{
    checkout_objects::{CheckoutForm, CheckoutRequest, MerchantConfig},
    errors::CheckoutApiError,
};
use crate::{
    db_types::{NewOrder, PaymentId},
    signature::{canonicalize, checkout_signature, CHECKOUT_FIELD_ORDER, SIGNATURE_FIELD},
    traits::OrderManagement,
};

/// `CheckoutApi` prepares signed checkout submissions, creating the order each one pays for.
pub struct CheckoutApi<B> {
    db: B,
    merchant: MerchantConfig,
    notify_url: String,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({}, {:?})", self.merchant.merchant_id, self.merchant.mode)
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B, merchant: MerchantConfig, notify_url: String) -> Self {
        Self { db, merchant, notify_url }
    }

    pub fn merchant(&self) -> &MerchantConfig {
        &self.merchant
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement
{
    /// Fills in the merchant defaults, creates (or fetches) the order and signs the result.
    ///
    /// * `notify_url`, `merchant_id` and `merchant_key` are set from configuration unless the caller supplied them.
    /// * The payer's name and email are used for the payer fields the caller left out.
    /// * With an `m_payment_id`, the matching order is fetched or created. Without one, a new order is created and
    ///   its payment id is added to the fields.
    ///
    /// Fields outside the checkout vocabulary are rejected before anything is written.
    pub async fn prepare_checkout(&self, request: CheckoutRequest) -> Result<CheckoutForm, CheckoutApiError> {
        let CheckoutRequest { mut fields, payer } = request;
        fields.remove(SIGNATURE_FIELD);
        if let Some(payer) = payer {
            let payer_fields =
                [("name_first", payer.first_name), ("name_last", payer.last_name), ("email_address", payer.email)];
            for (name, value) in payer_fields {
                if let Some(value) = value {
                    fields.set_default(name, value);
                }
            }
        }
        fields.set_default("notify_url", self.notify_url.as_str());
        fields.set_default("merchant_id", self.merchant.merchant_id.as_str());
        fields.set_default("merchant_key", self.merchant.merchant_key.reveal().as_str());
        canonicalize(&fields, &CHECKOUT_FIELD_ORDER, true)?;

        let amount = fields.get("amount").map(str::trim).filter(|a| !a.is_empty()).map(str::parse::<Amount>);
        let amount = amount.transpose()?;
        let payment_id = fields.get("m_payment_id").map(str::trim).filter(|id| !id.is_empty()).map(PaymentId::from);
        let order = match payment_id {
            Some(payment_id) => {
                let new_order = NewOrder::new(amount).with_payment_id(payment_id);
                let (order, created) = self.db.get_or_create_order(new_order).await?;
                if created {
                    debug!("🛒️ Created order {} for checkout", order.m_payment_id);
                } else {
                    debug!("🛒️ Reusing order {} for checkout", order.m_payment_id);
                }
                order
            },
            None => {
                let order = self.db.create_order(NewOrder::new(amount)).await?;
                debug!("🛒️ Created order {} for checkout", order.m_payment_id);
                fields.insert("m_payment_id", order.m_payment_id.as_str());
                order
            },
        };

        let signature = checkout_signature(&fields)?;
        fields.insert(SIGNATURE_FIELD, signature);
        info!("🛒️ Checkout for order {} is ready", order.m_payment_id);
        let action = self.merchant.process_url();
        Ok(CheckoutForm { action, m_payment_id: order.m_payment_id, fields: fields.into_pairs() })
    }
}
