use std::{future::Future, pin::Pin};

use log::*;
use payfast_engine::{
    db_types::Order,
    events::{EventHandlers, EventHooks},
};
use pfg_common::Amount;

pub const PAYMENT_LOG_BUFFER_SIZE: usize = 25;

/// Writes every accepted payment notification to the `pfg::payments` log target.
///
/// This gives operators an audit trail of confirmed payments that is separate from the access and debug logs.
pub fn create_payment_log_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_notification_accepted(|ev| {
        let order = ev.order;
        Box::pin(async move {
            info!(target: "pfg::payments", "{}", payment_log_line(&order));
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    EventHandlers::new(PAYMENT_LOG_BUFFER_SIZE, hooks)
}

fn payment_log_line(order: &Order) -> String {
    let details = &order.details;
    let amount = |a: Option<Amount>| a.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
    format!(
        "💰️ Order {} | pf_payment_id: {} | status: {} | gross: {} | fee: {} | net: {} | from {}",
        order.m_payment_id,
        details.pf_payment_id.as_deref().unwrap_or("-"),
        details.payment_status.as_deref().unwrap_or("-"),
        amount(details.amount_gross),
        amount(details.amount_fee),
        amount(details.amount_net),
        order.request_ip.as_deref().unwrap_or("unknown"),
    )
}
