use std::net::SocketAddr;

use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use log::debug;
use payfast_engine::{
    db_types::{NotificationFields, NotificationUpdate, Order, PaymentId, TrustFlag},
    signature::{form_encode, notification_signature, FieldSet},
};
use pfg_common::Amount;

pub const GATEWAY_IP: &str = "197.97.145.145";

pub async fn post_request<F>(
    req: TestRequest,
    peer: &str,
    configure: F,
) -> Result<(StatusCode, String), String>
where
    F: FnOnce(&mut ServiceConfig),
{
    let peer = format!("{peer}:443").parse::<SocketAddr>().map_err(|e| e.to_string())?;
    let req = req.peer_addr(peer).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

/// An order for 123.00 that has not received any notifications yet
pub fn pending_order(payment_id: &str) -> Order {
    let details = NotificationFields { amount_gross: Some(Amount::from(123)), ..NotificationFields::default() };
    Order {
        id: 1,
        m_payment_id: PaymentId::from(payment_id),
        details,
        request_ip: None,
        debug_info: None,
        trusted: TrustFlag::Unknown,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    }
}

/// What the store would return after applying `update` to `order`
pub fn apply_update(mut order: Order, update: NotificationUpdate) -> Order {
    order.request_ip = update.request_ip;
    order.debug_info = Some(update.debug_info);
    order.trusted = update.trusted;
    if let Some(fields) = update.fields {
        order.details = fields;
    }
    order
}

/// A correctly signed sandbox ITN for 123.00
pub fn itn_body(payment_id: &str) -> String {
    let mut itn = FieldSet::new()
        .with("m_payment_id", payment_id)
        .with("pf_payment_id", "558900")
        .with("payment_status", "COMPLETE")
        .with("item_name", "Flux capacitor")
        .with("item_description", "")
        .with("amount_gross", "123.00")
        .with("amount_fee", "-2.80")
        .with("amount_net", "120.20")
        .with("name_first", "Test")
        .with("name_last", "User 01")
        .with("email_address", "sbtu01@payfast.co.za")
        .with("merchant_id", "10000100");
    let signature = notification_signature(&itn).unwrap();
    itn.insert("signature", signature);
    form_encode(itn.iter())
}
