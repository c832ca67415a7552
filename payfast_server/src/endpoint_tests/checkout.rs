use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use payfast_engine::{
    checkout_objects::{notify_url, MerchantConfig},
    db_types::PaymentId,
    CheckoutApi,
};
use pfg_common::Amount;
use serde_json::{json, Value};

use super::{
    helpers::{pending_order, post_request},
    mocks::MockOrderManager,
};
use crate::routes::CheckoutRoute;

fn configure(store: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let notify_url = notify_url("http://127.0.0.1:8000").unwrap();
        let api = CheckoutApi::new(store, MerchantConfig::sandbox(), notify_url);
        cfg.service(CheckoutRoute::<MockOrderManager>::new()).app_data(web::Data::new(api));
    }
}

fn checkout_request(body: Value) -> TestRequest {
    TestRequest::post().uri("/checkout").set_json(body)
}

#[actix_web::test]
async fn signed_checkout_form() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderManager::new();
    store.expect_get_or_create_order().times(1).returning(|order| {
        assert_eq!(order.m_payment_id, Some(PaymentId::from("23")));
        assert_eq!(order.amount_gross, Some(Amount::from(234)));
        Ok((pending_order("23"), true))
    });
    store.expect_create_order().never();
    let body = json!({
        "fields": {"m_payment_id": "23", "amount": "234", "item_name": "Payment (Планета суши). ID:272-15"},
        "payer": {"first_name": "Вася", "last_name": "Пупников"}
    });
    let (status, body) =
        post_request(checkout_request(body), "127.0.0.1", configure(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let form: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(form["action"], "https://sandbox.payfast.co.za/eng/process");
    assert_eq!(form["m_payment_id"], "23");
    let fields = form["fields"].as_array().unwrap();
    assert!(fields.contains(&json!(["notify_url", "http://127.0.0.1:8000/payfast/notify/"])));
    assert!(fields.contains(&json!(["merchant_id", "10000100"])));
    assert!(fields.contains(&json!(["name_first", "Вася"])));
    assert_eq!(fields.last(), Some(&json!(["signature", "481366608545707be67c6514386b3fb1"])));
}

#[actix_web::test]
async fn checkout_without_payment_id() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderManager::new();
    store.expect_get_or_create_order().never();
    store.expect_create_order().times(1).returning(|order| {
        assert_eq!(order.m_payment_id, None);
        Ok(pending_order("17"))
    });
    let body = json!({"fields": {"amount": "123", "item_name": "Flux capacitor"}});
    let (status, body) =
        post_request(checkout_request(body), "127.0.0.1", configure(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let form: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(form["m_payment_id"], "17");
    assert!(form["fields"].as_array().unwrap().contains(&json!(["m_payment_id", "17"])));
}

#[actix_web::test]
async fn checkout_with_unknown_fields() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderManager::new();
    store.expect_get_or_create_order().never();
    store.expect_create_order().never();
    let body = json!({"fields": {"amount": "123", "item_name": "Flux capacitor", "bogus": "1"}});
    let (status, body) =
        post_request(checkout_request(body), "127.0.0.1", configure(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request body: Data contains unexpected fields: bogus"}"#);
}

#[actix_web::test]
async fn checkout_with_malformed_body() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderManager::new();
    store.expect_get_or_create_order().never();
    store.expect_create_order().never();
    let req = TestRequest::post()
        .uri("/checkout")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"fields": ["amount", "123"]}"#);
    let (status, body) = post_request(req, "127.0.0.1", configure(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Payload deserialization error"}"#);
}
