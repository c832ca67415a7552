use payfast_engine::{
    checkout_objects::{notify_url, CheckoutRequest, MerchantConfig, Payer},
    db_types::PaymentId,
    signature::FieldSet,
    traits::OrderManagement,
    CheckoutApi,
    CheckoutApiError,
};
use pfg_common::Amount;

mod support;

fn checkout_fields() -> FieldSet {
    FieldSet::new()
        .with("name_first", "Вася")
        .with("name_last", "Пупников")
        .with("m_payment_id", "23")
        .with("amount", "234")
        .with("item_name", "Payment (Планета суши). ID:272-15")
}

fn api(db: payfast_engine::SqliteDatabase) -> CheckoutApi<payfast_engine::SqliteDatabase> {
    let notify = notify_url("http://127.0.0.1:8000").unwrap();
    CheckoutApi::new(db, MerchantConfig::sandbox(), notify)
}

#[tokio::test]
async fn signed_checkout_with_payment_id() {
    let db = support::new_test_db().await;
    let api = api(db.clone());
    let form = api.prepare_checkout(CheckoutRequest::new(checkout_fields())).await.unwrap();
    assert_eq!(form.action, "https://sandbox.payfast.co.za/eng/process");
    assert_eq!(form.signature(), Some("481366608545707be67c6514386b3fb1"));
    assert_eq!(form.field("merchant_id"), Some("10000100"));
    assert_eq!(form.field("merchant_key"), Some("46f0cd694581a"));
    assert_eq!(form.field("notify_url"), Some("http://127.0.0.1:8000/payfast/notify/"));
    assert_eq!(form.m_payment_id, PaymentId::from("23"));

    let order = db.fetch_order(&PaymentId::from("23")).await.unwrap().unwrap();
    assert_eq!(order.details.amount_gross, Some(Amount::from(234)));

    // Checking out again reuses the order, and picks up the new amount
    let fields = checkout_fields().with("amount", "250.50");
    let form = api.prepare_checkout(CheckoutRequest::new(fields)).await.unwrap();
    assert_eq!(form.m_payment_id, PaymentId::from("23"));
    let again = db.fetch_order(&PaymentId::from("23")).await.unwrap().unwrap();
    assert_eq!(again.id, order.id);
    assert_eq!(again.details.amount_gross, Some(Amount::from_cents(25050)));
    support::tear_down(db).await;
}

#[tokio::test]
async fn checkout_without_payment_id_creates_new_orders() {
    let db = support::new_test_db().await;
    let api = api(db.clone());
    let mut fields = checkout_fields();
    fields.remove("m_payment_id");
    let first = api.prepare_checkout(CheckoutRequest::new(fields.clone())).await.unwrap();
    let second = api.prepare_checkout(CheckoutRequest::new(fields)).await.unwrap();
    assert_ne!(first.m_payment_id, second.m_payment_id);
    assert_eq!(first.field("m_payment_id"), Some(first.m_payment_id.as_str()));
    assert_ne!(first.signature(), second.signature());
    assert!(db.fetch_order(&second.m_payment_id).await.unwrap().is_some());
    support::tear_down(db).await;
}

#[tokio::test]
async fn payer_fills_in_missing_fields() {
    let db = support::new_test_db().await;
    let api = api(db.clone());
    let mut fields = checkout_fields();
    fields.remove("name_last");
    let payer = Payer {
        first_name: Some("Ignored".into()),
        last_name: Some("Пупников".into()),
        email: Some("vasya@example.com".into()),
    };
    let form = api.prepare_checkout(CheckoutRequest::new(fields).with_payer(payer)).await.unwrap();
    assert_eq!(form.field("name_first"), Some("Вася"));
    assert_eq!(form.field("name_last"), Some("Пупников"));
    assert_eq!(form.field("email_address"), Some("vasya@example.com"));
    support::tear_down(db).await;
}

#[tokio::test]
async fn invalid_checkouts() {
    let db = support::new_test_db().await;
    let api = api(db.clone());
    let fields = checkout_fields().with("pf_payment_id", "1");
    let err = api.prepare_checkout(CheckoutRequest::new(fields)).await.unwrap_err();
    assert!(matches!(err, CheckoutApiError::UnknownFields(_)));
    // Nothing was written
    assert!(db.fetch_order(&PaymentId::from("23")).await.unwrap().is_none());

    let fields = checkout_fields().with("amount", "12.345");
    let err = api.prepare_checkout(CheckoutRequest::new(fields)).await.unwrap_err();
    assert!(matches!(err, CheckoutApiError::InvalidAmount(_)));
    support::tear_down(db).await;
}
