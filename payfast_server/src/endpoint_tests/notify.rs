use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use payfast_engine::{
    db_types::{Order, TrustFlag},
    events::EventProducers,
    postback::{PostbackError, PostbackOutcome},
    trust::{PostbackFailurePolicy, TrustConfig, TrustEvaluator},
    NotificationApi,
};

use super::{
    helpers::{apply_update, itn_body, pending_order, post_request, GATEWAY_IP},
    mocks::{MockOrderManager, MockPostback},
};
use crate::{
    config::{IpSource, ServerOptions},
    routes::NotifyRoute,
};

fn notify_request(body: String) -> TestRequest {
    TestRequest::post()
        .uri("/payfast/notify/")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(body)
}

/// A store holding order "1", which expects exactly `saves` notifications to be written with the given trust flag
fn order_store(saves: usize, expected_flag: TrustFlag) -> MockOrderManager {
    let mut store = MockOrderManager::new();
    store.expect_fetch_order().returning(|id| Ok((id.as_str() == "1").then(|| pending_order("1"))));
    store.expect_fetch_order_by_pf_payment_id().returning(|_| Ok(None));
    store.expect_save_notification().times(saves).returning(move |id, update| {
        assert_eq!(id.as_str(), "1");
        assert_eq!(update.trusted, expected_flag);
        Ok(apply_update(pending_order("1"), update))
    });
    store
}

fn postback(outcome: Result<PostbackOutcome, PostbackError>, calls: usize) -> MockPostback {
    let mut postback = MockPostback::new();
    postback.expect_confirm().times(calls).returning(move |fields| {
        assert_eq!(fields.get("m_payment_id"), Some("1"));
        outcome.clone()
    });
    postback
}

fn configure(
    store: MockOrderManager,
    postback: MockPostback,
    trust: TrustConfig,
    ip_source: IpSource,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = NotificationApi::new(store, TrustEvaluator::new(trust, postback), EventProducers::default());
        cfg.service(NotifyRoute::<MockOrderManager, MockPostback>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(ServerOptions { ip_source }));
    }
}

#[actix_web::test]
async fn trusted_notification() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Trusted),
        postback(Ok(PostbackOutcome::Valid), 1),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("1")), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn notification_from_untrusted_ip() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Valid), 0),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("1")), "127.0.0.1", config).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"__all__":[{"code":"","message":"untrusted ip: 127.0.0.1"}]}"#);
}

#[actix_web::test]
async fn notification_behind_a_proxy() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Trusted),
        postback(Ok(PostbackOutcome::Valid), 1),
        TrustConfig::new("10000100"),
        IpSource::XForwardedFor,
    );
    let req = notify_request(itn_body("1")).insert_header(("X-Forwarded-For", "41.74.179.194, 10.0.0.1"));
    let (status, _) = post_request(req, "10.0.0.1", config).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn notification_rejected_by_postback() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Invalid), 1),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("1")), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"__all__":[{"code":"","message":"Postback validation fails"}]}"#);
}

#[actix_web::test]
async fn tampered_notification() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Valid), 0),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let body = itn_body("1").replace("amount_gross=123.00", "amount_gross=1.00");
    let (status, body) = post_request(notify_request(body), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"__all__":[{"code":"","message":"Signature is invalid: "#));
}

#[actix_web::test]
async fn transaction_already_recorded_on_another_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockOrderManager::new();
    store.expect_fetch_order().returning(|_| Ok(Some(pending_order("1"))));
    store.expect_fetch_order_by_pf_payment_id().times(1).returning(|pf_payment_id| {
        assert_eq!(pf_payment_id, "558900");
        Ok(Some(Order { id: 2, ..pending_order("2") }))
    });
    store.expect_save_notification().times(1).returning(|_, update| {
        assert_eq!(update.trusted, TrustFlag::Untrusted);
        assert!(update.fields.is_none());
        Ok(apply_update(pending_order("1"), update))
    });
    let config = configure(
        store,
        postback(Ok(PostbackOutcome::Valid), 1),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("1")), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        r#"{"pf_payment_id":[{"code":"unique","message":"PayFast order with this Pf payment id already exists."}]}"#
    );
}

#[actix_web::test]
async fn body_that_is_not_utf8_is_recorded_as_untrusted() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(1, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Valid), 0),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let mut payload = itn_body("1").into_bytes();
    payload.extend_from_slice(b"&item_description=caf\xe9");
    let req = TestRequest::post()
        .uri("/payfast/notify/")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(payload);
    let (status, body) = post_request(req, GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"__all__":[{"code":"","message":"Signature is invalid: "#));
}

#[actix_web::test]
async fn unreachable_gateway_is_inconclusive() {
    let _ = env_logger::try_init().ok();
    let trust = TrustConfig::new("10000100").with_postback_failure(PostbackFailurePolicy::Inconclusive);
    let config = configure(
        order_store(1, TrustFlag::Untrusted),
        postback(Err(PostbackError::Transport("timed out".into())), 1),
        trust,
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("1")), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, r#"{"__all__":[{"code":"","message":"Postback fails: timed out"}]}"#);
}

#[actix_web::test]
async fn notification_for_unknown_order() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(0, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Valid), 0),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let (status, body) = post_request(notify_request(itn_body("2")), GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order 2 does not exist"}"#);
}

#[actix_web::test]
async fn notification_without_payment_id() {
    let _ = env_logger::try_init().ok();
    let config = configure(
        order_store(0, TrustFlag::Untrusted),
        postback(Ok(PostbackOutcome::Valid), 0),
        TrustConfig::new("10000100"),
        IpSource::RemoteAddr,
    );
    let req = notify_request("payment_status=COMPLETE&amount_gross=1.00".to_string());
    let (status, _) = post_request(req, GATEWAY_IP, config).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}
