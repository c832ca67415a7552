use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use payfast_engine::{
    events::EventProducers,
    postback::HttpPostbackClient,
    trust::TrustEvaluator,
    CheckoutApi,
    NotificationApi,
    SqliteDatabase,
};

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::payment_log::create_payment_log_handlers,
    routes::{health, CheckoutRoute, NotifyRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_payment_log_handlers();
    let producers = handlers.producers();
    let srv = create_server_instance(config, db, producers)?;
    handlers.start_handlers().await;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let notify_url = config.notify_url()?;
    info!("💻️ The gateway will post notifications to {notify_url}");
    let postback = HttpPostbackClient::new(config.merchant.server_url(), config.postback_timeout)
        .map_err(|e| ServerError::InitializeError(format!("Could not create the postback client. {e}")))?;
    if config.trust.use_postback {
        info!("💻️ Notifications are confirmed against {}", postback.url());
    }
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(db.clone(), config.merchant.clone(), notify_url.clone());
        let evaluator = TrustEvaluator::new(config.trust.clone(), postback.clone());
        let notification_api = NotificationApi::new(db.clone(), evaluator, producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pfg::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(notification_api))
            .app_data(web::Data::new(options.clone()))
            .service(health)
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(NotifyRoute::<SqliteDatabase, HttpPostbackClient>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
