//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the database and the gateway postback,
//! so none of them hold up the worker while they wait.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use payfast_engine::{
    checkout_objects::CheckoutRequest,
    notification_objects::{NotificationOutcome, NotificationRequest},
    postback::PostbackClient,
    traits::OrderManagement,
    CheckoutApi,
    NotificationApi,
};

use crate::{config::ServerOptions, data_objects::CheckoutParams, errors::ServerError, helpers::get_remote_ip};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl OrderManagement);
/// Route handler for the checkout endpoint
///
/// The storefront posts the fields of the purchase, and optionally the paying customer's details. The merchant
/// credentials and notify URL are filled in from the server configuration. The response is the signed form, which the
/// storefront renders and submits to the `action` URL.
///
/// A body that is not valid JSON, or fields that are not part of the checkout vocabulary, result in a 400 response
/// and no order is created.
pub async fn checkout<B: OrderManagement>(
    body: web::Bytes,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received checkout request");
    let payload = std::str::from_utf8(body.as_ref()).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let params: CheckoutParams = serde_json::from_str(payload).map_err(|e| {
        debug!("💻️ Could not deserialize checkout payload. {e}");
        ServerError::CouldNotDeserializePayload
    })?;
    let request = CheckoutRequest::from(params);
    let form = api.prepare_checkout(request).await.map_err(|e| {
        debug!("💻️ Could not prepare checkout. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(form))
}

//----------------------------------------------   Notify  ----------------------------------------------------
route!(notify => Post "/payfast/notify/" impl OrderManagement, PostbackClient);
/// Route handler for the ITN (instant transaction notification) endpoint
///
/// The gateway posts a form-encoded notification here for every payment event. The notification is vetted and the
/// outcome recorded against the order before we answer.
///
/// * A trusted notification gets a 200 with an empty body.
/// * An untrusted notification gets a 400 with the reasons as JSON, keyed by field (`__all__` for reasons that concern
///   the notification as a whole).
/// * If the gateway could not be reached to confirm the notification, and the server is configured to treat that as
///   inconclusive, the answer is 503 so that the gateway sends it again.
/// * Notifications for unknown orders get a 404 and nothing is recorded.
pub async fn notify<B: OrderManagement, P: PostbackClient>(
    req: HttpRequest,
    body: web::Bytes,
    options: web::Data<ServerOptions>,
    api: web::Data<NotificationApi<B, P>>,
) -> Result<HttpResponse, ServerError> {
    // Undecodable bytes are replaced so the attempt is still evaluated and recorded. The signature check rejects it.
    let raw_body = String::from_utf8_lossy(&body).into_owned();
    let source_ip = get_remote_ip(&req, &options.ip_source);
    trace!("💻️ Received notification from {source_ip:?}");
    let outcome = api.process_notification(NotificationRequest::new(raw_body, source_ip)).await.map_err(|e| {
        debug!("💻️ Could not process notification. {e}");
        ServerError::from(e)
    })?;
    let response = match outcome {
        NotificationOutcome::Accepted(_) => HttpResponse::Ok().finish(),
        NotificationOutcome::Rejected { rejection, .. } => HttpResponse::BadRequest().json(rejection.to_error_map()),
        NotificationOutcome::Inconclusive { rejection, .. } => {
            HttpResponse::ServiceUnavailable().json(rejection.to_error_map())
        },
    };
    Ok(response)
}
