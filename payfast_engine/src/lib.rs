//! PayFast Payment Engine
//!
//! The payment engine is the provider-facing core of the PayFast gateway integration. It signs outbound checkout
//! submissions, and decides whether inbound payment notifications (ITNs) can be trusted before recording them against
//! their orders.
//!
//! The library is divided into these sections:
//! 1. Signatures ([`mod@signature`]). Canonical field ordering and the MD5 signature scheme shared by checkouts and
//!    notifications.
//! 2. Trust evaluation ([`mod@trust`]) and out-of-band confirmation with the gateway ([`mod@postback`]).
//! 3. Order storage. Backends implement the traits in [`mod@traits`]. SQLite is the supported backend. The data types
//!    used in the store are defined in [`mod@db_types`].
//! 4. The payment engine public API ([`CheckoutApi`] and [`NotificationApi`]).
//!
//! The engine also emits events that can be subscribed to. A trusted notification results in a
//! [`events::NotificationAcceptedEvent`] once the order has been updated.
mod db;

pub mod db_types;
pub mod events;
pub mod helpers;
mod pfe_api;
pub mod postback;
pub mod signature;
pub mod trust;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits;
pub use pfe_api::{
    checkout_api::CheckoutApi,
    checkout_objects,
    errors::{CheckoutApiError, NotificationApiError},
    notification_api::NotificationApi,
    notification_objects,
};
