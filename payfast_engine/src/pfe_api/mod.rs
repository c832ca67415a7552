//! # PayFast engine public API
//!
//! The `pfe_api` module exposes the programmatic API of the payment engine. Each API is created by supplying a
//! backend that implements the traits it needs, so clients pick only the functionality they want.
//!
//! * [`checkout_api`] prepares signed checkout forms and creates the orders they pay for.
//! * [`notification_api`] receives payment notifications, decides whether to trust them and records the outcome.
//!
//! ```rust,ignore
//! use payfast_engine::{CheckoutApi, SqliteDatabase, checkout_objects::{CheckoutRequest, MerchantConfig}};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = CheckoutApi::new(db, MerchantConfig::sandbox(), notify_url);
//! let form = api.prepare_checkout(CheckoutRequest::new(fields)).await?;
//! ```
pub mod checkout_api;
pub mod checkout_objects;
pub mod errors;
pub mod notification_api;
pub mod notification_objects;
