//! # Notification trust evaluation
//!
//! Notifications arrive unauthenticated over plain HTTP, so nothing in them can be taken at face value until the
//! [`TrustEvaluator`] has run its checks. See [`TrustEvaluator`] for the order in which they run.
//!
//! * [`origins`] holds the source IP allow-list.
//! * [`schema`] describes each notification field and drives the field validators.
//! * [`errors`] defines [`TrustError`] and the aggregated [`Rejection`].
mod config;
mod evaluator;
mod validators;

pub mod errors;
pub mod origins;
pub mod schema;

pub use config::{AmountMatchPolicy, PostbackFailurePolicy, TrustConfig};
pub use errors::{ErrorDetail, Rejection, TrustError, NON_FIELD_ERRORS};
pub use evaluator::{verify_notification_signature, TrustEvaluator, Verdict};
pub use origins::{InvalidIpRange, TrustedOrigins, DEFAULT_TRUSTED_ORIGINS};
pub use validators::{check_amount, check_merchant, clean_fields};
