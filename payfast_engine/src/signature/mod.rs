//! # Field signatures
//!
//! PayFast authenticates both directions of the checkout flow with the same scheme:
//!
//! 1. The fields are canonicalized ([`canonicalize`]): the `signature` field is dropped, every remaining name must
//!    belong to the fixed vocabulary for the direction, and the pairs are emitted in the fixed canonical order.
//! 2. The ordered pairs are serialized as `application/x-www-form-urlencoded` and hashed with MD5 ([`sign`]).
//!
//! Checkout submissions ([`checkout_signature`]) strip surrounding whitespace and skip empty values. Notification
//! callbacks ([`notification_signature`]) keep empty values verbatim, since we have to reproduce the gateway's
//! serialization exactly.
//!
//! The field order is part of the contract. Changing [`CHECKOUT_FIELD_ORDER`] or [`NOTIFICATION_FIELD_ORDER`] changes
//! every signature.
mod canonical;
mod field_order;
mod field_set;
mod signer;

pub use canonical::{canonicalize, canonicalize_with, UnknownFieldError, CHECKOUT_SIGNATURE_IGNORED_WHITESPACE};
pub use field_order::{CHECKOUT_FIELD_ORDER, NOTIFICATION_FIELD_ORDER, SIGNATURE_FIELD};
pub use field_set::FieldSet;
pub use signer::{checkout_signature, form_encode, notification_signature, sign};
