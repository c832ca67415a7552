use pfg_common::AmountParseError;
use thiserror::Error;

use crate::{db_types::PaymentId, signature::UnknownFieldError, traits::OrderManagementError};

#[derive(Debug, Clone, Error)]
pub enum CheckoutApiError {
    #[error("{0}")]
    UnknownFields(#[from] UnknownFieldError),
    #[error("The checkout amount is not valid. {0}")]
    InvalidAmount(#[from] AmountParseError),
    #[error("Order store error: {0}")]
    DatabaseError(#[from] OrderManagementError),
}

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("The notification does not carry a payment id")]
    MissingPaymentId,
    #[error("Order {0} does not exist")]
    OrderNotFound(PaymentId),
    #[error("Order store error: {0}")]
    DatabaseError(#[from] OrderManagementError),
}
