use thiserror::Error;

use crate::{db_types::PaymentId, traits::OrderManagementError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Cannot create duplicate order {0}")]
    DuplicateOrder(PaymentId),
    #[error("Order {0} does not exist")]
    OrderNotFound(PaymentId),
    #[error("Order #{0} disappeared while it was being created")]
    OrderVanished(i64),
}

impl From<SqliteDatabaseError> for OrderManagementError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateOrder(id) => OrderManagementError::DuplicateOrder(id),
            SqliteDatabaseError::OrderNotFound(id) => OrderManagementError::OrderNotFound(id),
            e => OrderManagementError::DatabaseError(e.to_string()),
        }
    }
}
