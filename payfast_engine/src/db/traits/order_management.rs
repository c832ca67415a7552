use thiserror::Error;

use crate::db_types::{NewOrder, NotificationUpdate, Order, PaymentId};

#[derive(Debug, Clone, Error)]
pub enum OrderManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(PaymentId),
    #[error("Order {0} already exists")]
    DuplicateOrder(PaymentId),
}

impl From<sqlx::Error> for OrderManagementError {
    fn from(e: sqlx::Error) -> Self {
        OrderManagementError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines the lifecycle of an order record: it is created at checkout, and updated each
/// time a notification for it is received. Orders are never deleted.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given merchant payment id. If no such order exists, `None` is returned.
    async fn fetch_order(&self, payment_id: &PaymentId) -> Result<Option<Order>, OrderManagementError>;

    /// Fetches the order that the gateway transaction `pf_payment_id` has been recorded against, if any.
    async fn fetch_order_by_pf_payment_id(&self, pf_payment_id: &str) -> Result<Option<Order>, OrderManagementError>;

    /// Creates a brand-new order.
    ///
    /// If the order does not carry a payment id, the order's own row id (as text) is assigned to it. If it does, and
    /// an order with that payment id exists already, [`OrderManagementError::DuplicateOrder`] is returned.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderManagementError>;

    /// Fetches the order with the new order's payment id, or creates it if it does not exist yet. The second element
    /// of the result is `true` if the order was created.
    ///
    /// If the order exists but was created for a different amount, the amount is updated.
    async fn get_or_create_order(&self, order: NewOrder) -> Result<(Order, bool), OrderManagementError>;

    /// Records the outcome of a notification on the order in a single atomic update, and returns the updated order.
    async fn save_notification(
        &self,
        payment_id: &PaymentId,
        update: NotificationUpdate,
    ) -> Result<Order, OrderManagementError>;
}
