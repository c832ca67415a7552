use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Emitted after a trusted notification has been saved. This is the signal to fulfil the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAcceptedEvent {
    pub order: Order,
}

impl NotificationAcceptedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
