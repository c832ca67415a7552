//! # Order store interface
//!
//! This module defines the behaviour that an order store backend must expose in order to be used by the payment
//! engine APIs. The engine never talks to a database directly.
//!
//! * [`OrderManagement`] creates orders at checkout and records the outcome of each notification.
mod order_management;

pub use order_management::{OrderManagement, OrderManagementError};
