//! # PFG server
//! This module hosts the HTTP server of the PayFast gateway integration. It is responsible for:
//! * Preparing signed checkout forms for the storefront, creating an order for each.
//! * Receiving payment notifications (ITNs) from PayFast, vetting them, and recording the outcome against their
//!   orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/checkout`: Returns the signed checkout form for the posted JSON fields.
//! * `/payfast/notify/`: The notification endpoint that PayFast posts ITNs to.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
