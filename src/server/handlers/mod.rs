//! HTTP handlers for the server.

pub mod catalog;
pub mod checkout;
pub mod session;
