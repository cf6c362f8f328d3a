//! Middleware components for the health endpoints

pub mod logging;
pub mod secret;
