//! HTTP handlers serving check reports

pub mod health;
pub mod routes;
