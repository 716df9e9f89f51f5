//! HTTP surface for the workflow session

pub mod handlers;
pub mod routes;
