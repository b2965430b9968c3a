//! HTTP API: server, routing, and request/response mapping for job analyses.

pub mod app;
pub mod context;
pub mod middleware;
