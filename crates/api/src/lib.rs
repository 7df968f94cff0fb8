//! HTTP API: configuration, routing, and request/response mapping for the
//! family registry and expense ledger.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
