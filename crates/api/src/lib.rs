//! HTTP API: server, routing, and request/response mapping.
//!
//! Every route is bound to a named operation from [`operations`]. The
//! authentication middleware only records who is calling; the per-route
//! [`authz::enforce`] layer decides whether the call may proceed, before any
//! handler extractor runs.

pub mod app;
pub mod authz;
pub mod middleware;
pub mod operations;
