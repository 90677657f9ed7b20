//! Integration test suite, driven end to end against a mock org.
//!
//! Every flow runs the full stack: credentials or session in, wiremock
//! answering the org side, assertions on both the wire traffic and the
//! decoded results. Run with:
//!   cargo test --test integration

#[path = "integration/common.rs"]
mod common;
#[path = "integration/auth.rs"]
mod auth;
#[path = "integration/rest.rs"]
mod rest;
#[path = "integration/bulk.rs"]
mod bulk;
