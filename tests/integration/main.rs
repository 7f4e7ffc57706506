//! Integration tests for the SpiceDB builtins.
//!
//! Every test drives [`rego_spicedb::Bridge`] end to end against the
//! in-memory [`rego_spicedb::testing::MockBackend`], so no SpiceDB server
//! is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With bridge logs
//! RUST_LOG=rego_spicedb=debug cargo test --test integration -- --nocapture
//! ```

#![allow(clippy::unwrap_used)]

mod builtins_tests;
mod check_tests;
mod common;
mod lookup_tests;
mod relationship_tests;
