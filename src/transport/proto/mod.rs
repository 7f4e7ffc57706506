//! Protobuf types and client stubs for `authzed.api.v1`.

#![allow(clippy::all, clippy::pedantic, missing_docs, dead_code, deprecated)]

include!("authzed.api.v1.rs");
