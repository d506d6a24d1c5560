//! Integration tests for the Easel API.
//!
//! API tests drive a spawned server through the `clients` library, so the
//! API is exercised from a client's perspective. Store tests run the Postgres
//! backend against a database provided by `#[sqlx::test]`.

mod api;
mod db;
mod helpers;

pub use helpers::*;
