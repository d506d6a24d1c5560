//! Easel library exports for the binary and integration tests.

pub mod api;
pub mod db;
