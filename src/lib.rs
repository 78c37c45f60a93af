//! Simulcast - anime broadcast schedule aggregator
//!
//! This library crate exposes configuration loading, listing decoding and the
//! aggregation pipeline for the binary and for integration testing.

pub mod aggregate;
pub mod config;
pub mod listing;
