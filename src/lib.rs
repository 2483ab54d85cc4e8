//! A small currency-conversion service.
//!
//! Rates are pulled from an external feed, re-based onto a fixed base currency and kept as a single snapshot.
//! Conversions are answered from that snapshot with exact decimal arithmetic.
pub mod api;
pub mod config;
pub mod convert;
pub mod data_objects;
pub mod errors;
pub mod exchange_rate;
pub mod feed;
pub mod latest_rates;
pub mod routes;
pub mod server;
pub mod store;

#[cfg(test)]
mod endpoint_tests;
