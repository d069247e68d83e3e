//! Data layer for Bread Basket.
//!
//! Loads the transaction CSV into an immutable dataset, runs the basket
//! aggregations (item frequency, co-occurrence, daypart volume) and the
//! derived analyses shown on the dashboard tabs.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use basket_core as core;
