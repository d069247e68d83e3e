//! Runtime layer for Bread Basket.
//!
//! Owns the loaded dataset for the lifetime of the process and turns
//! user-supplied filter strings into validated queries and dashboard
//! snapshots.

pub mod data_manager;
pub mod query;

pub use basket_core as core;
pub use basket_data as data;
