//! Core types for Bread Basket.
//!
//! Transaction rows, filters, derived table types, error enums, CLI settings
//! and the time-of-day helpers shared by the data, runtime and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
