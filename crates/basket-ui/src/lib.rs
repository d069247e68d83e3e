//! Terminal UI layer for Bread Basket.
//!
//! Provides themes, bar-chart, header and metrics components, the tabbed
//! dashboard view, and the application event loop built on top of
//! [`ratatui`] and [`crossterm`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod themes;

pub use basket_core as core;
