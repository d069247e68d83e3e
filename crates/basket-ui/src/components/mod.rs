//! Reusable line builders shared by the dashboard tabs.

pub mod bar_chart;
pub mod header;
pub mod metrics;
