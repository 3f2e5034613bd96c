//! Periodic gym occupancy sampling and chart reporting.
//!
//! The collector appends one timestamped reading per invocation to a per-day
//! CSV partition; the reporter filters the accumulated partitions into a
//! trailing time window and renders a threshold-colored bar chart.

pub mod chart;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod store;
