//! Booking marketplace backend core.
//!
//! Holds the marketplace data model, the read-only store seam the admin
//! analytics query, and the advanced dashboard itself.

pub mod analytics;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
