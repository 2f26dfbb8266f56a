#![forbid(unsafe_code)]

//! Core domain model and business logic for fitlog.
//!
//! This crate provides:
//! - Domain types (exercises, daily records, profile, energy estimates)
//! - The exercise catalog
//! - Energy estimation and the aggregation engine
//! - Persistence (record store, profile) and CSV export
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod catalog;
pub mod calendar;
pub mod config;
pub mod logging;
pub mod estimator;
pub mod aggregate;
pub mod store;
pub mod profile;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use estimator::{compute_repetition_energy, compute_walking_energy, estimate, EnergyModel};
pub use aggregate::{
    daily_total_energy, day_breakdown, exercise_status, is_fully_complete, monthly_streak,
    monthly_summary, series_energy, MonthlySummary, Series, StatsContext,
};
pub use store::{set_quantity, JsonFileStore, MemoryStore, RecordStore};
pub use export::export_csv;
