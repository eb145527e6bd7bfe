// Stay Analytics - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod aggregation;
pub mod analytics;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod ranking;
pub mod report;
pub mod resolver;
pub mod seed;
pub mod snapshot;
pub mod telemetry;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use analytics::Analytics;
pub use config::{AppConfig, Environment};
pub use db::{insert_snapshot, load_snapshot, setup_database, SqliteStore};
pub use entities::{
    City, EntityId, ForeignKey, Listing, Neighborhood, Record, Reservation, ReservationStatus,
    Review, User,
};
pub use error::{AnalyticsError, Result};
pub use report::AnalyticsReport;
pub use resolver::{Path, Related, Resolver};
pub use seed::{demo_snapshot, seed_database};
pub use snapshot::{EntityStore, Snapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
