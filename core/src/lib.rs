//! Client-side core for the accountability tracker.
//!
//! Owns everything between the transport client and the rendering layer:
//! configuration, the derived-metrics calculators, the dashboard state
//! machine, and the refetch choreography that keeps client state in step
//! with the backend after each mutation.

pub mod config;
pub mod derived;
pub mod state;
pub mod sync;

pub use config::{Config, ConfigError};
pub use state::{DashboardState, DateRange, Loadable, Ranges};
pub use sync::{BULK_REFRESH, MutationKind, ReadEndpoint, ReadOutcome, Synchronizer};
