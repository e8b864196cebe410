//! HTTP client for the accountability tracker backend.
//!
//! Thin transport layer: one async function per backend operation, typed
//! request/response bodies, and the shared-secret header. All business logic
//! (streaks, weekly review, aggregation) lives server-side; nothing here
//! interprets the data beyond deserializing it.

mod auth;
mod client;
mod error;
mod types;

pub use auth::{load_app_password, store_app_password};
pub use client::{ApiClient, DEFAULT_ORIGIN, REQUEST_TIMEOUT, resolve_base_url};
pub use error::{ClientError, Result};
pub use types::*;
