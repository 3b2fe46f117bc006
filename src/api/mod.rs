//! Request layer - typed request schemas and thin handlers over the core.
//!
//! Transport (HTTP routing, cookies) is left to the embedding server. Handlers
//! receive an already-authenticated [`Caller`](crate::core::Caller) and a
//! deserialized request, validate it, and call into `core`.

/// Thin async handlers, one per operation
pub mod handlers;
/// Per-operation request schemas and their validation
pub mod requests;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Shared state available to every handler.
/// Holds the database connection and the invoicing defaults.
pub struct AppState {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Rate for users without their own hourly rate
    pub default_hourly_rate: Decimal,
}

impl AppState {
    /// Creates a new `AppState` from a connection and the configured default rate.
    #[must_use]
    pub const fn new(database: DatabaseConnection, default_hourly_rate: Decimal) -> Self {
        Self {
            database,
            default_hourly_rate,
        }
    }
}

pub use handlers::*;
pub use requests::*;
