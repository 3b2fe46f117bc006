//! Core business logic - framework-agnostic invoicing operations.
//!
//! Pure pieces (`aggregate`, `numbering`, `lifecycle`, `period`) hold the rules;
//! `invoice` and `time_entry` apply them against the database.

/// Grouping of draft time entries into priced line items
pub mod aggregate;
/// Explicit caller identity and role guards
pub mod caller;
/// Catalog (clients, projects, categories) lookups and seeding
pub mod catalog;
/// Invoice generation and lifecycle transitions
pub mod invoice;
/// Legal invoice status moves and their time-entry side effects
pub mod lifecycle;
/// Deterministic invoice numbers
pub mod numbering;
/// Inclusive date ranges
pub mod period;
/// Logging and listing time entries
pub mod time_entry;
/// User roles and hourly rates
pub mod user;

pub use caller::Caller;
pub use period::Period;
