/// Database configuration and connection management
pub mod database;

/// Invoicing defaults and catalog seed data from config.toml
pub mod settings;
