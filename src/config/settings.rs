//! Settings loading from config.toml
//!
//! The file carries the invoicing defaults and the users, clients, projects and
//! categories to seed on startup. Catalog administration is done by editing this
//! file; there is no CRUD surface for it.

use crate::entities::Role;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Rate applied when a user has no `default_hourly_rate` of their own.
pub const FALLBACK_HOURLY_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// Invoice generation defaults
    #[serde(default)]
    pub invoicing: InvoicingSettings,
    /// Users to seed
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Clients (with their projects) to seed
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
    /// Work categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// `[invoicing]` table
#[derive(Debug, Deserialize)]
pub struct InvoicingSettings {
    /// Hourly rate for users without their own rate
    #[serde(default = "default_hourly_rate")]
    pub default_hourly_rate: Decimal,
}

impl Default for InvoicingSettings {
    fn default() -> Self {
        Self {
            default_hourly_rate: FALLBACK_HOURLY_RATE,
        }
    }
}

const fn default_hourly_rate() -> Decimal {
    FALLBACK_HOURLY_RATE
}

/// A user entry under `[[users]]`
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// Identity provider's user id
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub default_hourly_rate: Option<Decimal>,
}

/// A client entry under `[[clients]]`
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub name: String,
    /// Project names under this client
    #[serde(default)]
    pub projects: Vec<String>,
}

/// A category entry under `[[categories]]`
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    pub name: String,
}

impl Settings {
    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.invoicing.default_hourly_rate <= Decimal::ZERO {
            return Err(Error::Config {
                message: format!(
                    "default_hourly_rate must be positive, got {}",
                    self.invoicing.default_hourly_rate
                ),
            });
        }
        if let Some(user) = self
            .users
            .iter()
            .find(|u| u.default_hourly_rate.is_some_and(|r| r <= Decimal::ZERO))
        {
            return Err(Error::Config {
                message: format!("User '{}' has a non-positive hourly rate", user.id),
            });
        }
        Ok(())
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A rate is zero or negative
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading settings from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_settings(&contents)
}

/// Parses and validates settings from TOML text
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `CONFIG_PATH`, or ./config.toml when unset
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
