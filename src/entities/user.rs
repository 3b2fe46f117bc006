//! User entity - Role and billing rate for an identity supplied by the auth provider.
//!
//! The id is the provider's user id, so it is not auto-incremented. Only the
//! pieces invoicing needs are stored here; credentials live elsewhere.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Reviews, approves and rejects invoices
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Logs hours and submits invoices
    #[sea_orm(string_value = "FELLOW")]
    Fellow,
    /// Logs hours and submits invoices
    #[sea_orm(string_value = "CONTRACTOR")]
    Contractor,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Identity provider's user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    #[sea_orm(unique)]
    pub email: String,
    /// Access role
    pub role: Role,
    /// Rate applied to this user's invoices; the configured default is used when unset
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub default_hourly_rate: Option<Decimal>,
}

/// `User` has no outgoing relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
