//! Time entry entity - Hours a user logged against a client and category on one day.
//!
//! Entries start as `DRAFT`, become `SUBMITTED` once bound to an invoice and
//! `LOCKED` once that invoice is sent for review. A rejected invoice returns its
//! entries to `DRAFT`.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a time entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Editable, not yet on any invoice
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Bound to an invoice the owner has not sent yet
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Bound to an invoice under review or settled
    #[sea_orm(string_value = "LOCKED")]
    Locked,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Locked => "LOCKED",
        })
    }
}

/// Time entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who logged the hours
    pub user_id: String,
    /// Calendar day the work happened
    pub date: Date,
    /// Client the work was for
    pub client_id: i64,
    /// Optional project under the client
    pub project_id: Option<i64>,
    /// Kind of work (e.g. "Design")
    pub category_id: i64,
    /// Hours worked, always positive
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub hours: Decimal,
    /// Required description of the activity
    pub what_did_you_do: String,
    /// Optional description of the outcome
    pub what_got_completed: Option<String>,
    /// Current lifecycle status
    pub status: EntryStatus,
    /// Invoice this entry is bound to, if any
    pub invoice_id: Option<i64>,
    /// When the entry was logged
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `TimeEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bound entry belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    /// Each entry belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Each entry may belong to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// Each entry has one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
