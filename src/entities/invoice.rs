//! Invoice entity - A user's billed period, built from aggregated time entries.
//!
//! Totals are stored rather than recomputed so the invoice stays a stable snapshot
//! even if rates change later. Line items live in `line_item`; the time entries
//! bound to the invoice point back to it through `time_entry.invoice_id`.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an invoice
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Created from draft entries, not yet sent for review
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Sent to an admin for review
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Accepted by an admin
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Sent back by an admin; its entries are draft again
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Settled
    #[sea_orm(string_value = "PAID")]
    Paid,
}

impl InvoiceStatus {
    /// The stored string form, e.g. `"SUBMITTED"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Human-readable identifier, e.g. `INV-2025-W04-AB12`
    #[sea_orm(unique)]
    pub invoice_number: String,
    /// First day of the billed period (inclusive)
    pub period_start: Date,
    /// Last day of the billed period (inclusive)
    pub period_end: Date,
    /// Current lifecycle status
    pub status: InvoiceStatus,
    /// Sum of line item hours
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_hours: Decimal,
    /// Sum of line item amounts
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    /// When the owner sent it for review
    pub submitted_at: Option<DateTimeUtc>,
    /// When an admin approved it
    pub approved_at: Option<DateTimeUtc>,
    /// Admin who approved it
    pub approved_by_id: Option<String>,
    /// Reason given on rejection
    pub rejection_reason: Option<String>,
    /// When the invoice was generated
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One invoice has many line items
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItems,
    /// One invoice binds many time entries
    #[sea_orm(has_many = "super::time_entry::Entity")]
    TimeEntries,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::time_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
