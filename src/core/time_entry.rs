//! Time entry business logic - logging and listing hours.
//!
//! Entries are created as `DRAFT` and only change status through the invoice
//! lifecycle. Entries are never deleted here.

use crate::{
    core::{caller::Caller, period::Period},
    entities::{Category, Client, EntryStatus, Project, TimeEntry, time_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Input for logging one entry; the owner is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub date: NaiveDate,
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub category_id: i64,
    pub hours: Decimal,
    pub what_did_you_do: String,
    pub what_got_completed: Option<String>,
}

/// Logs a draft entry for the caller.
///
/// Validates that hours are positive, the activity text is present, the client
/// and category exist, and the project (if any) belongs to the client.
#[instrument(skip(db, entry), fields(user_id = %caller.id))]
pub async fn log_time_entry(
    db: &DatabaseConnection,
    caller: &Caller,
    entry: NewTimeEntry,
) -> Result<time_entry::Model> {
    if entry.hours <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "Hours must be greater than zero, got {}",
            entry.hours
        )));
    }

    let activity = entry.what_did_you_do.trim();
    if activity.is_empty() {
        return Err(Error::validation("What did you do is required"));
    }

    Client::find_by_id(entry.client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Client",
            id: entry.client_id.to_string(),
        })?;

    Category::find_by_id(entry.category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Category",
            id: entry.category_id.to_string(),
        })?;

    if let Some(project_id) = entry.project_id {
        let project = Project::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "Project",
                id: project_id.to_string(),
            })?;
        if project.client_id != entry.client_id {
            return Err(Error::validation(format!(
                "Project {project_id} does not belong to client {}",
                entry.client_id
            )));
        }
    }

    let outcome = entry
        .what_got_completed
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let model = time_entry::ActiveModel {
        user_id: Set(caller.id.clone()),
        date: Set(entry.date),
        client_id: Set(entry.client_id),
        project_id: Set(entry.project_id),
        category_id: Set(entry.category_id),
        hours: Set(entry.hours),
        what_did_you_do: Set(activity.to_string()),
        what_got_completed: Set(outcome),
        status: Set(EntryStatus::Draft),
        invoice_id: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(entry_id = model.id, "Time entry logged");
    Ok(model)
}

/// Lists entries visible to the caller, newest first.
///
/// Non-admins only ever see their own entries and `user_filter` is ignored for
/// them. Admins see everyone's unless they pass a `user_filter`.
pub async fn list_time_entries(
    db: &DatabaseConnection,
    caller: &Caller,
    period: Option<Period>,
    user_filter: Option<&str>,
) -> Result<Vec<time_entry::Model>> {
    let mut query = TimeEntry::find();

    if !caller.is_admin() {
        query = query.filter(time_entry::Column::UserId.eq(caller.id.as_str()));
    } else if let Some(user_id) = user_filter {
        query = query.filter(time_entry::Column::UserId.eq(user_id));
    }

    if let Some(period) = period {
        query = query.filter(time_entry::Column::Date.between(period.start(), period.end()));
    }

    query
        .order_by_desc(time_entry::Column::Date)
        .order_by_desc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Entries bound to `invoice_id`, oldest first.
pub async fn entries_for_invoice<C>(db: &C, invoice_id: i64) -> Result<Vec<time_entry::Model>>
where
    C: ConnectionTrait,
{
    TimeEntry::find()
        .filter(time_entry::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(time_entry::Column::Date)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
