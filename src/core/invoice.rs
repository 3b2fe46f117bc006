//! Invoice business logic - generation and lifecycle transitions.
//!
//! Every operation that changes state runs inside a single database transaction:
//! the invoice row and the time entries it binds are updated together or not at
//! all. Guards are checked before anything is written, and an early return drops
//! the transaction, which rolls it back.

use crate::{
    core::{
        aggregate::{aggregate_entries, select_draft_entries},
        caller::Caller,
        lifecycle::{Transition, next_status},
        numbering::{disambiguate, invoice_number},
        period::Period,
        user::hourly_rate_for,
    },
    entities::{EntryStatus, Invoice, InvoiceStatus, LineItem, TimeEntry, invoice, line_item, time_entry},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Stored when an admin rejects without giving a reason.
pub const DEFAULT_REJECTION_REASON: &str = "No reason provided";

const SQLITE_BUSY_MESSAGE: &str = "database is locked";
const CONCURRENT_INVOICE_MESSAGE: &str =
    "Some time entries were invoiced concurrently; please retry";

/// An invoice together with its frozen line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: invoice::Model,
    pub line_items: Vec<line_item::Model>,
}

/// Generates a DRAFT invoice from the caller's draft entries in `period`.
///
/// The entries are grouped into line items priced at the caller's hourly rate
/// (or `fallback_rate` if they have none). In the same transaction the entries
/// move to `SUBMITTED` and point at the new invoice, so they cannot be
/// aggregated a second time.
///
/// # Errors
/// - `NoEntriesFound` if the caller has no draft entries in the period
/// - `Conflict` if some selected entries stopped being drafts before they were
///   bound, or another writer held the database lock
#[instrument(skip(db), fields(user_id = %caller.id))]
pub async fn create_invoice(
    db: &DatabaseConnection,
    caller: &Caller,
    period: Period,
    fallback_rate: Decimal,
) -> Result<InvoiceDetail> {
    generate_invoice(db, caller, period, fallback_rate)
        .await
        .map_err(busy_as_conflict)
}

async fn generate_invoice(
    db: &DatabaseConnection,
    caller: &Caller,
    period: Period,
    fallback_rate: Decimal,
) -> Result<InvoiceDetail> {
    let txn = db.begin().await?;

    let entries = select_draft_entries(&txn, &caller.id, period).await?;
    let aggregation = aggregate_entries(&entries)?;

    let rate = hourly_rate_for(&txn, &caller.id, fallback_rate).await?;
    let priced = aggregation.price(rate);
    let number = next_free_number(&txn, &invoice_number(&caller.id, period.start())).await?;

    let invoice = invoice::ActiveModel {
        user_id: Set(caller.id.clone()),
        invoice_number: Set(number),
        period_start: Set(period.start()),
        period_end: Set(period.end()),
        status: Set(InvoiceStatus::Draft),
        total_hours: Set(priced.total_hours),
        total_amount: Set(priced.total_amount),
        submitted_at: Set(None),
        approved_at: Set(None),
        approved_by_id: Set(None),
        rejection_reason: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut line_items = Vec::with_capacity(priced.lines.len());
    for line in priced.lines {
        let item = line_item::ActiveModel {
            invoice_id: Set(invoice.id),
            client_id: Set(line.client_id),
            project_id: Set(line.project_id),
            category_id: Set(line.category_id),
            description: Set(line.description),
            hours: Set(line.hours),
            rate: Set(line.rate),
            amount: Set(line.amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        line_items.push(item);
    }

    bind_entries(&txn, &aggregation.entry_ids(), invoice.id).await?;

    txn.commit().await?;

    info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        lines = line_items.len(),
        total_hours = %invoice.total_hours,
        total_amount = %invoice.total_amount,
        "Invoice created"
    );

    Ok(InvoiceDetail {
        invoice,
        line_items,
    })
}

/// Owner sends a DRAFT invoice for review; its entries become `LOCKED`.
#[instrument(skip(db), fields(user_id = %caller.id))]
pub async fn submit_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
) -> Result<invoice::Model> {
    transition_invoice(db, invoice_id, caller, Transition::Submit, |active| {
        active.submitted_at = Set(Some(Utc::now()));
    })
    .await
}

/// Admin approves a SUBMITTED invoice. Time entries are left as they are.
#[instrument(skip(db), fields(user_id = %caller.id))]
pub async fn approve_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
) -> Result<invoice::Model> {
    let approver = caller.id.clone();
    transition_invoice(db, invoice_id, caller, Transition::Approve, move |active| {
        active.approved_at = Set(Some(Utc::now()));
        active.approved_by_id = Set(Some(approver));
    })
    .await
}

/// Admin rejects a SUBMITTED invoice.
///
/// The invoice's entries go back to `DRAFT` and are unbound, so the owner can
/// fix them and generate a fresh invoice. A blank reason is replaced by
/// [`DEFAULT_REJECTION_REASON`].
#[instrument(skip(db, reason), fields(user_id = %caller.id))]
pub async fn reject_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
    reason: Option<&str>,
) -> Result<invoice::Model> {
    let reason = rejection_reason(reason);
    transition_invoice(db, invoice_id, caller, Transition::Reject, move |active| {
        active.rejection_reason = Set(Some(reason));
    })
    .await
}

/// Admin records payment of an APPROVED invoice.
#[instrument(skip(db), fields(user_id = %caller.id))]
pub async fn mark_invoice_paid(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
) -> Result<invoice::Model> {
    transition_invoice(db, invoice_id, caller, Transition::MarkPaid, |_| {}).await
}

/// Fetches an invoice with its line items. Non-admins may only read their own.
pub async fn get_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
) -> Result<InvoiceDetail> {
    let invoice = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::invoice_not_found(invoice_id))?;

    caller.require_owner_or_admin(&invoice.user_id)?;

    let line_items = line_items_for(db, invoice_id).await?;
    Ok(InvoiceDetail {
        invoice,
        line_items,
    })
}

/// Lists invoices newest first. Admins see every user's, others only their own.
pub async fn list_invoices(
    db: &DatabaseConnection,
    caller: &Caller,
    status: Option<InvoiceStatus>,
) -> Result<Vec<invoice::Model>> {
    let mut query = Invoice::find();
    if !caller.is_admin() {
        query = query.filter(invoice::Column::UserId.eq(caller.id.as_str()));
    }
    if let Some(status) = status {
        query = query.filter(invoice::Column::Status.eq(status));
    }
    query
        .order_by_desc(invoice::Column::CreatedAt)
        .order_by_desc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Line items of an invoice in insertion order.
pub async fn line_items_for<C>(db: &C, invoice_id: i64) -> Result<Vec<line_item::Model>>
where
    C: ConnectionTrait,
{
    LineItem::find()
        .filter(line_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(line_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// SQLite reports a competing writer as `SQLITE_BUSY` rather than letting the
/// guarded bind race, so that case surfaces as a conflict too.
fn busy_as_conflict(err: Error) -> Error {
    match err {
        Error::Database(db_err) if db_err.to_string().contains(SQLITE_BUSY_MESSAGE) => {
            warn!("Database busy while generating invoice: {}", db_err);
            Error::Conflict {
                message: CONCURRENT_INVOICE_MESSAGE.to_string(),
            }
        }
        other => other,
    }
}

fn rejection_reason(reason: Option<&str>) -> String {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REJECTION_REASON)
        .to_string()
}

/// Loads, authorizes and moves one invoice, applying the transition's entry
/// side effect in the same transaction.
async fn transition_invoice<F>(
    db: &DatabaseConnection,
    invoice_id: i64,
    caller: &Caller,
    transition: Transition,
    stamp: F,
) -> Result<invoice::Model>
where
    F: FnOnce(&mut invoice::ActiveModel),
{
    if transition.requires_admin() {
        caller.require_admin()?;
    }

    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::invoice_not_found(invoice_id))?;

    if !transition.requires_admin() && invoice.user_id != caller.id {
        return Err(Error::unauthorized("only the owner can submit this invoice"));
    }

    let next = next_status(invoice.status, transition)?;

    let mut active: invoice::ActiveModel = invoice.into();
    active.status = Set(next);
    stamp(&mut active);
    let updated = active.update(&txn).await?;

    if let Some((from, to)) = transition.entry_effect() {
        let mut update = TimeEntry::update_many().col_expr(time_entry::Column::Status, Expr::value(to));
        if to == EntryStatus::Draft {
            update = update.col_expr(time_entry::Column::InvoiceId, Expr::value(Option::<i64>::None));
        }
        let moved = update
            .filter(time_entry::Column::InvoiceId.eq(invoice_id))
            .filter(time_entry::Column::Status.eq(from))
            .exec(&txn)
            .await?;
        debug!(rows = moved.rows_affected, %from, %to, "Time entries moved");
    }

    txn.commit().await?;

    info!(
        invoice_id,
        status = %updated.status,
        action = transition.action(),
        "Invoice transitioned"
    );
    Ok(updated)
}

/// Binds draft entries to an invoice, moving them to `SUBMITTED`.
///
/// Only rows that are still `DRAFT` are touched. If any selected entry changed
/// status since it was read, the whole bind fails with `Conflict`.
pub(crate) async fn bind_entries<C>(db: &C, entry_ids: &[i64], invoice_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = TimeEntry::update_many()
        .col_expr(time_entry::Column::Status, Expr::value(EntryStatus::Submitted))
        .col_expr(time_entry::Column::InvoiceId, Expr::value(Some(invoice_id)))
        .filter(time_entry::Column::Id.is_in(entry_ids.iter().copied()))
        .filter(time_entry::Column::Status.eq(EntryStatus::Draft))
        .exec(db)
        .await?;

    if usize::try_from(result.rows_affected).ok() != Some(entry_ids.len()) {
        warn!(
            expected = entry_ids.len(),
            bound = result.rows_affected,
            "Draft entries changed while generating invoice"
        );
        return Err(Error::Conflict {
            message: CONCURRENT_INVOICE_MESSAGE.to_string(),
        });
    }
    Ok(())
}

/// First free number among `base`, `base-2`, `base-3`, ...
async fn next_free_number<C>(db: &C, base: &str) -> Result<String>
where
    C: ConnectionTrait,
{
    let taken: HashSet<String> = Invoice::find()
        .filter(invoice::Column::InvoiceNumber.starts_with(base))
        .all(db)
        .await?
        .into_iter()
        .map(|i| i.invoice_number)
        .collect();

    (1..=u32::MAX)
        .map(|attempt| disambiguate(base, attempt))
        .find(|candidate| !taken.contains(candidate))
        .ok_or_else(|| Error::Conflict {
            message: format!("No free invoice number for {base}"),
        })
}
