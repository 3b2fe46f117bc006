//! Handlers - one async function per operation.
//!
//! Each handler validates its request, calls the matching `core` function and
//! returns the result unchanged. [`error_response`] turns an error into the
//! status and body a transport should send back.

use crate::{
    api::{
        AppState,
        requests::{
            CreateInvoiceRequest, ListInvoicesQuery, ListTimeEntriesQuery, LogTimeEntryRequest,
            RejectInvoiceRequest,
        },
    },
    core::{Caller, invoice, invoice::InvoiceDetail, time_entry},
    entities::{InvoiceModel, TimeEntryModel},
    errors::{Error, Result},
};
use serde::Serialize;
use tracing::error;

/// JSON body sent with every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

/// Status code and body for `err`.
///
/// Storage and process failures are logged and reported with a generic
/// message so internals do not leak to clients.
#[must_use]
pub fn error_response(err: &Error) -> (u16, ErrorBody) {
    let status = err.status_code();
    let message = if err.is_internal() {
        error!("Internal error while handling request: {}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, ErrorBody { error: message })
}

/// Validates the period and generates a draft invoice for the caller.
pub async fn create_invoice(
    state: &AppState,
    caller: &Caller,
    request: CreateInvoiceRequest,
) -> Result<InvoiceDetail> {
    let period = request.validate()?;
    invoice::create_invoice(&state.database, caller, period, state.default_hourly_rate).await
}

/// Returns one invoice with its line items.
pub async fn get_invoice(
    state: &AppState,
    caller: &Caller,
    invoice_id: i64,
) -> Result<InvoiceDetail> {
    invoice::get_invoice(&state.database, invoice_id, caller).await
}

/// Lists invoices visible to the caller, optionally by status.
pub async fn list_invoices(
    state: &AppState,
    caller: &Caller,
    query: ListInvoicesQuery,
) -> Result<Vec<InvoiceModel>> {
    invoice::list_invoices(&state.database, caller, query.status).await
}

/// Sends the caller's draft invoice for review.
pub async fn submit_invoice(
    state: &AppState,
    caller: &Caller,
    invoice_id: i64,
) -> Result<InvoiceModel> {
    invoice::submit_invoice(&state.database, invoice_id, caller).await
}

/// Approves a submitted invoice (admin only).
pub async fn approve_invoice(
    state: &AppState,
    caller: &Caller,
    invoice_id: i64,
) -> Result<InvoiceModel> {
    invoice::approve_invoice(&state.database, invoice_id, caller).await
}

/// Rejects a submitted invoice with an optional reason (admin only).
pub async fn reject_invoice(
    state: &AppState,
    caller: &Caller,
    invoice_id: i64,
    request: RejectInvoiceRequest,
) -> Result<InvoiceModel> {
    invoice::reject_invoice(&state.database, invoice_id, caller, request.reason.as_deref()).await
}

/// Records payment of an approved invoice (admin only).
pub async fn mark_invoice_paid(
    state: &AppState,
    caller: &Caller,
    invoice_id: i64,
) -> Result<InvoiceModel> {
    invoice::mark_invoice_paid(&state.database, invoice_id, caller).await
}

/// Validates and logs a draft time entry for the caller.
pub async fn log_time_entry(
    state: &AppState,
    caller: &Caller,
    request: LogTimeEntryRequest,
) -> Result<TimeEntryModel> {
    let entry = request.validate()?;
    time_entry::log_time_entry(&state.database, caller, entry).await
}

/// Lists time entries visible to the caller.
pub async fn list_time_entries(
    state: &AppState,
    caller: &Caller,
    query: ListTimeEntriesQuery,
) -> Result<Vec<TimeEntryModel>> {
    let period = query.period()?;
    time_entry::list_time_entries(&state.database, caller, period, query.user_id.as_deref()).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{EntryStatus, InvoiceStatus};
    use crate::test_utils::*;
    use rust_decimal::dec;
    use sea_orm::DatabaseConnection;

    async fn scenario_state() -> Result<(AppState, InvoiceScenario)> {
        let mut scenario = setup_invoice_scenario().await?;
        let db = std::mem::replace(&mut scenario.db, DatabaseConnection::Disconnected);
        let state = AppState::new(db, dec!(50));
        Ok((state, scenario))
    }

    fn week_request() -> CreateInvoiceRequest {
        serde_json::from_str(r#"{"periodStart":"2025-01-20","periodEnd":"2025-01-26"}"#).unwrap()
    }

    #[tokio::test]
    async fn test_full_review_cycle() -> Result<()> {
        let (state, scenario) = scenario_state().await?;

        let created = create_invoice(&state, &scenario.fellow, week_request()).await?;
        assert_eq!(created.invoice.total_amount, dec!(262.50));

        let submitted = submit_invoice(&state, &scenario.fellow, created.invoice.id).await?;
        assert_eq!(submitted.status, InvoiceStatus::Submitted);

        let reject_body: RejectInvoiceRequest =
            serde_json::from_str(r#"{"reason":"missing details"}"#).unwrap();
        let rejected =
            reject_invoice(&state, &scenario.admin, created.invoice.id, reject_body).await?;
        assert_eq!(rejected.status, InvoiceStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("missing details"));

        let entries =
            list_time_entries(&state, &scenario.fellow, ListTimeEntriesQuery::default()).await?;
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.status == EntryStatus::Draft));

        let pending = list_invoices(
            &state,
            &scenario.admin,
            ListInvoicesQuery {
                status: Some(InvoiceStatus::Rejected),
            },
        )
        .await?;
        assert_eq!(pending.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_missing_period() -> Result<()> {
        let (state, scenario) = scenario_state().await?;
        let result =
            create_invoice(&state, &scenario.fellow, CreateInvoiceRequest::default()).await;

        let err = result.unwrap_err();
        let (status, body) = error_response(&err);
        assert_eq!(status, 400);
        assert_eq!(body.error, "Validation error: Period start and end required");
        Ok(())
    }

    #[tokio::test]
    async fn test_log_time_entry_handler() -> Result<()> {
        let (state, scenario) = scenario_state().await?;
        let body = format!(
            r#"{{"date":"2025-01-23","clientId":{},"categoryId":{},"hours":"0.75","whatDidYouDo":"Review"}}"#,
            scenario.catalog.client_b.id, scenario.catalog.strategy.id
        );
        let request: LogTimeEntryRequest = serde_json::from_str(&body).unwrap();

        let entry = log_time_entry(&state, &scenario.fellow, request).await?;
        assert_eq!(entry.hours, dec!(0.75));
        assert_eq!(entry.user_id, FELLOW_ID);
        Ok(())
    }

    #[test]
    fn test_error_response_hides_internal_errors() {
        let err = Error::Database(sea_orm::DbErr::Custom("disk I/O error".to_string()));
        let (status, body) = error_response(&err);
        assert_eq!(status, 500);
        assert_eq!(body.error, "Internal server error");

        let (status, body) = error_response(&Error::NoEntriesFound);
        assert_eq!(status, 400);
        assert_eq!(body.error, "No draft entries found for this period");
    }
}
