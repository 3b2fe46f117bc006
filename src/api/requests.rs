//! Request schemas.
//!
//! Every field a client may omit is an `Option` so that a missing field is
//! reported as a validation error with a clear message rather than a
//! deserialization failure. `validate` turns a request into core input.

use crate::{
    core::{Period, time_entry::NewTimeEntry},
    entities::InvoiceStatus,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of "create invoice": the period to aggregate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// First day to include
    pub period_start: Option<NaiveDate>,
    /// Last day to include
    pub period_end: Option<NaiveDate>,
}

impl CreateInvoiceRequest {
    /// The requested period, if both dates are present and ordered.
    pub fn validate(&self) -> Result<Period> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Period::new(start, end),
            _ => Err(Error::validation("Period start and end required")),
        }
    }
}

/// Body of "reject invoice".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectInvoiceRequest {
    /// Blank or absent reasons are stored as a placeholder
    pub reason: Option<String>,
}

/// Body of "log time".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogTimeEntryRequest {
    /// Day the work happened
    pub date: Option<NaiveDate>,
    /// Client billed
    pub client_id: Option<i64>,
    /// Optional project under the client
    pub project_id: Option<i64>,
    /// Kind of work
    pub category_id: Option<i64>,
    /// Hours worked, accepted as a JSON number or string
    pub hours: Option<Decimal>,
    /// Activity description
    pub what_did_you_do: Option<String>,
    /// Optional outcome
    pub what_got_completed: Option<String>,
}

impl LogTimeEntryRequest {
    /// Core input for logging, once every required field is present.
    pub fn validate(self) -> Result<NewTimeEntry> {
        let (Some(date), Some(client_id), Some(category_id), Some(hours), Some(what_did_you_do)) = (
            self.date,
            self.client_id,
            self.category_id,
            self.hours,
            self.what_did_you_do,
        ) else {
            return Err(Error::validation("Missing required fields"));
        };

        Ok(NewTimeEntry {
            date,
            client_id,
            project_id: self.project_id,
            category_id,
            hours,
            what_did_you_do,
            what_got_completed: self.what_got_completed,
        })
    }
}

/// Query of "list invoices".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInvoicesQuery {
    /// Only invoices in this status
    pub status: Option<InvoiceStatus>,
}

/// Query of "list time entries".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeEntriesQuery {
    /// First day to include
    pub start_date: Option<NaiveDate>,
    /// Last day to include
    pub end_date: Option<NaiveDate>,
    /// Honoured for admins only
    pub user_id: Option<String>,
}

impl ListTimeEntriesQuery {
    /// The date filter, if both ends were given.
    pub fn period(&self) -> Result<Option<Period>> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Period::new(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(Error::validation(
                "startDate and endDate must be given together",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_create_invoice_request_parses_dates() {
        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"periodStart":"2025-01-20","periodEnd":"2025-01-26"}"#)
                .unwrap();
        let period = request.validate().unwrap();
        assert_eq!(period.start(), NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert_eq!(period.end(), NaiveDate::from_ymd_opt(2025, 1, 26).unwrap());
    }

    #[test]
    fn test_create_invoice_request_requires_both_dates() {
        let request: CreateInvoiceRequest =
            serde_json::from_str(r#"{"periodStart":"2025-01-20"}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Period start and end required"
        );
    }

    #[test]
    fn test_create_invoice_request_rejects_malformed_date() {
        let result: std::result::Result<CreateInvoiceRequest, _> =
            serde_json::from_str(r#"{"periodStart":"20/01/2025","periodEnd":"2025-01-26"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_time_entry_request() {
        let request: LogTimeEntryRequest = serde_json::from_str(
            r#"{"date":"2025-01-21","clientId":1,"categoryId":2,"hours":2.5,"whatDidYouDo":"Wireframes"}"#,
        )
        .unwrap();
        let entry = request.validate().unwrap();
        assert_eq!(entry.hours, dec!(2.5));
        assert_eq!(entry.project_id, None);
        assert_eq!(entry.what_did_you_do, "Wireframes");
    }

    #[test]
    fn test_log_time_entry_request_missing_fields() {
        let request: LogTimeEntryRequest =
            serde_json::from_str(r#"{"date":"2025-01-21","clientId":1}"#).unwrap();
        assert!(matches!(request.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_list_queries() {
        let query: ListInvoicesQuery = serde_json::from_str(r#"{"status":"SUBMITTED"}"#).unwrap();
        assert_eq!(query.status, Some(InvoiceStatus::Submitted));

        let query: ListTimeEntriesQuery =
            serde_json::from_str(r#"{"startDate":"2025-01-20"}"#).unwrap();
        assert!(matches!(query.period(), Err(Error::Validation { .. })));

        let query = ListTimeEntriesQuery::default();
        assert!(query.period().unwrap().is_none());
    }
}
