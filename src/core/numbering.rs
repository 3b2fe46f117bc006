//! Invoice numbering.
//!
//! Numbers look like `INV-2025-W04-AB12`: the calendar year of the period start,
//! its ISO-8601 week, and the last four characters of the owner's id. The same
//! inputs always give the same number. Two invoices for the same user and week
//! collide, which the lifecycle resolves with [`disambiguate`].

use chrono::{Datelike, NaiveDate};

/// Builds the base invoice number for `user_id` and `period_start`.
///
/// The year is the calendar year, not the ISO week-year, so a period starting
/// on Monday 2024-12-30 is numbered `INV-2024-W01-...`.
#[must_use]
pub fn invoice_number(user_id: &str, period_start: NaiveDate) -> String {
    let year = period_start.year();
    let week = period_start.iso_week().week();
    format!("INV-{year}-W{week:02}-{}", short_user_id(user_id))
}

/// Candidate number for the given attempt: the base first, then `-2`, `-3`, ...
#[must_use]
pub fn disambiguate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Last four characters of the id, upper-cased.
fn short_user_id(user_id: &str) -> String {
    let skip = user_id.chars().count().saturating_sub(4);
    user_id.chars().skip(skip).collect::<String>().to_uppercase()
}
