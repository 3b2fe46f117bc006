//! Aggregation of draft time entries into invoice line items.
//!
//! Entries are grouped by (client, project, category). Each group sums its hours
//! without rounding and joins its activity descriptions with `"; "`. Groups keep
//! the order in which their first entry was read, and descriptions keep entry
//! order. Pricing happens afterwards, once the rate is known.

use crate::{
    core::period::Period,
    entities::{EntryStatus, TimeEntry, time_entry},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;

const DESCRIPTION_SEPARATOR: &str = "; ";

/// Composite grouping key; `project_id: None` is its own group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub category_id: i64,
}

impl From<&time_entry::Model> for GroupKey {
    fn from(entry: &time_entry::Model) -> Self {
        Self {
            client_id: entry.client_id,
            project_id: entry.project_id,
            category_id: entry.category_id,
        }
    }
}

/// The entries of one (client, project, category) grouping, summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroup {
    pub key: GroupKey,
    /// Plain sum of the entries' hours
    pub hours: Decimal,
    /// Activity texts in entry order
    pub descriptions: Vec<String>,
    /// Entries that contributed to this group
    pub entry_ids: Vec<i64>,
}

impl LineGroup {
    /// Descriptions joined with `"; "`.
    #[must_use]
    pub fn description(&self) -> String {
        self.descriptions.join(DESCRIPTION_SEPARATOR)
    }
}

/// Result of grouping a non-empty selection of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    groups: Vec<LineGroup>,
}

impl Aggregation {
    /// Groups in first-seen order
    #[must_use]
    pub fn groups(&self) -> &[LineGroup] {
        &self.groups
    }

    /// Every aggregated entry id, group by group.
    #[must_use]
    pub fn entry_ids(&self) -> Vec<i64> {
        self.groups
            .iter()
            .flat_map(|g| g.entry_ids.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        self.groups.iter().map(|g| g.hours).sum()
    }

    /// Prices every group at `rate`.
    #[must_use]
    pub fn price(&self, rate: Decimal) -> PricedInvoice {
        let lines: Vec<LineDraft> = self
            .groups
            .iter()
            .map(|group| LineDraft {
                client_id: group.key.client_id,
                project_id: group.key.project_id,
                category_id: group.key.category_id,
                description: group.description(),
                hours: group.hours,
                rate,
                amount: line_amount(group.hours, rate),
            })
            .collect();

        let total_hours = lines.iter().map(|l| l.hours).sum();
        let total_amount = lines.iter().map(|l| l.amount).sum();

        PricedInvoice {
            lines,
            total_hours,
            total_amount,
        }
    }
}

/// A line item ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub category_id: i64,
    pub description: String,
    pub hours: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Priced line items plus the invoice totals derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedInvoice {
    pub lines: Vec<LineDraft>,
    /// Sum of line hours
    pub total_hours: Decimal,
    /// Sum of line amounts
    pub total_amount: Decimal,
}

/// `hours * rate` rounded to cents, halves away from zero.
#[must_use]
pub fn line_amount(hours: Decimal, rate: Decimal) -> Decimal {
    (hours * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Groups entries by (client, project, category).
///
/// # Errors
/// Returns `NoEntriesFound` if `entries` is empty.
pub fn aggregate_entries(entries: &[time_entry::Model]) -> Result<Aggregation> {
    if entries.is_empty() {
        return Err(Error::NoEntriesFound);
    }

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<LineGroup> = Vec::new();

    for entry in entries {
        let key = GroupKey::from(entry);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(LineGroup {
                key,
                hours: Decimal::ZERO,
                descriptions: Vec::new(),
                entry_ids: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.hours += entry.hours;
        group.descriptions.push(entry.what_did_you_do.clone());
        group.entry_ids.push(entry.id);
    }

    Ok(Aggregation { groups })
}

/// Reads the user's draft entries dated within `period`, oldest first.
pub async fn select_draft_entries<C>(
    db: &C,
    user_id: &str,
    period: Period,
) -> Result<Vec<time_entry::Model>>
where
    C: ConnectionTrait,
{
    TimeEntry::find()
        .filter(time_entry::Column::UserId.eq(user_id))
        .filter(time_entry::Column::Status.eq(EntryStatus::Draft))
        .filter(time_entry::Column::Date.between(period.start(), period.end()))
        .order_by_asc(time_entry::Column::Date)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use rust_decimal::dec;

    fn entry(id: i64, client: i64, project: Option<i64>, category: i64, hours: Decimal) -> time_entry::Model {
        time_entry::Model {
            id,
            user_id: "user1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            client_id: client,
            project_id: project,
            category_id: category,
            hours,
            what_did_you_do: format!("work {id}"),
            what_got_completed: None,
            status: EntryStatus::Draft,
            invoice_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_selection_fails() {
        let result = aggregate_entries(&[]);
        assert!(matches!(result, Err(Error::NoEntriesFound)));
    }

    #[test]
    fn test_groups_by_client_project_category() {
        let entries = vec![
            entry(1, 1, None, 10, dec!(1.5)),
            entry(2, 2, None, 20, dec!(1)),
            entry(3, 1, None, 10, dec!(1.0)),
            entry(4, 1, Some(5), 10, dec!(0.25)),
        ];

        let aggregation = aggregate_entries(&entries).unwrap();
        let groups = aggregation.groups();

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key.client_id, 1);
        assert_eq!(groups[0].key.project_id, None);
        assert_eq!(groups[0].hours, dec!(2.5));
        assert_eq!(groups[0].description(), "work 1; work 3");
        assert_eq!(groups[0].entry_ids, vec![1, 3]);

        assert_eq!(groups[1].key.client_id, 2);
        assert_eq!(groups[1].description(), "work 2");

        // A project splits otherwise identical entries into their own line
        assert_eq!(groups[2].key.project_id, Some(5));
        assert_eq!(groups[2].hours, dec!(0.25));
    }

    #[test]
    fn test_aggregation_is_lossless() {
        let hours = [dec!(0.1), dec!(0.2), dec!(7.75), dec!(3.333), dec!(1), dec!(0.05)];
        let entries: Vec<_> = hours
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let i = i64::try_from(i).unwrap();
                entry(i, i % 2, if i % 3 == 0 { Some(9) } else { None }, i % 2 + 10, *h)
            })
            .collect();

        let raw_total: Decimal = entries.iter().map(|e| e.hours).sum();
        let aggregation = aggregate_entries(&entries).unwrap();

        assert_eq!(aggregation.total_hours(), raw_total);
        let mut ids = aggregation.entry_ids();
        ids.sort_unstable();
        assert_eq!(ids, (0..6).collect::<Vec<i64>>());
    }

    #[test]
    fn test_price_amounts_and_totals() {
        let entries = vec![
            entry(1, 1, None, 10, dec!(1.5)),
            entry(2, 1, None, 10, dec!(1.0)),
            entry(3, 2, None, 20, dec!(1)),
        ];
        let priced = aggregate_entries(&entries).unwrap().price(dec!(75));

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].amount, dec!(187.50));
        assert_eq!(priced.lines[1].amount, dec!(75));
        assert_eq!(priced.total_hours, dec!(3.5));
        assert_eq!(priced.total_amount, dec!(262.50));

        for line in &priced.lines {
            assert_eq!(line.amount, line_amount(line.hours, line.rate));
        }
        let line_sum: Decimal = priced.lines.iter().map(|l| l.amount).sum();
        assert_eq!(priced.total_amount, line_sum);
    }

    #[test]
    fn test_line_amount_rounds_to_cents() {
        assert_eq!(line_amount(dec!(3.333), dec!(50)), dec!(166.65));
        assert_eq!(line_amount(dec!(0.125), dec!(1)), dec!(0.13));
        assert_eq!(line_amount(dec!(1.005), dec!(1)), dec!(1.01));
    }

    #[tokio::test]
    async fn test_select_draft_entries_filters_owner_status_and_period() -> Result<()> {
        let (db, catalog) = setup_with_catalog().await?;
        let week = week_of_jan_20();

        let inside = log_test_entry(&db, "user1", &catalog, date(2025, 1, 20), dec!(2)).await?;
        let last_day = log_test_entry(&db, "user1", &catalog, date(2025, 1, 26), dec!(1)).await?;
        log_test_entry(&db, "user1", &catalog, date(2025, 1, 27), dec!(4)).await?;
        log_test_entry(&db, "user1", &catalog, date(2025, 1, 19), dec!(4)).await?;
        log_test_entry(&db, "someone_else", &catalog, date(2025, 1, 21), dec!(4)).await?;

        let selected = select_draft_entries(&db, "user1", week).await?;
        let ids: Vec<i64> = selected.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![inside.id, last_day.id]);

        Ok(())
    }
}
