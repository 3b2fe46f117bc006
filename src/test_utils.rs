//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        Caller, Period,
        catalog::{find_or_create_category, find_or_create_client, find_or_create_project},
        time_entry::{NewTimeEntry, log_time_entry},
    },
    entities::{self, Role},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, dec};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Id of the scenario fellow; its last four characters give `AB12`.
pub const FELLOW_ID: &str = "clx9user0ab12";
/// Id of the scenario admin.
pub const ADMIN_ID: &str = "admin-0001";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Catalog rows most tests log time against.
pub struct TestCatalog {
    pub client_a: entities::client::Model,
    pub client_b: entities::client::Model,
    pub project_a: entities::project::Model,
    pub design: entities::category::Model,
    pub strategy: entities::category::Model,
}

/// Sets up a database with two clients, one project under client A, and the
/// "Design" and "Strategy" categories.
pub async fn setup_with_catalog() -> Result<(DatabaseConnection, TestCatalog)> {
    let db = setup_test_db().await?;
    let (client_a, _) = find_or_create_client(&db, "Acme Corp").await?;
    let (client_b, _) = find_or_create_client(&db, "TechStart Inc").await?;
    let (project_a, _) = find_or_create_project(&db, client_a.id, "Website Redesign").await?;
    let (design, _) = find_or_create_category(&db, "Design").await?;
    let (strategy, _) = find_or_create_category(&db, "Strategy").await?;
    Ok((
        db,
        TestCatalog {
            client_a,
            client_b,
            project_a,
            design,
            strategy,
        },
    ))
}

/// Inserts a user row with the given role and optional hourly rate.
pub async fn create_test_user(
    db: &DatabaseConnection,
    id: &str,
    role: Role,
    rate: Option<Decimal>,
) -> Result<entities::user::Model> {
    let user = entities::user::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("Test {id}")),
        email: Set(format!("{id}@example.com")),
        role: Set(role),
        default_hourly_rate: Set(rate),
    }
    .insert(db)
    .await?;
    Ok(user)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Monday 2025-01-20 through Sunday 2025-01-26.
pub fn week_of_jan_20() -> Period {
    Period::new(date(2025, 1, 20), date(2025, 1, 26)).unwrap()
}

/// Logs a draft entry for client A / Design with a generic description.
pub async fn log_test_entry(
    db: &DatabaseConnection,
    user_id: &str,
    catalog: &TestCatalog,
    on: NaiveDate,
    hours: Decimal,
) -> Result<entities::time_entry::Model> {
    log_custom_entry(
        db,
        user_id,
        catalog.client_a.id,
        catalog.design.id,
        on,
        hours,
        "Test work",
    )
    .await
}

/// Logs a draft entry with custom client, category and description.
pub async fn log_custom_entry(
    db: &DatabaseConnection,
    user_id: &str,
    client_id: i64,
    category_id: i64,
    on: NaiveDate,
    hours: Decimal,
    activity: &str,
) -> Result<entities::time_entry::Model> {
    let caller = Caller::new(user_id, Role::Fellow);
    log_time_entry(
        db,
        &caller,
        NewTimeEntry {
            date: on,
            client_id,
            project_id: None,
            category_id,
            hours,
            what_did_you_do: activity.to_string(),
            what_got_completed: None,
        },
    )
    .await
}

/// Everything the invoice lifecycle tests start from.
pub struct InvoiceScenario {
    pub db: DatabaseConnection,
    pub catalog: TestCatalog,
    /// Fellow billing at $75/hr
    pub fellow: Caller,
    pub admin: Caller,
    /// The fellow's three draft entries, oldest first
    pub entry_ids: Vec<i64>,
}

/// A fellow at $75/hr with three draft entries in the week of 2025-01-20:
/// client A / Design 1.5h and 1.0h, client B / Strategy 1.0h.
pub async fn setup_invoice_scenario() -> Result<InvoiceScenario> {
    let (db, catalog) = setup_with_catalog().await?;
    create_test_user(&db, FELLOW_ID, Role::Fellow, Some(dec!(75))).await?;
    create_test_user(&db, ADMIN_ID, Role::Admin, Some(dec!(100))).await?;

    let a = catalog.client_a.id;
    let b = catalog.client_b.id;
    let design = catalog.design.id;
    let strategy = catalog.strategy.id;

    let e1 = log_custom_entry(&db, FELLOW_ID, a, design, date(2025, 1, 20), dec!(1.5), "Wireframes").await?;
    let e2 = log_custom_entry(&db, FELLOW_ID, a, design, date(2025, 1, 21), dec!(1.0), "Mockups").await?;
    let e3 = log_custom_entry(&db, FELLOW_ID, b, strategy, date(2025, 1, 22), dec!(1), "Roadmap").await?;

    Ok(InvoiceScenario {
        db,
        catalog,
        fellow: Caller::new(FELLOW_ID, Role::Fellow),
        admin: Caller::new(ADMIN_ID, Role::Admin),
        entry_ids: vec![e1.id, e2.id, e3.id],
    })
}
