use dotenvy::dotenv;
use timesheet_invoicing::{
    config::{database, settings},
    core::{Caller, catalog, invoice},
    entities::{InvoiceStatus, Role},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load invoicing defaults and the catalog to seed
    let app_settings = settings::load_default_settings()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;
    info!(
        "Loaded configuration: {} users, {} clients, {} categories, default rate {}",
        app_settings.users.len(),
        app_settings.clients.len(),
        app_settings.categories.len(),
        app_settings.invoicing.default_hourly_rate
    );

    // 4. Connect and make sure every table exists
    std::fs::create_dir_all("data")?;
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed users, clients, projects and categories
    let summary = catalog::seed_catalog(&db, &app_settings)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
    info!(
        "Seeded {} users, {} new clients, {} new projects, {} new categories",
        summary.users, summary.clients, summary.projects, summary.categories
    );

    // 6. Report what is waiting for review, as the first configured admin
    let Some(admin) = app_settings.users.iter().find(|u| u.role == Role::Admin) else {
        info!("No admin user configured; skipping review summary.");
        return Ok(());
    };
    let reviewer = Caller::resolve(&db, &admin.id)
        .await
        .inspect_err(|e| error!("Failed to resolve reviewer {}: {}", admin.id, e))?;
    let awaiting = invoice::list_invoices(&db, &reviewer, Some(InvoiceStatus::Submitted)).await?;
    info!("{} invoice(s) awaiting review", awaiting.len());
    for pending in &awaiting {
        info!(
            "  {} for {} ({} - {}): {} hours, {}",
            pending.invoice_number,
            pending.user_id,
            pending.period_start,
            pending.period_end,
            pending.total_hours,
            pending.total_amount
        );
    }

    Ok(())
}
