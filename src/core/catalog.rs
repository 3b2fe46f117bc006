//! Catalog lookups and seeding.
//!
//! Clients, projects and categories are maintained through config.toml. Seeding
//! is additive: existing rows are matched by name and left alone.

use crate::{
    config::settings::Settings,
    core::user::upsert_user,
    entities::{Category, Client, Project, category, client, project},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Counts of rows created by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub clients: usize,
    pub projects: usize,
    pub categories: usize,
}

/// Ensures every user, client, project and category in `settings` exists.
///
/// Users are upserted so rate and role changes in the file take effect.
#[instrument(skip_all)]
pub async fn seed_catalog(db: &DatabaseConnection, settings: &Settings) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for user in &settings.users {
        upsert_user(db, user).await?;
        summary.users += 1;
    }

    for client_config in &settings.clients {
        let (client, created) = find_or_create_client(db, &client_config.name).await?;
        if created {
            summary.clients += 1;
        }
        for project_name in &client_config.projects {
            if find_or_create_project(db, client.id, project_name).await?.1 {
                summary.projects += 1;
            }
        }
    }

    for category_config in &settings.categories {
        if find_or_create_category(db, &category_config.name).await?.1 {
            summary.categories += 1;
        }
    }

    info!(?summary, "Catalog seeded");
    Ok(summary)
}

/// Returns the client named `name`, creating it if needed. The flag is true when created.
pub async fn find_or_create_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<(client::Model, bool)> {
    let name = require_name(name, "Client")?;
    if let Some(found) = Client::find()
        .filter(client::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((found, false));
    }
    let created = client::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created, true))
}

/// Returns the project `name` under `client_id`, creating it if needed.
pub async fn find_or_create_project(
    db: &DatabaseConnection,
    client_id: i64,
    name: &str,
) -> Result<(project::Model, bool)> {
    let name = require_name(name, "Project")?;
    if let Some(found) = Project::find()
        .filter(project::Column::ClientId.eq(client_id))
        .filter(project::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((found, false));
    }
    let created = project::ActiveModel {
        client_id: Set(client_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created, true))
}

/// Returns the category named `name`, creating it if needed.
pub async fn find_or_create_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<(category::Model, bool)> {
    let name = require_name(name, "Category")?;
    if let Some(found) = Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((found, false));
    }
    let created = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created, true))
}

fn require_name<'a>(name: &'a str, kind: &str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Config {
            message: format!("{kind} name cannot be empty"),
        });
    }
    Ok(trimmed)
}
