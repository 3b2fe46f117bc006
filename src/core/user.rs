//! User records - roles and billing rates.

use crate::{
    config::settings::UserConfig,
    entities::{User, user},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Hourly rate for `user_id`: their own rate, or `fallback` when unset or unknown.
pub async fn hourly_rate_for<C>(db: &C, user_id: &str, fallback: Decimal) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let rate = User::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .and_then(|u| u.default_hourly_rate)
        .unwrap_or(fallback);
    debug!(user_id, %rate, "Resolved hourly rate");
    Ok(rate)
}

/// Inserts the user, or refreshes name, email, role and rate if the id exists.
pub async fn upsert_user(db: &DatabaseConnection, config: &UserConfig) -> Result<user::Model> {
    let existing = User::find_by_id(config.id.clone()).one(db).await?;

    let model = if let Some(found) = existing {
        let mut active: user::ActiveModel = found.into();
        active.name = Set(config.name.clone());
        active.email = Set(config.email.clone());
        active.role = Set(config.role);
        active.default_hourly_rate = Set(config.default_hourly_rate);
        active.update(db).await?
    } else {
        user::ActiveModel {
            id: Set(config.id.clone()),
            name: Set(config.name.clone()),
            email: Set(config.email.clone()),
            role: Set(config.role),
            default_hourly_rate: Set(config.default_hourly_rate),
        }
        .insert(db)
        .await?
    };

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;
    use crate::test_utils::*;
    use rust_decimal::dec;

    #[tokio::test]
    async fn test_rate_prefers_user_rate() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "rated1", Role::Fellow, Some(dec!(75))).await?;
        create_test_user(&db, "unrated", Role::Fellow, None).await?;

        assert_eq!(hourly_rate_for(&db, "rated1", dec!(50)).await?, dec!(75));
        assert_eq!(hourly_rate_for(&db, "unrated", dec!(50)).await?, dec!(50));
        assert_eq!(hourly_rate_for(&db, "nobody", dec!(50)).await?, dec!(50));
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_user() -> Result<()> {
        let db = setup_test_db().await?;
        let mut config = UserConfig {
            id: "u-1".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Contractor,
            default_hourly_rate: None,
        };
        upsert_user(&db, &config).await?;

        config.default_hourly_rate = Some(dec!(90));
        config.role = Role::Fellow;
        let updated = upsert_user(&db, &config).await?;

        assert_eq!(updated.role, Role::Fellow);
        assert_eq!(updated.default_hourly_rate, Some(dec!(90)));
        assert_eq!(User::find().all(&db).await?.len(), 1);
        Ok(())
    }
}
