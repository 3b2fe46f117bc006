//! Caller context - who is asking, as established by the identity provider.
//!
//! Every core operation receives the caller explicitly instead of reading a
//! session from ambient state.

use crate::{
    entities::{Role, User},
    errors::{Error, Result},
};
use sea_orm::prelude::*;

/// Identity and role of the user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Identity provider's user id
    pub id: String,
    /// Role the caller acts with
    pub role: Role,
}

impl Caller {
    /// Builds a caller context.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Resolves the caller's role from the `users` table.
    pub async fn resolve<C>(db: &C, user_id: &str) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let user = User::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "User",
                id: user_id.to_string(),
            })?;
        Ok(Self::new(user.id, user.role))
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `Unauthorized` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::unauthorized("admin role required"))
        }
    }

    /// Fails with `Unauthorized` unless the caller is `owner_id` or an admin.
    pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<()> {
        if self.is_admin() || self.id == owner_id {
            Ok(())
        } else {
            Err(Error::unauthorized("not the owner of this resource"))
        }
    }
}
