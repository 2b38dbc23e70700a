use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoLayerError, RoleDao, UserDao},
    error::AppError,
};

use super::{Capability, CapabilitySet, session::SessionCredential};

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No usable session; send the caller to the login page.
    Unauthenticated,
    /// Logged in but the role lacks the capability; send to a neutral page.
    Forbidden(Capability),
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => AppError::unauthorized("Login required"),
            Denial::Forbidden(capability) => {
                AppError::forbidden(format!("Missing capability {capability}"))
            }
        }
    }
}

/// The authenticated caller with its role's capabilities resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub username: String,
    pub role_id: Uuid,
    pub role_name: String,
    pub capabilities: CapabilitySet,
}

impl Actor {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn ensure(&self, capability: Capability) -> Result<(), Denial> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(Denial::Forbidden(capability))
        }
    }
}

#[derive(Clone)]
pub struct AuthorizationGuard {
    users: UserDao,
    roles: RoleDao,
}

impl AuthorizationGuard {
    pub fn new(users: UserDao, roles: RoleDao) -> Self {
        Self { users, roles }
    }

    /// Resolves the session into an actor. A session whose user was
    /// deactivated, or whose role vanished, counts as no session.
    pub async fn authenticate(
        &self,
        session: Option<&SessionCredential>,
    ) -> Result<Actor, AppError> {
        let session = session.ok_or(Denial::Unauthenticated)?;

        let user = match self.users.find_by_id(session.user_id).await {
            Ok(user) if user.active => user,
            Ok(_) | Err(DaoLayerError::NotFound { .. }) => {
                return Err(Denial::Unauthenticated.into());
            }
            Err(err) => return Err(err.into()),
        };

        let role = match self.roles.find_by_id(user.role_id).await {
            Ok(role) => role,
            Err(DaoLayerError::NotFound { .. }) => return Err(Denial::Unauthenticated.into()),
            Err(err) => return Err(err.into()),
        };

        Ok(Actor {
            user_id: user.id,
            username: user.username,
            role_id: role.id,
            capabilities: role.capabilities(),
            role_name: role.name,
        })
    }

    pub async fn require(
        &self,
        session: Option<&SessionCredential>,
        capability: Capability,
    ) -> Result<Actor, AppError> {
        let actor = self.authenticate(session).await?;
        if let Err(denial) = actor.ensure(capability) {
            tracing::info!(
                username = %actor.username,
                capability = %capability,
                "capability check denied"
            );
            return Err(denial.into());
        }
        Ok(actor)
    }
}
