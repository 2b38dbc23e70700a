use crate::{
    config::AuthConfig,
    db::dao::user_dao::NewUser,
    services::ServiceContext,
};

use super::{Authenticator, AuthorizationGuard, CapabilitySet, password::hash_password};

pub const ADMIN_ROLE: &str = "admin";

pub fn build_authenticator(cfg: &AuthConfig, services: &ServiceContext) -> Authenticator {
    Authenticator::new(services.user(), cfg)
}

pub fn build_guard(services: &ServiceContext) -> AuthorizationGuard {
    AuthorizationGuard::new(services.daos().user(), services.daos().role())
}

/// Creates the `admin` role and the configured admin user when missing.
/// Existing rows are left alone so an operator's edits survive restarts.
pub async fn seed_admin(cfg: &AuthConfig, services: &ServiceContext) -> anyhow::Result<()> {
    let roles = services.daos().role();
    let role = match roles.find_by_name(ADMIN_ROLE).await? {
        Some(role) => role,
        None => {
            tracing::info!("seeding admin role");
            roles
                .create_role(
                    ADMIN_ROLE,
                    Some("Full access".to_string()),
                    CapabilitySet::all(),
                )
                .await?
        }
    };

    let users = services.daos().user();
    let username = cfg.admin_username.trim();
    if users.find_by_username(username).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&cfg.admin_password)?;
    users
        .create_user(NewUser {
            username,
            first_name: "System",
            last_name: "Administrator",
            password_hash: &password_hash,
            role_id: role.id,
            team_id: None,
        })
        .await?;
    tracing::info!(username, "seeded admin user");
    Ok(())
}
