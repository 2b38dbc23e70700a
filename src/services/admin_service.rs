use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{Actor, Capability, CapabilitySet, password::hash_password},
    db::{
        dao::{DaoBase, DaoLayerError, RoleDao, UserDao, user_dao::NewUser},
        entities::{role, user},
    },
    error::AppError,
    notifications::{NotificationQueue, PayrollAlert, PayrollGrant},
    services::audit_service::AuditService,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role_id: Uuid,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub role_id: Uuid,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: CapabilitySet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdateRequest {
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: CapabilitySet,
}

/// User and role administration.
#[derive(Clone)]
pub struct AdminService {
    users: UserDao,
    roles: RoleDao,
    audit: AuditService,
    alerts: NotificationQueue,
}

impl AdminService {
    pub fn new(
        users: UserDao,
        roles: RoleDao,
        audit: AuditService,
        alerts: NotificationQueue,
    ) -> Self {
        Self {
            users,
            roles,
            audit,
            alerts,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(self.users.list_users().await?)
    }

    pub async fn create_user(
        &self,
        actor: &Actor,
        request: CreateUserRequest,
    ) -> Result<user::Model, AppError> {
        let username = request.username.trim();
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        if username.is_empty() || first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::bad_request(
                "Username, first name and last name are required",
            ));
        }

        let role = self.role(request.role_id).await?;
        let password_hash = hash_password(&request.password)?;

        let created = self
            .users
            .create_user(NewUser {
                username,
                first_name,
                last_name,
                password_hash: &password_hash,
                role_id: role.id,
                team_id: request.team_id,
            })
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    AppError::conflict(format!("Username '{username}' is already taken"))
                } else {
                    err.into()
                }
            })?;

        self.audit
            .info(
                "Add User",
                &actor.username,
                &format!("Created user {} with role {}", created.username, role.name),
            )
            .await;
        self.alert_if_payroll(&role, &created.username, actor, PayrollGrant::Created);
        Ok(created)
    }

    pub async fn update_user(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<user::Model, AppError> {
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::bad_request("First name and last name are required"));
        }

        let role = self.role(request.role_id).await?;
        let updated = self
            .users
            .update_profile(&id, first_name, last_name, role.id, request.team_id)
            .await?;

        self.audit
            .info(
                "Edit User",
                &actor.username,
                &format!("Updated user {} (role {})", updated.username, role.name),
            )
            .await;
        self.alert_if_payroll(&role, &updated.username, actor, PayrollGrant::Modified);
        Ok(updated)
    }

    pub async fn reset_password(
        &self,
        actor: &Actor,
        id: Uuid,
        password: &str,
    ) -> Result<(), AppError> {
        let password_hash = hash_password(password)?;
        let target = self.users.find_by_id(id).await?;
        self.users.set_password_hash(&id, password_hash).await?;

        self.audit
            .info(
                "Reset Password",
                &actor.username,
                &format!("Reset password for {}", target.username),
            )
            .await;
        Ok(())
    }

    /// Soft delete; the row stays for audit history.
    pub async fn deactivate(&self, actor: &Actor, id: Uuid) -> Result<user::Model, AppError> {
        if actor.user_id == id {
            return Err(AppError::bad_request("You cannot deactivate your own account"));
        }

        let user = self.users.deactivate(&id).await?;
        self.audit
            .warn(
                "Deactivate User",
                &actor.username,
                &format!("Deactivated user {}", user.username),
            )
            .await;
        Ok(user)
    }

    pub async fn list_roles(&self) -> Result<Vec<role::Model>, AppError> {
        Ok(self.roles.list_roles().await?)
    }

    pub async fn create_role(
        &self,
        actor: &Actor,
        request: RoleRequest,
    ) -> Result<role::Model, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Role name is required"));
        }

        let role = self
            .roles
            .create_role(name, request.description, request.capabilities)
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    AppError::conflict(format!("Role '{name}' already exists"))
                } else {
                    err.into()
                }
            })?;

        self.audit
            .info("Add Role", &actor.username, &format!("Created role {}", role.name))
            .await;
        Ok(role)
    }

    pub async fn update_role(
        &self,
        actor: &Actor,
        id: Uuid,
        request: RoleUpdateRequest,
    ) -> Result<role::Model, AppError> {
        let role = self
            .roles
            .update_role(&id, request.description, request.capabilities)
            .await?;

        self.audit
            .info("Edit Role", &actor.username, &format!("Updated role {}", role.name))
            .await;
        Ok(role)
    }

    async fn role(&self, id: Uuid) -> Result<role::Model, AppError> {
        match self.roles.find_by_id(id).await {
            Ok(role) => Ok(role),
            Err(DaoLayerError::NotFound { .. }) => {
                Err(AppError::bad_request(format!("Unknown role {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn alert_if_payroll(
        &self,
        role: &role::Model,
        username: &str,
        actor: &Actor,
        grant: PayrollGrant,
    ) {
        if role.capabilities().contains(Capability::Payroll) {
            self.alerts.alert(PayrollAlert {
                username: username.to_string(),
                actor: actor.username.clone(),
                grant,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::Receiver;
    use uuid::Uuid;

    use super::{CreateUserRequest, RoleRequest, RoleUpdateRequest, UpdateUserRequest};
    use crate::{
        auth::{Actor, Capability, CapabilitySet},
        db::entities::role,
        error::AppError,
        notifications::{Notification, NotificationQueue, PayrollGrant},
        services::{ServiceContext, admin_service::AdminService},
        test_helpers::memory_db,
    };

    fn admin_actor() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            username: "admin".to_string(),
            role_id: Uuid::new_v4(),
            role_name: "admin".to_string(),
            capabilities: CapabilitySet::all(),
        }
    }

    async fn setup() -> (AdminService, Receiver<Notification>) {
        let db = memory_db().await;
        let (queue, rx) = NotificationQueue::new(8);
        (ServiceContext::new(&db).admin(queue), rx)
    }

    async fn role_with(admin: &AdminService, name: &str, caps: &[Capability]) -> role::Model {
        admin
            .create_role(
                &admin_actor(),
                RoleRequest {
                    name: name.to_string(),
                    description: None,
                    capabilities: caps.iter().copied().collect(),
                },
            )
            .await
            .expect("role should be created")
    }

    fn new_user(username: &str, role_id: Uuid) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            first_name: "Paula".to_string(),
            last_name: "Reyes".to_string(),
            password: "correct-horse".to_string(),
            role_id,
            team_id: None,
        }
    }

    #[tokio::test]
    async fn payroll_role_on_create_queues_an_alert() {
        let (admin, mut rx) = setup().await;
        let payroll = role_with(&admin, "Payroll", &[Capability::Payroll]).await;

        let user = admin
            .create_user(&admin_actor(), new_user("paula", payroll.id))
            .await
            .expect("user should be created");
        assert_ne!(user.password_hash, "correct-horse");

        match rx.try_recv() {
            Ok(Notification::PayrollAlert(alert)) => {
                assert_eq!(alert.username, "paula");
                assert_eq!(alert.grant, PayrollGrant::Created);
            }
            other => panic!("expected payroll alert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn moving_into_payroll_role_alerts_as_modified() {
        let (admin, mut rx) = setup().await;
        let hr = role_with(&admin, "HR", &[Capability::Onboard]).await;
        let payroll = role_with(&admin, "Payroll", &[Capability::Payroll]).await;

        let user = admin
            .create_user(&admin_actor(), new_user("hana", hr.id))
            .await
            .expect("user should be created");
        assert!(rx.try_recv().is_err());

        admin
            .update_user(
                &admin_actor(),
                user.id,
                UpdateUserRequest {
                    first_name: "Hana".to_string(),
                    last_name: "Ree".to_string(),
                    role_id: payroll.id,
                    team_id: None,
                },
            )
            .await
            .expect("update should succeed");

        match rx.try_recv() {
            Ok(Notification::PayrollAlert(alert)) => {
                assert_eq!(alert.grant, PayrollGrant::Modified)
            }
            other => panic!("expected payroll alert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (admin, _rx) = setup().await;
        let hr = role_with(&admin, "HR", &[Capability::Onboard]).await;
        admin
            .create_user(&admin_actor(), new_user("hana", hr.id))
            .await
            .expect("first user should be created");

        let err = admin
            .create_user(&admin_actor(), new_user("hana", hr.id))
            .await
            .expect_err("duplicate should fail");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn short_password_and_unknown_role_are_rejected() {
        let (admin, _rx) = setup().await;
        let hr = role_with(&admin, "HR", &[]).await;

        let mut short = new_user("shorty", hr.id);
        short.password = "short".to_string();
        let err = admin
            .create_user(&admin_actor(), short)
            .await
            .expect_err("short password should fail");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = admin
            .create_user(&admin_actor(), new_user("ghost", Uuid::new_v4()))
            .await
            .expect_err("unknown role should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deactivation_is_soft_and_not_self_service() {
        let (admin, _rx) = setup().await;
        let hr = role_with(&admin, "HR", &[]).await;
        let user = admin
            .create_user(&admin_actor(), new_user("leaver", hr.id))
            .await
            .expect("user should be created");

        let deactivated = admin
            .deactivate(&admin_actor(), user.id)
            .await
            .expect("deactivate should succeed");
        assert!(!deactivated.active);
        assert_eq!(admin.list_users().await.expect("list").len(), 1);

        let mut me = admin_actor();
        me.user_id = user.id;
        let err = admin
            .deactivate(&me, user.id)
            .await
            .expect_err("self deactivation should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn role_capabilities_can_be_replaced() {
        let (admin, _rx) = setup().await;
        let role = role_with(&admin, "HR", &[Capability::Onboard]).await;

        let updated = admin
            .update_role(
                &admin_actor(),
                role.id,
                RoleUpdateRequest {
                    description: Some("People team".to_string()),
                    capabilities: [Capability::Offboard, Capability::ViewLogs]
                        .into_iter()
                        .collect(),
                },
            )
            .await
            .expect("update should succeed");

        let caps = updated.capabilities();
        assert!(!caps.contains(Capability::Onboard));
        assert!(caps.contains(Capability::Offboard));
        assert!(caps.contains(Capability::ViewLogs));
    }
}
