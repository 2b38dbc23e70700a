use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{Actor, Capability},
    db::{
        dao::{DaoBase, DaoLayerError, EmployeeDao, PaginatedResponse},
        entities::employee::{self, EmploymentStatus},
    },
    error::AppError,
    services::audit_service::AuditService,
};

use super::{
    events::{EventSink, TransitionEvent, TransitionKind},
    fields::{EmployeeFields, redact_payroll},
};

/// `Skipped` means the record was already in a state where the transition
/// does not apply; nothing was written and no event was emitted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "employee", rename_all = "snake_case")]
pub enum LifecycleOutcome {
    Applied(employee::Model),
    Skipped(employee::Model),
}

impl LifecycleOutcome {
    pub fn employee(&self) -> &employee::Model {
        match self {
            LifecycleOutcome::Applied(employee) | LifecycleOutcome::Skipped(employee) => employee,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, LifecycleOutcome::Applied(_))
    }

    fn map(self, f: impl FnOnce(employee::Model) -> employee::Model) -> Self {
        match self {
            LifecycleOutcome::Applied(employee) => LifecycleOutcome::Applied(f(employee)),
            LifecycleOutcome::Skipped(employee) => LifecycleOutcome::Skipped(f(employee)),
        }
    }
}

/// Onboard, update, offboard and reboard employees.
#[derive(Clone)]
pub struct LifecycleEngine {
    employees: EmployeeDao,
    audit: AuditService,
    events: Arc<dyn EventSink>,
}

impl LifecycleEngine {
    pub fn new(employees: EmployeeDao, audit: AuditService, events: Arc<dyn EventSink>) -> Self {
        Self {
            employees,
            audit,
            events,
        }
    }

    pub async fn onboard(
        &self,
        actor: &Actor,
        mut fields: EmployeeFields,
    ) -> Result<employee::Model, AppError> {
        actor.ensure(Capability::Onboard)?;
        fields.normalize()?;

        if let Some(existing) = self.employees.find_by_email(&fields.email).await? {
            return Err(self.duplicate(actor, &existing).await);
        }

        let email = fields.email.clone();
        let mut active = employee::ActiveModel::default();
        fields.apply_to(&mut active, actor.can(Capability::Payroll));

        let employee = match self.employees.insert_onboarded(active).await {
            Ok(employee) => employee,
            Err(err) if err.is_unique_violation() => {
                return Err(self.duplicate_after_race(actor, &email, err).await);
            }
            Err(err) => return Err(err.into()),
        };

        self.audit
            .info(
                "Onboarding",
                &actor.username,
                &format!("Onboarded {} ({})", employee.full_name, employee.email),
            )
            .await;
        self.emit(TransitionKind::Onboarded, &employee, actor);
        Ok(self.visible_to(actor, employee))
    }

    /// Non-payroll fields are replaced wholesale; payroll fields only when
    /// the actor holds the payroll capability.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        mut fields: EmployeeFields,
    ) -> Result<LifecycleOutcome, AppError> {
        actor.ensure(Capability::EditEmployee)?;
        fields.normalize()?;

        let current = self.employees.find_by_id(id).await?;
        if current.is_offboarded() {
            tracing::info!(employee_id = %id, "edit of offboarded employee skipped");
            return Ok(LifecycleOutcome::Skipped(current).map(|e| self.visible_to(actor, e)));
        }

        if fields.email != current.email {
            if let Some(other) = self.employees.find_by_email(&fields.email).await? {
                return Err(self.duplicate(actor, &other).await);
            }
        }

        let email = fields.email.clone();
        let include_payroll = actor.can(Capability::Payroll);
        let employee = match self
            .employees
            .update(id, move |active| fields.apply_to(active, include_payroll))
            .await
        {
            Ok(employee) => employee,
            Err(err) if err.is_unique_violation() => {
                return Err(self.duplicate_after_race(actor, &email, err).await);
            }
            Err(err) => return Err(err.into()),
        };

        self.audit
            .info(
                "Edit Employee",
                &actor.username,
                &format!("Updated {} ({})", employee.full_name, employee.email),
            )
            .await;
        self.emit(TransitionKind::Updated, &employee, actor);
        Ok(LifecycleOutcome::Applied(self.visible_to(actor, employee)))
    }

    /// Keeps an existing `end_date`, otherwise stamps today.
    pub async fn offboard(&self, actor: &Actor, id: Uuid) -> Result<LifecycleOutcome, AppError> {
        actor.ensure(Capability::Offboard)?;

        let current = self.employees.find_by_id(id).await?;
        if current.is_offboarded() {
            tracing::info!(employee_id = %id, "employee already offboarded");
            return Ok(LifecycleOutcome::Skipped(current).map(|e| self.visible_to(actor, e)));
        }

        let end_date = current
            .end_date
            .is_none()
            .then(|| Utc::now().date_naive());
        let employee = self
            .employees
            .set_status(&id, EmploymentStatus::Offboarded, end_date)
            .await?;

        self.audit
            .info(
                "Offboarding",
                &actor.username,
                &format!("Offboarded {} ({})", employee.full_name, employee.email),
            )
            .await;
        self.emit(TransitionKind::Offboarded, &employee, actor);
        Ok(LifecycleOutcome::Applied(self.visible_to(actor, employee)))
    }

    pub async fn reboard(&self, actor: &Actor, id: Uuid) -> Result<LifecycleOutcome, AppError> {
        actor.ensure(Capability::Onboard)?;

        let current = self.employees.find_by_id(id).await?;
        if !current.is_offboarded() {
            tracing::info!(employee_id = %id, "employee already onboarded");
            return Ok(LifecycleOutcome::Skipped(current).map(|e| self.visible_to(actor, e)));
        }

        let employee = self
            .employees
            .set_status(&id, EmploymentStatus::Onboarded, None)
            .await?;

        self.audit
            .info(
                "Re-Onboarding",
                &actor.username,
                &format!("Re-onboarded {} ({})", employee.full_name, employee.email),
            )
            .await;
        self.emit(TransitionKind::Reboarded, &employee, actor);
        Ok(LifecycleOutcome::Applied(self.visible_to(actor, employee)))
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<employee::Model, AppError> {
        let employee = self.employees.find_by_id(id).await?;
        Ok(self.visible_to(actor, employee))
    }

    pub async fn search_onboarded(
        &self,
        actor: &Actor,
        needle: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<employee::Model>, AppError> {
        self.search(actor, EmploymentStatus::Onboarded, needle, page, page_size)
            .await
    }

    pub async fn search_offboarded(
        &self,
        actor: &Actor,
        needle: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<employee::Model>, AppError> {
        self.search(actor, EmploymentStatus::Offboarded, needle, page, page_size)
            .await
    }

    async fn search(
        &self,
        actor: &Actor,
        status: EmploymentStatus,
        needle: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<employee::Model>, AppError> {
        let results = self
            .employees
            .search(status, needle, page, page_size)
            .await?;
        Ok(results.map(|employee| self.visible_to(actor, employee)))
    }

    fn visible_to(&self, actor: &Actor, employee: employee::Model) -> employee::Model {
        if actor.can(Capability::Payroll) {
            employee
        } else {
            redact_payroll(employee)
        }
    }

    fn emit(&self, kind: TransitionKind, employee: &employee::Model, actor: &Actor) {
        self.events.publish(TransitionEvent {
            kind,
            employee: employee.clone(),
            actor: actor.username.clone(),
        });
    }

    async fn duplicate(&self, actor: &Actor, existing: &employee::Model) -> AppError {
        self.audit
            .warn(
                "Duplicate Onboarding",
                &actor.username,
                &format!("{} already exists", existing.email),
            )
            .await;
        AppError::duplicate_employee(existing.id)
    }

    /// The unique index caught a row inserted after our lookup.
    async fn duplicate_after_race(
        &self,
        actor: &Actor,
        email: &str,
        err: DaoLayerError,
    ) -> AppError {
        match self.employees.find_by_email(email).await {
            Ok(Some(existing)) => self.duplicate(actor, &existing).await,
            _ => err.into(),
        }
    }
}
