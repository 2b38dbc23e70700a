use sea_orm::DatabaseConnection;

use super::{
    AuditDao, DaoBase, EmployeeDao, ReferenceDao, RoleDao, SettingsDao, TemplateDao, UserDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn role(&self) -> RoleDao {
        DaoBase::new(&self.db)
    }

    pub fn employee(&self) -> EmployeeDao {
        DaoBase::new(&self.db)
    }

    pub fn settings(&self) -> SettingsDao {
        DaoBase::new(&self.db)
    }

    pub fn template(&self) -> TemplateDao {
        DaoBase::new(&self.db)
    }

    pub fn reference(&self) -> ReferenceDao {
        DaoBase::new(&self.db)
    }

    pub fn audit(&self) -> AuditDao {
        DaoBase::new(&self.db)
    }
}
