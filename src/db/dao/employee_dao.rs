use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{ColumnFilter, DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{
    employee::{self, EmploymentStatus},
    prelude::Employee,
};

#[derive(Clone)]
pub struct EmployeeDao {
    db: DatabaseConnection,
}

impl DaoBase for EmployeeDao {
    type Entity = Employee;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl EmployeeDao {
    /// `email` must already be normalised (trimmed, lower-case).
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<employee::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(employee::Column::Email.eq(email)))
            .await
    }

    pub async fn insert_onboarded(
        &self,
        mut active: employee::ActiveModel,
    ) -> DaoResult<employee::Model> {
        active.employment_status = Set(EmploymentStatus::Onboarded);
        self.create(active).await
    }

    pub async fn set_status(
        &self,
        id: &Uuid,
        status: EmploymentStatus,
        end_date: Option<NaiveDate>,
    ) -> DaoResult<employee::Model> {
        self.update(*id, move |active| {
            active.employment_status = Set(status);
            if let Some(end_date) = end_date {
                active.end_date = Set(Some(end_date));
            }
        })
        .await
    }

    /// Employees in `status`, optionally narrowed by a case-insensitive
    /// substring of the full name, ordered by first name.
    pub async fn search(
        &self,
        status: EmploymentStatus,
        needle: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<employee::Model>> {
        let mut filters = vec![ColumnFilter::eq(
            employee::Column::EmploymentStatus,
            status,
        )];
        if let Some(needle) = needle.map(str::trim).filter(|needle| !needle.is_empty()) {
            filters.push(ColumnFilter::contains(
                employee::Column::SearchName,
                &needle.to_lowercase(),
            ));
        }

        self.find_with_filters(
            page,
            page_size,
            Some((employee::Column::FirstName, Order::Asc)),
            &filters,
            |query| query,
        )
        .await
    }
}
