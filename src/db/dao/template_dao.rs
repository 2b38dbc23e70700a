use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{
    email_template::{self, TemplateKind},
    prelude::EmailTemplate,
};

#[derive(Clone)]
pub struct TemplateDao {
    db: DatabaseConnection,
}

impl DaoBase for TemplateDao {
    type Entity = EmailTemplate;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TemplateDao {
    pub async fn list_templates(&self) -> DaoResult<Vec<email_template::Model>> {
        self.find_iter(Some((email_template::Column::Kind, Order::Asc)), |query| query)
            .collect_all()
            .await
    }

    pub async fn find_by_kind(&self, kind: TemplateKind) -> DaoResult<Option<email_template::Model>> {
        self.find_one(move |query| query.filter(email_template::Column::Kind.eq(kind)))
            .await
    }

    /// Replaces the template for `kind`, creating it on first save.
    pub async fn upsert(
        &self,
        kind: TemplateKind,
        subject: String,
        body: String,
    ) -> DaoResult<email_template::Model> {
        match self.find_by_kind(kind).await? {
            Some(existing) => {
                self.update(existing.id, move |active| {
                    active.subject = Set(subject);
                    active.body = Set(body);
                })
                .await
            }
            None => {
                let model = email_template::ActiveModel {
                    kind: Set(kind),
                    subject: Set(subject),
                    body: Set(body),
                    ..Default::default()
                };
                self.create(model).await
            }
        }
    }
}
