use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub role_id: Uuid,
    pub team_id: Option<Uuid>,
}

impl UserDao {
    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find_one(move |query| query.filter(user::Column::Username.eq(username)))
            .await
    }

    pub async fn create_user(&self, new_user: NewUser<'_>) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(new_user.username.to_string()),
            first_name: Set(new_user.first_name.to_string()),
            last_name: Set(new_user.last_name.to_string()),
            password_hash: Set(new_user.password_hash.to_string()),
            role_id: Set(new_user.role_id),
            team_id: Set(new_user.team_id),
            active: Set(true),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_users(&self) -> DaoResult<Vec<user::Model>> {
        self.find_iter(Some((user::Column::Username, Order::Asc)), |query| query)
            .collect_all()
            .await
    }

    pub async fn update_profile(
        &self,
        id: &Uuid,
        first_name: String,
        last_name: String,
        role_id: Uuid,
        team_id: Option<Uuid>,
    ) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            active.first_name = Set(first_name);
            active.last_name = Set(last_name);
            active.role_id = Set(role_id);
            active.team_id = Set(team_id);
        })
        .await
    }

    pub async fn set_password_hash(&self, id: &Uuid, password_hash: String) -> DaoResult<()> {
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }

    pub async fn deactivate(&self, id: &Uuid) -> DaoResult<user::Model> {
        self.update(*id, |active| {
            active.active = Set(false);
        })
        .await
    }
}
