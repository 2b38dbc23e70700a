use crate::{
    db::{dao::UserDao, entities::user},
    error::AppError,
};

/// The slice of the user directory the login flow needs.
#[derive(Clone)]
pub struct UserService {
    users: UserDao,
}

impl UserService {
    pub fn new(users: UserDao) -> Self {
        Self { users }
    }

    /// Looks up the account a login attempt names. Surrounding whitespace in
    /// the submitted username is ignored; case is not.
    pub async fn login_candidate(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(None);
        }
        Ok(self.users.find_by_username(username).await?)
    }
}
