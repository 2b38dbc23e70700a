use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{} not found (id={id})", entity_label(.entity))]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// True when the database rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DaoLayerError::Db(err) => {
                matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}

/// `hermes_hr::db::entities::employee::Entity` reads as `employee`.
fn entity_label(type_name: &str) -> &str {
    type_name.rsplit("::").nth(1).unwrap_or(type_name)
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::DaoLayerError;

    #[test]
    fn not_found_names_the_entity_module() {
        let id = Uuid::nil();
        let err = DaoLayerError::NotFound {
            entity: "hermes_hr::db::entities::employee::Entity",
            id,
        };
        assert_eq!(err.to_string(), format!("employee not found (id={id})"));
    }

    #[test]
    fn custom_errors_are_not_unique_violations() {
        let err = DaoLayerError::Db(DbErr::Custom("boom".to_string()));
        assert!(!err.is_unique_violation());
    }
}
