use uuid::Uuid;

use crate::db::dao::DaoLayerError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Onboarding hit an email that already belongs to `existing_id`.
    #[error("Employee already exists")]
    DuplicateEmployee { existing_id: Uuid },
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn duplicate_employee(existing_id: Uuid) -> Self {
        Self::DuplicateEmployee { existing_id }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
            Self::DuplicateEmployee { .. } => "Employee already exists",
        }
    }

    /// Where a browser should be sent to look at the conflicting record.
    pub fn location(&self) -> Option<String> {
        match self {
            Self::DuplicateEmployee { existing_id } => {
                Some(format!("/api/v1/employees/{existing_id}/exists"))
            }
            _ => None,
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(_) => AppError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn duplicate_points_at_the_existing_record() {
        let existing_id = Uuid::new_v4();
        let err = AppError::duplicate_employee(existing_id);

        assert_eq!(err.to_string(), "Employee already exists");
        assert_eq!(
            err.location(),
            Some(format!("/api/v1/employees/{existing_id}/exists"))
        );
        assert_eq!(AppError::conflict("busy").location(), None);
    }

    #[test]
    fn dao_errors_map_onto_http_kinds() {
        let missing = AppError::from(DaoLayerError::NotFound {
            entity: "hermes_hr::db::entities::employee::Entity",
            id: Uuid::nil(),
        });
        assert!(matches!(missing, AppError::NotFound(_)));
        assert!(missing.message().starts_with("employee not found"));

        let paging = AppError::from(DaoLayerError::InvalidPagination {
            page: 0,
            page_size: 10,
        });
        assert!(matches!(paging, AppError::BadRequest(_)));
    }
}
