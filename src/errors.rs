use axum::http::StatusCode;
use thiserror::Error;

/// Failures of dashboard operations. Callers in the presentation layer mostly
/// turn these into "nothing happened", but each kind stays distinguishable.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{entity} '{locator}' not found")]
    NotFound {
        entity: &'static str,
        locator: String,
    },

    #[error("invalid value for {field}: {value:?}")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("invalid metric draft: {0}")]
    InvalidDraft(String),

    #[error("malformed import: {0}")]
    MalformedImport(#[source] serde_json::Error),

    #[error("{entity} '{id}' is a default entry and cannot be changed")]
    Protected { entity: &'static str, id: String },

    #[error("no edit session is open")]
    NoActiveEdit,

    #[error("snapshot rendering failed: {0}")]
    Render(String),

    #[error("region '{0}' has no area to place")]
    EmptyRegion(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn not_found(entity: &'static str, locator: impl ToString) -> Self {
        Self::NotFound {
            entity,
            locator: locator.to_string(),
        }
    }

    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            value: value.into(),
        }
    }

    pub fn protected(entity: &'static str, id: impl Into<String>) -> Self {
        Self::Protected {
            entity,
            id: id.into(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::Protected { .. } | DashboardError::NoActiveEdit => StatusCode::CONFLICT,
            DashboardError::InvalidFieldValue { .. }
            | DashboardError::InvalidDraft(_)
            | DashboardError::MalformedImport(_)
            | DashboardError::EmptyRegion(_) => StatusCode::BAD_REQUEST,
            DashboardError::Render(_)
            | DashboardError::Storage(_)
            | DashboardError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_errors_map_to_http_status() {
        let missing: AppError = DashboardError::not_found("chart", "chart-1").into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "chart 'chart-1' not found");

        let protected: AppError = DashboardError::protected("theme", "theme-default").into();
        assert_eq!(protected.status, StatusCode::CONFLICT);

        let invalid: AppError = DashboardError::invalid_value("type", "donut").into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
