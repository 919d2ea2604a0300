use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-level error taxonomy. Each variant owns its status code so
/// handlers can return `Result<_, ApiError>` and stay out of the mapping
/// business.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No credential was presented at all.
    #[error("missing credentials")]
    Unauthenticated,

    /// A credential was presented but is invalid, expired or tampered.
    #[error("invalid or expired token")]
    Unauthorized,

    /// Authenticated, but not the owner of the target resource.
    #[error("forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    /// Unique-constraint violation (duplicate username/email).
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    /// Non-store internal failure (hashing, signing).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Unauthorized | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Store errors are logged with full detail but surfaced generically.
        let message = match &self {
            Self::Store(e) => {
                error!(error = %e, "store failure");
                "internal error".to_string()
            }
            Self::Internal(e) => {
                error!(error = %e, "internal failure");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Maps a duplicate-key insert to `Conflict`, everything else to `Store`.
pub fn unique_violation(e: sqlx::Error, what: &str) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return ApiError::Conflict(format!("{what} already taken"));
        }
    }
    ApiError::Store(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("post").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::validation("no fields to update").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("username already taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(ApiError::NotFound("comment").to_string(), "comment not found");
    }

    #[test]
    fn non_database_errors_stay_store_failures() {
        let err = unique_violation(sqlx::Error::RowNotFound, "username");
        assert!(matches!(err, ApiError::Store(_)));
    }
}
