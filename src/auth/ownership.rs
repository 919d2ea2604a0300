use sqlx::PgPool;
use tracing::debug;

use crate::error::ApiError;

/// Kinds of resource the ownership check understands. Ownership is binary:
/// an account owns itself, posts and comments are owned by their author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Account,
    Post,
    Comment,
}

/// Authorizes `caller` to mutate the resource `(kind, resource_id)`.
///
/// A resource that does not exist fails with `Forbidden`, not `NotFound`:
/// existence is not leaked to callers who would not be allowed to touch the
/// resource anyway. The mutating statement itself reports `NotFound` when
/// applicable.
pub async fn authorize(
    db: &PgPool,
    kind: ResourceKind,
    resource_id: i64,
    caller: i64,
) -> Result<(), ApiError> {
    let owner = match kind {
        ResourceKind::Account => Some(resource_id),
        ResourceKind::Post => {
            sqlx::query_scalar::<_, i64>("SELECT author_id FROM posts WHERE id = $1")
                .bind(resource_id)
                .fetch_optional(db)
                .await?
        }
        ResourceKind::Comment => {
            sqlx::query_scalar::<_, i64>("SELECT author_id FROM comments WHERE id = $1")
                .bind(resource_id)
                .fetch_optional(db)
                .await?
        }
    };
    debug!(?kind, resource_id, caller, owner = ?owner, "ownership check");
    ensure_owner(caller, owner)
}

/// Pure ownership predicate: authorized iff the resource exists and its
/// owner is the caller.
fn ensure_owner(caller: i64, owner: Option<i64>) -> Result<(), ApiError> {
    match owner {
        Some(owner_id) if owner_id == caller => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_authorized() {
        assert!(ensure_owner(5, Some(5)).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = ensure_owner(5, Some(6)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn missing_resource_is_forbidden_not_not_found() {
        // Existence must not leak through the authorization layer.
        let err = ensure_owner(5, None).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[tokio::test]
    async fn account_kind_needs_no_store_read() {
        // The pool never connects; an account self-check must not query.
        let state = crate::state::AppState::fake();
        assert!(authorize(&state.db, ResourceKind::Account, 9, 9).await.is_ok());
        let err = authorize(&state.db, ResourceKind::Account, 9, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
