use serde::Deserialize;

use crate::error::ApiError;

/// Request body for comment creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() {
            return Err(ApiError::validation("content is required"));
        }
        Ok(())
    }
}

/// Partial comment update; `content` is the only recognized field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        match &self.content {
            None => Err(ApiError::validation("no fields to update")),
            Some(c) if c.trim().is_empty() => Err(ApiError::validation("content is required")),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            UpdateCommentRequest::default().validate(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn create_requires_content() {
        let req = CreateCommentRequest {
            author_id: 1,
            post_id: 1,
            content: "".into(),
        };
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }
}
