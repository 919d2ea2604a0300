use serde::Deserialize;

use crate::error::ApiError;

/// Request body for post creation. The author is named explicitly so the
/// handler can report a missing account as 404.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: i64,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() {
            return Err(ApiError::validation("content is required"));
        }
        Ok(())
    }
}

/// Partial post update; `content` is the only recognized field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
}

impl UpdatePostRequest {
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
    fn create_rejects_blank_content() {
        let req = CreatePostRequest {
            author_id: 1,
            content: "   ".into(),
        };
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            UpdatePostRequest::default().validate(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn update_with_content_passes() {
        let req = UpdatePostRequest {
            content: Some("new text".into()),
        };
        assert!(req.validate().is_ok());
    }
}
