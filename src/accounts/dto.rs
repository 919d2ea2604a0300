use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

const MIN_PASSWORD_LEN: usize = 5;

/// Request body for account creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub citizenship: Option<String>,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::validation("username is required"));
        }
        if !is_valid_email(&self.email) {
            return Err(ApiError::validation("invalid email"));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation("password too short"));
        }
        Ok(())
    }
}

/// Partial account update. Recognized fields only; everything absent means
/// the request is rejected before the store is touched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateAccountRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::validation("no fields to update"));
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ApiError::validation("invalid email"));
            }
        }
        if let Some(password) = &self.password {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(ApiError::validation("password too short"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_create() -> CreateAccountRequest {
        CreateAccountRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "secret1".into(),
            first_name: None,
            last_name: None,
            address: None,
            country: None,
            city: None,
            phone: None,
            gender: None,
            citizenship: None,
        }
    }

    #[test]
    fn valid_create_request_passes() {
        assert!(base_create().validate().is_ok());
    }

    #[test]
    fn create_rejects_bad_email() {
        let mut req = base_create();
        req.email = "not-an-email".into();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn create_rejects_short_password() {
        let mut req = base_create();
        req.password = "abc".into();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn empty_update_is_rejected() {
        let req = UpdateAccountRequest::default();
        assert!(req.is_empty());
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn single_field_update_passes() {
        let req = UpdateAccountRequest {
            username: Some("bob".into()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user example@x.com"));
    }
}
