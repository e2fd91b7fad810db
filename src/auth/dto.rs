use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::errors::FieldError;
use crate::validate;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Cleaned (username, email) or every failed field at once.
    pub fn validate(&self) -> Result<(String, String), Vec<FieldError>> {
        let mut errors = Vec::new();
        let username = validate::accumulate(&mut errors, validate::username(&self.username));
        let email = validate::accumulate(&mut errors, validate::email(&self.email));
        validate::accumulate(&mut errors, validate::password(&self.password));
        match (username, email, errors.is_empty()) {
            (Some(username), Some(email), true) => Ok((username, email)),
            _ => Err(errors),
        }
    }
}

/// Request body for login and API key refresh.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub keep_logged_in: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

/// Username and/or email change; at least one field must be present.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(Option<String>, Option<String>), Vec<FieldError>> {
        if self.username.is_none() && self.email.is_none() {
            return Err(vec![FieldError::new(
                "username",
                "provide a username or an email to change",
            )]);
        }
        let mut errors = Vec::new();
        let username = match &self.username {
            Some(raw) => validate::accumulate(&mut errors, validate::username(raw)).map(Some),
            None => Some(None),
        };
        let email = match &self.email {
            Some(raw) => validate::accumulate(&mut errors, validate::email(raw)).map(Some),
            None => Some(None),
        };
        match (username, email, errors.is_empty()) {
            (Some(username), Some(email), true) => Ok((username, email)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Account deletion asks the user to retype their identity as confirmation.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
