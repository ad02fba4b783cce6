use serde::Deserialize;

use crate::error::ServiceError;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

/// A registration that passed validation.
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: &'static str,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ServiceError> {
        let email = crate::utils::normalize_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name must not be empty"));
        }
        let role = crate::utils::assert_role_str(self.role.trim())?;

        Ok(NewUser {
            email,
            password: self.password,
            name: name.to_string(),
            role,
        })
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
