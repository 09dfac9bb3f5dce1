use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, FieldError, FieldErrors};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn fullname(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// A user that passed registration checks and awaits its store-assigned id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password_hash: String,
}

/// Raw registration input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Registration fields after validation; the password is still plain text.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
}

impl Registration {
    pub fn validate(self) -> Result<ValidRegistration, DomainError> {
        let mut errors = FieldErrors::default();
        let firstname = required(&mut errors, "firstname", self.firstname);
        let lastname = required(&mut errors, "lastname", self.lastname);
        let username = required(&mut errors, "username", self.username);
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", FieldError::new("blank"));
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                FieldError::new("too_short").with_count(MIN_PASSWORD_LEN),
            );
        }

        errors.into_result(ValidRegistration {
            firstname,
            lastname,
            username,
            password,
        })
    }
}

fn required(errors: &mut FieldErrors, field: &'static str, value: Option<String>) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, FieldError::new("blank"));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str) -> Registration {
        Registration {
            firstname: Some("Ada".into()),
            lastname: Some("Lovelace".into()),
            username: Some("ada".into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn fullname_joins_first_and_last_name() {
        let user = User {
            id: 1,
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            username: "ada".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        assert_eq!(user.fullname(), "Ada Lovelace");
    }

    #[test]
    fn registration_requires_every_field() {
        let err = Registration::default().validate().unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        for field in ["firstname", "lastname", "username", "password"] {
            assert_eq!(errors.get(field).map(|e| e[0].error), Some("blank"));
        }
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = registration("short").validate().unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let password = errors.get("password").expect("password errors");
        assert_eq!(password[0].error, "too_short");
        assert_eq!(password[0].count, Some(MIN_PASSWORD_LEN));
    }

    #[test]
    fn valid_registration_is_trimmed() {
        let mut input = registration("correct horse");
        input.username = Some("  ada  ".into());
        let valid = input.validate().expect("valid");
        assert_eq!(valid.username, "ada");
        assert_eq!(valid.password, "correct horse");
    }
}
