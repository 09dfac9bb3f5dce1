use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("username already taken")]
    UsernameTaken,
    #[error("classified not found: {0}")]
    ClassifiedNotFound(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidParameter(String),
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("forbidden")]
    Forbidden,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn missing_parameter(name: &str) -> Self {
        DomainError::InvalidParameter(format!("missing parameter {name}"))
    }
}

/// Per-field model errors, rendered as `{"<field>": [{"error": "<code>", ...}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<FieldError>>);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl FieldError {
    pub fn new(error: &'static str) -> Self {
        Self {
            error,
            value: None,
            count: None,
        }
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.0.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[FieldError]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turns the collected errors into a result, keeping `value` when nothing failed.
    pub fn into_result<T>(self, value: T) -> Result<T, DomainError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::ClassifiedNotFound(_)
            | DomainError::InvalidCredentials => StatusCode::NOT_FOUND,
            DomainError::InvalidParameter(_) | DomainError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::UsernameTaken => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            DomainError::InvalidParameter(message) => response.json(ErrorBody { error: message }),
            DomainError::Validation(errors) => response.json(errors),
            DomainError::UsernameTaken => response.json(ErrorBody {
                error: "username already taken",
            }),
            DomainError::Internal(detail) => {
                error!(detail = %detail, "request failed with internal error");
                response.json(ErrorBody {
                    error: "internal server error",
                })
            }
            // 401, 403 and 404 carry no body
            _ => response.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_of(err: DomainError) -> (StatusCode, Vec<u8>) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        (status, bytes.to_vec())
    }

    #[actix_web::test]
    async fn not_found_and_auth_errors_have_empty_bodies() {
        for err in [
            DomainError::Unauthorized,
            DomainError::Forbidden,
            DomainError::ClassifiedNotFound("lala".into()),
        ] {
            let (_, body) = body_of(err).await;
            assert!(body.is_empty());
        }
    }

    #[actix_web::test]
    async fn parameter_errors_render_error_key() {
        let (status, body) = body_of(DomainError::missing_parameter("page")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value, json!({ "error": "missing parameter page" }));
    }

    #[actix_web::test]
    async fn field_errors_render_per_field() {
        let mut errors = FieldErrors::default();
        errors.add(
            "price",
            FieldError::new("not_a_number").with_value(json!("blabla")),
        );
        let (status, body) = body_of(DomainError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            value,
            json!({ "price": [{ "error": "not_a_number", "value": "blabla" }] })
        );
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_of(DomainError::Internal("pool timed out".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let text = String::from_utf8(body).expect("utf8");
        assert!(!text.contains("pool"));
    }
}
