use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{DomainError, FieldError, FieldErrors};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Classified {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClassified {
    pub user_id: i64,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
}

/// Fields of a partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedChanges {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
}

/// Raw `classified` payload as sent by clients. Fields stay untyped so a bad
/// value becomes a field error instead of rejecting the whole envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifiedParams {
    pub title: Option<Value>,
    pub price: Option<Value>,
    pub description: Option<Value>,
}

impl ClassifiedParams {
    pub fn into_new(self, user_id: i64) -> Result<NewClassified, DomainError> {
        let mut errors = FieldErrors::default();

        let title = match parse_text(self.title) {
            Ok(Some(title)) if !title.trim().is_empty() => title,
            Ok(_) => {
                errors.add("title", FieldError::new("blank"));
                String::new()
            }
            Err(error) => {
                errors.add("title", error);
                String::new()
            }
        };

        let price = match self.price {
            Some(raw) => parse_price(&mut errors, raw),
            None => {
                errors.add("price", FieldError::new("blank"));
                None
            }
        };

        let description = parse_text(self.description).unwrap_or_else(|error| {
            errors.add("description", error);
            None
        });

        errors.into_result(()).map(|()| NewClassified {
            user_id,
            title,
            price: price.unwrap_or_default(),
            description,
        })
    }

    pub fn into_changes(self) -> Result<ClassifiedChanges, DomainError> {
        let mut errors = FieldErrors::default();

        let title = match parse_text(self.title) {
            Ok(Some(title)) if title.trim().is_empty() => {
                errors.add("title", FieldError::new("blank"));
                None
            }
            Ok(title) => title,
            Err(error) => {
                errors.add("title", error);
                None
            }
        };

        let price = self.price.and_then(|raw| parse_price(&mut errors, raw));

        let description = parse_text(self.description).unwrap_or_else(|error| {
            errors.add("description", error);
            None
        });

        errors.into_result(ClassifiedChanges {
            title,
            price,
            description,
        })
    }
}

/// `null` counts as absent; anything but a string is `invalid`.
fn parse_text(raw: Option<Value>) -> Result<Option<String>, FieldError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(FieldError::new("invalid").with_value(other)),
    }
}

fn parse_price(errors: &mut FieldErrors, raw: Value) -> Option<i64> {
    let number = match &raw {
        Value::Number(n) => n.as_i64().map(Ok).or_else(|| n.as_f64().map(Err)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(Ok)
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(Err))
        }
        Value::Null => {
            errors.add("price", FieldError::new("blank"));
            return None;
        }
        _ => None,
    };

    match number {
        Some(Ok(price)) => Some(price),
        Some(Err(float)) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
            Some(float as i64)
        }
        Some(Err(_)) => {
            errors.add("price", FieldError::new("not_an_integer").with_value(raw));
            None
        }
        None => {
            let blank = matches!(&raw, Value::String(s) if s.trim().is_empty());
            if blank {
                errors.add("price", FieldError::new("blank"));
            } else {
                errors.add("price", FieldError::new("not_a_number").with_value(raw));
            }
            None
        }
    }
}
