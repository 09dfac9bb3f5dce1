use crate::domain::classified::{Classified, ClassifiedParams};
use crate::domain::user::{Registration, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub auth: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub jwt: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub response: &'static str,
}

// ======================= USERS =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user: Option<Registration>,
}

/// `{id, fullname, username}`, served by the unversioned and v1 APIs.
#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub id: i64,
    pub fullname: String,
    pub username: String,
}

/// `{id, firstname, lastname, username}`, served by v2.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Summary(UserSummaryResponse),
    Detailed(UserResponse),
}

impl From<&User> for UserSummaryResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname(),
            username: user.username.clone(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            username: user.username.clone(),
        }
    }
}

// ======================= CLASSIFIEDS =======================

#[derive(Debug, Deserialize)]
pub struct ClassifiedRequest {
    pub classified: Option<ClassifiedParams>,
}

/// Flat record, served by the unversioned API.
#[derive(Debug, Serialize)]
pub struct ClassifiedResponse {
    pub id: i64,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: i64,
    pub fullname: String,
}

/// Record with its owner nested under `user`, served by v1 and v2.
#[derive(Debug, Serialize)]
pub struct ClassifiedWithOwnerResponse {
    pub id: i64,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub user: OwnerResponse,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClassifiedView {
    Plain(ClassifiedResponse),
    WithOwner(ClassifiedWithOwnerResponse),
}

impl From<Classified> for ClassifiedResponse {
    fn from(classified: Classified) -> Self {
        Self {
            id: classified.id,
            title: classified.title,
            price: classified.price,
            description: classified.description,
            user_id: classified.user_id,
            created_at: classified.created_at,
            updated_at: classified.updated_at,
        }
    }
}

impl ClassifiedWithOwnerResponse {
    pub fn new(classified: Classified, owner: &User) -> Self {
        Self {
            id: classified.id,
            title: classified.title,
            price: classified.price,
            description: classified.description,
            user: OwnerResponse {
                id: owner.id,
                fullname: owner.fullname(),
            },
        }
    }
}
