use std::sync::Arc;

use tracing::{debug, instrument};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, Registration, User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    #[cfg(test)]
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let valid = registration.validate()?;
        if self.repo.find_by_username(&valid.username).await?.is_some() {
            return Err(DomainError::UsernameTaken);
        }

        let password_hash =
            hash_password(&valid.password).map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo
            .create(NewUser {
                firstname: valid.firstname,
                lastname: valid.lastname,
                username: valid.username,
                password_hash,
            })
            .await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// Maps a bearer token to its user. Bad signatures, expired tokens and
    /// tokens naming a deleted user all resolve to `None`.
    pub async fn resolve_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        let claims = match self.keys.verify_token(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "rejected bearer token");
                return Ok(None);
            }
        };
        let Some(user_id) = claims.user_id() else {
            return Ok(None);
        };
        self.repo.find_by_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryStore;

    fn service() -> (AuthService, MemoryStore) {
        let store = MemoryStore::new();
        let service = AuthService::new(
            Arc::new(store.clone()),
            JwtKeys::new("test-secret".into(), 1),
        );
        (service, store)
    }

    fn registration(username: &str) -> Registration {
        Registration {
            firstname: Some("Ada".into()),
            lastname: Some("Lovelace".into()),
            username: Some(username.into()),
            password: Some("correct horse".into()),
        }
    }

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let (service, _) = service();
        let user = service.register(registration("ada")).await.expect("user");
        assert_ne!(user.password_hash, "correct horse");

        let token = service.login("ada", "correct horse").await.expect("token");
        let resolved = service.resolve_token(&token).await.expect("lookup");
        assert_eq!(resolved.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (service, _) = service();
        service.register(registration("ada")).await.expect("user");
        let err = service.register(registration("ada")).await.unwrap_err();
        assert!(matches!(err, DomainError::UsernameTaken));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (service, _) = service();
        service.register(registration("ada")).await.expect("user");

        let wrong = service.login("ada", "battery staple").await.unwrap_err();
        let unknown = service.login("grace", "correct horse").await.unwrap_err();
        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert!(matches!(unknown, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn garbage_and_dangling_tokens_resolve_to_nobody() {
        let (service, _) = service();
        assert!(service.resolve_token("not-a-jwt").await.expect("lookup").is_none());

        let dangling = service.keys().generate_token(999).expect("token");
        assert!(service.resolve_token(&dangling).await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn get_user_reports_missing_ids() {
        let (service, store) = service();
        let user = store.insert_user("Grace", "Hopper", "grace", "hash");
        assert_eq!(service.get_user(user.id).await.expect("user").username, "grace");
        assert!(matches!(
            service.get_user(user.id + 1).await,
            Err(DomainError::UserNotFound(_))
        ));
    }
}
