//! In-memory repositories used by the handler and service tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::classified_repository::ClassifiedRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::classified::{Classified, ClassifiedChanges, NewClassified};
use crate::domain::error::DomainError;
use crate::domain::listing::{ListWindow, SortKey, SortOrder};
use crate::domain::user::{NewUser, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    classifieds: Vec<Classified>,
    next_user_id: i64,
    next_classified_id: i64,
}

/// Both tables behind one lock, shared by clones.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn insert_user(
        &self,
        firstname: &str,
        lastname: &str,
        username: &str,
        password_hash: &str,
    ) -> User {
        let mut tables = self.lock();
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            firstname: firstname.into(),
            lastname: lastname.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }

    pub fn insert_classified(
        &self,
        user_id: i64,
        title: &str,
        price: i64,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Classified {
        let mut tables = self.lock();
        tables.next_classified_id += 1;
        let classified = Classified {
            id: tables.next_classified_id,
            user_id,
            title: title.into(),
            price,
            description,
            created_at,
            updated_at: created_at,
        };
        tables.classifieds.push(classified.clone());
        classified
    }

    pub fn classified(&self, id: i64) -> Option<Classified> {
        self.lock().classifieds.iter().find(|c| c.id == id).cloned()
    }

    pub fn classifieds(&self) -> Vec<Classified> {
        self.lock().classifieds.clone()
    }

    pub fn count_owned_by(&self, user_id: i64) -> usize {
        self.lock()
            .classifieds
            .iter()
            .filter(|c| c.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        if self.lock().users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        Ok(self.insert_user(
            &user.firstname,
            &user.lastname,
            &user.username,
            &user.password_hash,
        ))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClassifiedRepository for MemoryStore {
    async fn create(&self, classified: NewClassified) -> Result<Classified, DomainError> {
        Ok(self.insert_classified(
            classified.user_id,
            &classified.title,
            classified.price,
            classified.description,
            Utc::now(),
        ))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Classified>, DomainError> {
        Ok(self.classified(id))
    }

    async fn list(&self, window: Option<ListWindow>) -> Result<Vec<Classified>, DomainError> {
        let mut rows = self.classifieds();
        rows.sort_by_key(|c| c.id);
        let Some(window) = window else {
            return Ok(rows);
        };

        if window.key == SortKey::CreatedAt {
            rows.sort_by_key(|c| (c.created_at, c.id));
        }
        if window.order == SortOrder::Desc {
            rows.reverse();
        }

        Ok(rows
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: ClassifiedChanges,
    ) -> Result<Option<Classified>, DomainError> {
        let mut tables = self.lock();
        let Some(stored) = tables
            .classifieds
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            stored.title = title;
        }
        if let Some(price) = changes.price {
            stored.price = price;
        }
        if let Some(description) = changes.description {
            stored.description = Some(description);
        }
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DomainError> {
        let mut tables = self.lock();
        let Some(position) = tables.classifieds.iter().position(|c| c.id == id) else {
            return Err(DomainError::ClassifiedNotFound(id.to_string()));
        };
        if tables.classifieds[position].user_id != owner_id {
            return Err(DomainError::Forbidden);
        }
        tables.classifieds.remove(position);
        Ok(())
    }
}
