use std::collections::HashMap;
use std::sync::Arc;

use crate::data::classified_repository::ClassifiedRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::classified::{Classified, ClassifiedParams};
use crate::domain::error::DomainError;
use crate::domain::listing::{ListParams, ListingPolicy};
use crate::domain::user::User;
use tracing::{instrument, warn};

/// Only the owner of a classified may change or remove it.
pub fn ensure_owner(owner_id: i64, requester_id: i64) -> Result<(), DomainError> {
    if owner_id != requester_id {
        Err(DomainError::Forbidden)
    } else {
        Ok(())
    }
}

#[derive(Clone)]
pub struct ClassifiedService {
    classifieds: Arc<dyn ClassifiedRepository>,
    users: Arc<dyn UserRepository>,
}

impl ClassifiedService {
    pub fn new(classifieds: Arc<dyn ClassifiedRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { classifieds, users }
    }

    pub async fn get_classified(&self, id: i64) -> Result<Classified, DomainError> {
        self.classifieds
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::ClassifiedNotFound(id.to_string()))
    }

    /// Validates the query against `policy` before touching the store.
    pub async fn list_classifieds(
        &self,
        policy: ListingPolicy,
        params: &ListParams,
    ) -> Result<Vec<Classified>, DomainError> {
        let window = policy.resolve(params)?;
        self.classifieds.list(window).await
    }

    /// Owners of the given classifieds, keyed by user id.
    pub async fn owners(&self, classifieds: &[Classified]) -> Result<HashMap<i64, User>, DomainError> {
        let mut ids: Vec<i64> = classifieds.iter().map(|c| c.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let owners: HashMap<i64, User> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        if owners.len() != ids.len() {
            warn!(expected = ids.len(), found = owners.len(), "classified owners missing");
            return Err(DomainError::Internal("classified owner missing".into()));
        }
        Ok(owners)
    }

    #[instrument(skip(self, params))]
    pub async fn create_classified(
        &self,
        owner_id: i64,
        params: ClassifiedParams,
    ) -> Result<Classified, DomainError> {
        let classified = params.into_new(owner_id)?;
        self.classifieds.create(classified).await
    }

    #[instrument(skip(self, params))]
    pub async fn update_classified(
        &self,
        requester_id: i64,
        classified_id: i64,
        params: Option<ClassifiedParams>,
    ) -> Result<Classified, DomainError> {
        let existing = self.get_classified(classified_id).await?;
        ensure_owner(existing.user_id, requester_id)?;
        let changes = params
            .ok_or_else(|| DomainError::missing_parameter("classified"))?
            .into_changes()?;

        self.classifieds
            .update(classified_id, requester_id, changes)
            .await?
            .ok_or_else(|| DomainError::ClassifiedNotFound(classified_id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_classified(
        &self,
        requester_id: i64,
        classified_id: i64,
    ) -> Result<(), DomainError> {
        let existing = self.get_classified(classified_id).await?;
        ensure_owner(existing.user_id, requester_id)?;
        self.classifieds.delete(classified_id, requester_id).await
    }
}
