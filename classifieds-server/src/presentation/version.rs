//! Per-generation behaviour of the public API.
//!
//! The same handlers serve `/`, `/v1` and `/v2`; each route scope carries an
//! [`ApiVersion`] as app data and handlers ask it for the listing policy and
//! the response shapes instead of branching on the path.

use std::collections::HashMap;

use actix_web::http::StatusCode;

use crate::domain::classified::Classified;
use crate::domain::error::DomainError;
use crate::domain::listing::ListingPolicy;
use crate::domain::user::User;
use crate::presentation::dto::{
    ClassifiedResponse, ClassifiedView, ClassifiedWithOwnerResponse, UserResponse,
    UserSummaryResponse, UserView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    Unversioned,
    V1,
    V2,
}

impl ApiVersion {
    pub fn prefix(self) -> &'static str {
        match self {
            ApiVersion::Unversioned => "",
            ApiVersion::V1 => "/v1",
            ApiVersion::V2 => "/v2",
        }
    }

    pub fn listing_policy(self) -> ListingPolicy {
        match self {
            ApiVersion::Unversioned => ListingPolicy::Unpaged,
            ApiVersion::V1 => ListingPolicy::PagedById,
            ApiVersion::V2 => ListingPolicy::PagedByCreatedAt,
        }
    }

    /// Paged listings answer 206 Partial Content.
    pub fn list_status(self) -> StatusCode {
        match self.listing_policy() {
            ListingPolicy::Unpaged => StatusCode::OK,
            ListingPolicy::PagedById | ListingPolicy::PagedByCreatedAt => {
                StatusCode::PARTIAL_CONTENT
            }
        }
    }

    pub fn nests_owner(self) -> bool {
        !matches!(self, ApiVersion::Unversioned)
    }

    /// Shapes classifieds for this version. `owners` must hold every owner
    /// when [`Self::nests_owner`] is true and may be empty otherwise.
    pub fn classified_views(
        self,
        classifieds: Vec<Classified>,
        owners: &HashMap<i64, User>,
    ) -> Result<Vec<ClassifiedView>, DomainError> {
        classifieds
            .into_iter()
            .map(|classified| {
                if !self.nests_owner() {
                    return Ok(ClassifiedView::Plain(ClassifiedResponse::from(classified)));
                }
                let owner = owners.get(&classified.user_id).ok_or_else(|| {
                    DomainError::Internal(format!(
                        "owner {} of classified {} not loaded",
                        classified.user_id, classified.id
                    ))
                })?;
                Ok(ClassifiedView::WithOwner(ClassifiedWithOwnerResponse::new(
                    classified, owner,
                )))
            })
            .collect()
    }

    pub fn user_view(self, user: &User) -> UserView {
        match self {
            ApiVersion::Unversioned | ApiVersion::V1 => {
                UserView::Summary(UserSummaryResponse::from(user))
            }
            ApiVersion::V2 => UserView::Detailed(UserResponse::from(user)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn user() -> User {
        User {
            id: 3,
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            username: "ada".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    fn classified() -> Classified {
        Classified {
            id: 9,
            user_id: 3,
            title: "bike".into(),
            price: 62,
            description: Some("red".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn versions_pick_their_listing_policy() {
        assert_eq!(ApiVersion::Unversioned.list_status(), StatusCode::OK);
        assert_eq!(ApiVersion::V1.list_status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            ApiVersion::V2.listing_policy(),
            ListingPolicy::PagedByCreatedAt
        );
    }

    #[test]
    fn versioned_classifieds_nest_owner_summary() {
        let owners = HashMap::from([(3, user())]);
        let views = ApiVersion::V2
            .classified_views(vec![classified()], &owners)
            .expect("views");
        assert_eq!(
            serde_json::to_value(&views[0]).expect("json"),
            json!({
                "id": 9,
                "title": "bike",
                "price": 62,
                "description": "red",
                "user": { "id": 3, "fullname": "Ada Lovelace" },
            })
        );
    }

    #[test]
    fn unversioned_classifieds_are_flat() {
        let views = ApiVersion::Unversioned
            .classified_views(vec![classified()], &HashMap::new())
            .expect("views");
        let value = serde_json::to_value(&views[0]).expect("json");
        assert_eq!(value["user_id"], json!(3));
        assert!(value.get("user").is_none());
    }

    #[test]
    fn missing_owner_is_an_internal_error() {
        let err = ApiVersion::V1
            .classified_views(vec![classified()], &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn user_shape_depends_on_version() {
        let v1 = serde_json::to_value(ApiVersion::V1.user_view(&user())).expect("json");
        let v2 = serde_json::to_value(ApiVersion::V2.user_view(&user())).expect("json");
        assert_eq!(
            v1,
            json!({ "id": 3, "fullname": "Ada Lovelace", "username": "ada" })
        );
        assert_eq!(
            v2,
            json!({ "id": 3, "firstname": "Ada", "lastname": "Lovelace", "username": "ada" })
        );
    }
}
