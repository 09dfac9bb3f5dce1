use std::collections::HashMap;

use crate::application::classified_service::ClassifiedService;
use crate::domain::classified::Classified;
use crate::domain::error::DomainError;
use crate::domain::listing::ListParams;
use crate::presentation::dto::{ClassifiedRequest, ClassifiedView};
use crate::presentation::utils::{AuthenticatedUser, parse_id, request_id};
use crate::presentation::version::ApiVersion;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use tracing::info;

async fn render(
    version: ApiVersion,
    service: &ClassifiedService,
    classifieds: Vec<Classified>,
) -> Result<Vec<ClassifiedView>, DomainError> {
    let owners = if version.nests_owner() {
        service.owners(&classifieds).await?
    } else {
        HashMap::new()
    };
    version.classified_views(classifieds, &owners)
}

async fn render_one(
    version: ApiVersion,
    service: &ClassifiedService,
    classified: Classified,
) -> Result<ClassifiedView, DomainError> {
    render(version, service, vec![classified])
        .await?
        .pop()
        .ok_or_else(|| DomainError::Internal("rendered no classified".into()))
}

#[get("/classifieds")]
pub async fn list_classifieds(
    req: HttpRequest,
    version: web::Data<ApiVersion>,
    service: web::Data<ClassifiedService>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, DomainError> {
    let version = **version;
    let classifieds = service
        .list_classifieds(version.listing_policy(), &query)
        .await?;
    let count = classifieds.len();
    let views = render(version, &service, classifieds).await?;

    info!(
        request_id = %request_id(&req),
        api_version = ?version,
        count,
        "classifieds retrieved"
    );

    Ok(HttpResponse::build(version.list_status()).json(views))
}

#[get("/classifieds/{id}")]
pub async fn get_classified(
    version: web::Data<ApiVersion>,
    service: web::Data<ClassifiedService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_id(&path, DomainError::ClassifiedNotFound)?;
    let classified = service.get_classified(id).await?;
    let view = render_one(**version, &service, classified).await?;

    Ok(HttpResponse::Ok().json(view))
}

#[post("/classifieds")]
pub async fn create_classified(
    req: HttpRequest,
    user: AuthenticatedUser,
    version: web::Data<ApiVersion>,
    service: web::Data<ClassifiedService>,
    payload: Option<web::Json<ClassifiedRequest>>,
) -> Result<HttpResponse, DomainError> {
    let params = payload
        .and_then(|payload| payload.into_inner().classified)
        .ok_or_else(|| DomainError::missing_parameter("classified"))?;

    let classified = service.create_classified(user.id, params).await?;
    let classified_id = classified.id;
    let view = render_one(**version, &service, classified).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        classified_id,
        "classified created"
    );

    Ok(HttpResponse::Created().json(view))
}

#[patch("/classifieds/{id}")]
pub async fn update_classified(
    req: HttpRequest,
    user: AuthenticatedUser,
    version: web::Data<ApiVersion>,
    service: web::Data<ClassifiedService>,
    path: web::Path<String>,
    payload: Option<web::Json<ClassifiedRequest>>,
) -> Result<HttpResponse, DomainError> {
    let classified_id = parse_id(&path, DomainError::ClassifiedNotFound)?;
    let params = payload.and_then(|payload| payload.into_inner().classified);

    let classified = service
        .update_classified(user.id, classified_id, params)
        .await?;
    let view = render_one(**version, &service, classified).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        classified_id,
        "classified updated"
    );

    Ok(HttpResponse::Ok().json(view))
}

#[delete("/classifieds/{id}")]
pub async fn delete_classified(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<ClassifiedService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let classified_id = parse_id(&path, DomainError::ClassifiedNotFound)?;
    service.delete_classified(user.id, classified_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        classified_id,
        "classified deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
