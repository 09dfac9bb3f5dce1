use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::RegisterRequest;
use crate::presentation::utils::{parse_id, request_id};
use crate::presentation::version::ApiVersion;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post("/users")]
pub async fn register_user(
    req: HttpRequest,
    version: web::Data<ApiVersion>,
    service: web::Data<AuthService>,
    payload: Option<web::Json<RegisterRequest>>,
) -> Result<HttpResponse, DomainError> {
    let registration = payload
        .and_then(|payload| payload.into_inner().user)
        .ok_or_else(|| DomainError::missing_parameter("user"))?;

    let user = service.register(registration).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        username = %user.username,
        "user registered"
    );

    Ok(HttpResponse::Created().json(version.user_view(&user)))
}

#[get("/users/{id}")]
pub async fn get_user(
    version: web::Data<ApiVersion>,
    service: web::Data<AuthService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_id(&path, DomainError::UserNotFound)?;
    let user = service.get_user(id).await?;

    Ok(HttpResponse::Ok().json(version.user_view(&user)))
}
