use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{PingResponse, TokenRequest, TokenResponse};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post("/user_token")]
pub async fn create_token(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: Option<web::Json<TokenRequest>>,
) -> Result<HttpResponse, DomainError> {
    let credentials = payload
        .and_then(|payload| payload.into_inner().auth)
        .ok_or_else(|| DomainError::missing_parameter("auth"))?;

    let jwt = service
        .login(&credentials.username, &credentials.password)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %credentials.username,
        "token issued"
    );

    Ok(HttpResponse::Created().json(TokenResponse { jwt }))
}

#[get("/ping")]
pub async fn ping(user: Option<AuthenticatedUser>) -> HttpResponse {
    let response = match user {
        Some(_) => "authorized pong",
        None => "unauthorized pong",
    };
    HttpResponse::Ok().json(PingResponse { response })
}
