use actix_web::error::QueryPayloadError;
use actix_web::{HttpRequest, Scope, web};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::presentation::handlers;
use crate::presentation::version::ApiVersion;

/// Registers every route. Versioned scopes come before the unversioned one,
/// whose empty prefix would otherwise shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .service(handlers::auth::ping)
        .service(handlers::auth::create_token)
        .service(api_scope(ApiVersion::V1))
        .service(api_scope(ApiVersion::V2))
        .service(api_scope(ApiVersion::Unversioned));
}

fn api_scope(version: ApiVersion) -> Scope {
    web::scope(version.prefix())
        .app_data(web::Data::new(version))
        .service(handlers::classified::list_classifieds)
        .service(handlers::classified::get_classified)
        .service(handlers::classified::create_classified)
        .service(handlers::classified::update_classified)
        .service(handlers::classified::delete_classified)
        .service(handlers::user::register_user)
        .service(handlers::user::get_user)
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected query string");
    DomainError::InvalidParameter("malformed query parameters".into()).into()
}
