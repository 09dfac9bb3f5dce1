use crate::application::auth_service::AuthService;
use crate::application::classified_service::ClassifiedService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::middleware::{IdentityMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::routes;
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::{App, HttpServer, web};
use tracing::info;

pub async fn start_rest_server(
    config: AppConfig,
    auth_service: AuthService,
    classified_service: ClassifiedService,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        build_app(
            auth_service.clone(),
            classified_service.clone(),
            config.cors_origins.clone(),
        )
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

/// The full application: middleware stack, shared services and every route.
pub fn build_app(
    auth_service: AuthService,
    classified_service: ClassifiedService,
    cors_origins: Vec<String>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(IdentityMiddleware)
        .wrap(NormalizePath::trim())
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(Logger::default())
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .wrap(build_cors(&cors_origins))
        .app_data(web::Data::new(classified_service))
        .app_data(web::Data::new(auth_service))
        .configure(routes::configure)
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    for origin in origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin).supports_credentials()
        };
    }

    cors
}
