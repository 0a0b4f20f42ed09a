//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, DbSettings, RuntimeMode};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use backend::domain::FeedbackService;
use backend::domain::ports::{FeedbackRepository, StaticTokenVerifier, TokenVerifier};
use backend::inbound::http::feedback::{feedback_stats, submit_feedback, user_feedback};
use backend::inbound::http::health::health;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{json_config, not_found};
use backend::middleware::{Correlate, RateLimit};

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allowed_header("x-session-id")
        .allowed_header("x-request-id")
        .supports_credentials()
}

fn build_app(
    state: web::Data<HttpState>,
    cors_origin: &str,
    rate_limit: RateLimit,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let app = App::new()
        .app_data(state)
        .app_data(json_config())
        .wrap(DefaultHeaders::new()
            .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .add((header::X_FRAME_OPTIONS, "DENY")))
        .wrap(cors(cors_origin))
        .wrap(Correlate)
        .service(health)
        .service(
            web::scope("/api/feedback")
                .service(
                    web::resource("")
                        .wrap(rate_limit)
                        .route(web::post().to(submit_feedback)),
                )
                .service(user_feedback)
                .service(feedback_stats),
        )
        .default_service(web::route().to(not_found));

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the configuration and repository.
///
/// # Errors
/// Propagates [`std::io::Error`] when the static token map is invalid or
/// binding the socket fails.
pub fn create_server(
    config: AppConfig,
    repository: Arc<dyn FeedbackRepository>,
) -> std::io::Result<Server> {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        StaticTokenVerifier::from_pairs(config.api_tokens.clone())
            .map_err(|err| std::io::Error::other(format!("invalid API_TOKENS entry: {err}")))?,
    );
    let service = FeedbackService::new(repository, Arc::new(DefaultClock));
    let state = web::Data::new(HttpState::new(service, verifier));
    let rate_limit = RateLimit::new(config.rate_limit.clone(), Arc::new(DefaultClock));
    let cors_origin = config.cors_origin.clone();

    let server = HttpServer::new(move || {
        build_app(state.clone(), cors_origin.as_str(), rate_limit.clone())
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
