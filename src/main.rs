use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use finsight_api::advisor::GeminiClient;
use finsight_api::config::Config;
use finsight_api::{errors, openapi, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    errors::expose_internals(config.is_development());

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to the database: {e}");
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        error!("Failed to run migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let gemini = web::Data::new(GeminiClient::new(&config.gemini));
    let jwt_secret = web::Data::new(config.jwt_secret.clone());
    let pool = web::Data::new(pool);

    // About one request per second with a burst of 5
    let auth_governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid rate limit config")
        })?;

    let allowed_origins = config.allowed_origins.clone();
    let bind_addr = (config.host.clone(), config.port);

    info!(
        host = %config.host,
        port = config.port,
        environment = ?config.environment,
        model = %config.gemini.model,
        "Starting server"
    );

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|allowed| allowed == origin)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(pool.clone())
            .app_data(jwt_secret.clone())
            .app_data(gemini.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .configure(routes::configure)
            // Rate-limited credential endpoints last so the empty scope does not shadow others
            .service(
                web::scope("")
                    .wrap(Governor::new(&auth_governor_config))
                    .configure(routes::configure_auth),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
