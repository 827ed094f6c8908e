mod api;
mod config;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{Credentials, Settings};
use dotenv::dotenv;
use services::google_auth::{AccessTokenProvider, ServiceAccountAuth, ServiceAccountKey, StaticToken};
use services::{ClassroomProvider, GoogleClassroomClient};
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

fn build_token_provider(
    settings: &Settings,
    http: &reqwest::Client,
) -> Result<Arc<dyn AccessTokenProvider>, String> {
    match &settings.credentials {
        Credentials::StaticToken(token) => {
            log::warn!("⚠️  Using static GOOGLE_ACCESS_TOKEN (development only)");
            Ok(Arc::new(StaticToken(token.clone())))
        }
        Credentials::ServiceAccount {
            json_path,
            impersonated_admin,
        } => {
            let key = ServiceAccountKey::from_file(json_path)?;
            log::info!("🔐 Service account: {} (acting as {})", key.client_email, impersonated_admin);
            let auth = ServiceAccountAuth::new(
                key,
                impersonated_admin.clone(),
                &settings.token_uri,
                http.clone(),
            )?;
            Ok(Arc::new(auth))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().unwrap_or_else(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::process::exit(1);
    });

    log::info!("🚀 Starting Classroom Enrollment Service...");
    log::info!("🏫 Classroom API: {}", settings.classroom_api_base);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let token_provider = build_token_provider(&settings, &http).unwrap_or_else(|e| {
        log::error!("❌ Failed to load Google credentials: {}", e);
        std::process::exit(1);
    });

    let classroom: Arc<dyn ClassroomProvider> = Arc::new(GoogleClassroomClient::new(
        http,
        &settings.classroom_api_base,
        token_provider,
    ));
    let classroom_data = web::Data::from(classroom);

    let host = settings.host.clone();
    let port = settings.port.clone();
    let cors_origins = settings.cors_allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(classroom_data.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Invitations: single, bulk and per-course bulk enrollment
            .configure(api::invitations::configure)
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
