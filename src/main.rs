mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::Planner;
use crate::routes::plan::AppState;
use crate::services::{AirtableClient, AirtableTables, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting plan-viaje service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the Airtable client. Missing credentials don't prevent the
    // server from starting; plan requests answer with a configuration error
    // until they are provided.
    let tables = AirtableTables {
        alojamientos: settings.tables.alojamientos,
        restaurantes: settings.tables.restaurantes,
        experiencias: settings.tables.experiencias,
        playas: settings.tables.playas,
    };

    let airtable = match (settings.airtable.base_id, settings.airtable.token) {
        (Some(base_id), Some(token)) => {
            let client = AirtableClient::new(settings.airtable.api_url, base_id, token, tables)
                .with_view(settings.airtable.view)
                .with_page_size(settings.fetch.page_size)
                .with_page_timeout(Duration::from_secs(settings.fetch.page_timeout_secs))
                .with_retry(RetryPolicy {
                    max_attempts: 2,
                    delay: Duration::from_millis(settings.fetch.retry_delay_ms),
                });
            info!("Airtable client initialized");
            Some(Arc::new(client))
        }
        _ => {
            warn!("AIRTABLE_BASE_ID / AIRTABLE_TOKEN not set, plan requests will fail");
            None
        }
    };

    // Build application state
    let app_state = AppState {
        airtable,
        planner: Planner::new(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::AUTHORIZATION,
            ])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
